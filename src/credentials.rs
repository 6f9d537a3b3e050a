//! Credential attempts and the capability that checks them.

use serde::{de::Error as _, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::CredentialsConfig;

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "1234";

/// A username/password pair decoded from a `/login` request body.
///
/// Lives for one request only; it is never stored or logged in full.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

const FIELDS: [&str; 2] = ["username", "password"];

impl Credentials {
    /// Build an attempt from a decoded JSON value.
    ///
    /// `null`, absent fields and `null` field values all leave the field
    /// empty. Field names match ASCII case-insensitively; an exact-case key
    /// wins over a folded one. Anything other than an object or `null` is an
    /// error, as is a non-string field value.
    pub fn from_json(value: Value) -> serde_json::Result<Self> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(serde_json::Error::custom(format!(
                    "expected a JSON object, found {other}"
                )))
            }
        };

        let mut folded = Map::new();
        let mut exact = Map::new();
        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            let Some(name) = FIELDS.iter().find(|f| key.eq_ignore_ascii_case(f)) else {
                continue;
            };
            let target = if key == *name { &mut exact } else { &mut folded };
            target.insert((*name).to_owned(), value);
        }
        folded.extend(exact);

        serde_json::from_value(Value::Object(folded))
    }
}

/// Decides whether a login attempt is accepted.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, attempt: &Credentials) -> bool;
}

/// Accepts exactly one configured pair, compared case-sensitively.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(cfg: &CredentialsConfig) -> Self {
        Self::new(cfg.username.clone(), cfg.resolved_password())
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, attempt: &Credentials) -> bool {
        attempt.username == self.username && attempt.password == self.password
    }
}
