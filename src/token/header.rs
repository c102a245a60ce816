use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};

/// JOSE header of a token
///
/// An open JSON object. Tokens built by this crate always carry `typ` and
/// `alg`; any other key is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenHeader(Map<String, Value>);

impl TokenHeader {
    /// Header with `typ = "JWT"` and the given `alg`
    pub fn new(algorithm: &str) -> Self {
        let mut header = Self::default();
        header.insert("typ", "JWT");
        header.insert("alg", algorithm);
        header
    }

    /// Set a header parameter, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Algorithm (alg), when present and a string
    pub fn algorithm(&self) -> Option<&str> {
        self.0.get("alg").and_then(Value::as_str)
    }

    /// Token type (typ), when present and a string
    pub fn token_type(&self) -> Option<&str> {
        self.0.get("typ").and_then(Value::as_str)
    }

    /// Key ID (kid), when present and a string
    pub fn key_id(&self) -> Option<&str> {
        self.0.get("kid").and_then(Value::as_str)
    }
}

impl Deref for TokenHeader {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for TokenHeader {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for TokenHeader {
    fn from(object: Map<String, Value>) -> Self {
        Self(object)
    }
}
