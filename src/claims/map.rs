use crate::claims::{verify_exp, verify_iat, verify_nbf, verify_string, Claims};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::ops::{Deref, DerefMut};

/// Open claims: any JSON object
///
/// Temporal claims are read from numbers only, integer, floating point or
/// arbitrary-precision alike; a non-numeric `exp`, `iat` or `nbf` counts as
/// absent. A present `aud` or `iss` that is not a string always fails its
/// check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapClaims(Map<String, Value>);

impl MapClaims {
    /// An empty claims object
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a claim, returning the previous value under that name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// The underlying JSON object
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Build from a decoded payload object
    ///
    /// Unless `use_json_number` is set, every number (nested ones included)
    /// is coerced to its `f64` value, so integers beyond 2^53 lose precision.
    pub(crate) fn from_payload(mut object: Map<String, Value>, use_json_number: bool) -> Self {
        if !use_json_number {
            for value in object.values_mut() {
                coerce_numbers(value);
            }
        }
        Self(object)
    }

    fn timestamp(&self, name: &str) -> Option<i64> {
        match self.0.get(name)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|value| value as i64)),
            _ => None,
        }
    }

    fn verify_text(&self, name: &str, cmp: &str, required: bool) -> bool {
        match self.0.get(name) {
            None => !required,
            Some(Value::String(value)) => verify_string(Some(value), cmp, required),
            Some(_) => false,
        }
    }
}

impl Deref for MapClaims {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MapClaims {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for MapClaims {
    fn from(object: Map<String, Value>) -> Self {
        Self(object)
    }
}

impl Claims for MapClaims {
    fn verify_audience(&self, cmp: &str, required: bool) -> bool {
        self.verify_text("aud", cmp, required)
    }

    fn verify_expires_at(&self, now: i64, required: bool) -> bool {
        verify_exp(self.timestamp("exp"), now, required)
    }

    fn verify_issued_at(&self, now: i64, required: bool) -> bool {
        verify_iat(self.timestamp("iat"), now, required)
    }

    fn verify_issuer(&self, cmp: &str, required: bool) -> bool {
        self.verify_text("iss", cmp, required)
    }

    fn verify_not_before(&self, now: i64, required: bool) -> bool {
        verify_nbf(self.timestamp("nbf"), now, required)
    }
}

fn coerce_numbers(value: &mut Value) {
    match value {
        Value::Number(number) => {
            if let Some(float) = number.as_f64().and_then(Number::from_f64) {
                *number = float;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(coerce_numbers),
        Value::Object(object) => object.values_mut().for_each(coerce_numbers),
        _ => {}
    }
}
