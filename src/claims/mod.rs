//! Claims shapes and their temporal and identity checks
//!
//! Two shapes are supported:
//! - [`MapClaims`]: an open JSON object, the default for [`Parser::parse`](crate::Parser::parse)
//! - [`StandardClaims`]: the reserved fields of RFC 7519 §4.1 (`aud`, `exp`,
//!   `iat`, `iss`, `jti`, `nbf`, `sub`)
//!
//! Every check follows the same policy: an absent field passes unless it is
//! required, a present field is compared against the reference value.

mod map;
mod standard;

pub use map::MapClaims;
pub use standard::StandardClaims;

use crate::error::{Error, ValidationError, ValidationFlags};

use constant_time_eq::constant_time_eq;
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Capability shared by every claims shape
pub trait Claims: fmt::Debug + Send + Sync {
    /// `aud` equals `cmp`
    fn verify_audience(&self, cmp: &str, required: bool) -> bool;

    /// `now <= exp`
    fn verify_expires_at(&self, now: i64, required: bool) -> bool;

    /// `now >= iat`
    fn verify_issued_at(&self, now: i64, required: bool) -> bool;

    /// `iss` equals `cmp`
    fn verify_issuer(&self, cmp: &str, required: bool) -> bool;

    /// `now >= nbf`
    fn verify_not_before(&self, now: i64, required: bool) -> bool;

    /// Evaluate `exp`, `iat` and `nbf` against `now`
    ///
    /// None of the fields is required. Every failing check sets its flag;
    /// only the message of the last failing check is kept.
    fn valid_at(&self, now: i64) -> Result<(), ValidationError> {
        let mut err = ValidationError::new();

        if !self.verify_expires_at(now, false) {
            err.record(
                ValidationFlags::EXPIRED,
                Error::Claims("token is expired".to_string()),
            );
        }

        if !self.verify_issued_at(now, false) {
            err.record(
                ValidationFlags::ISSUED_AT,
                Error::Claims("token used before issued".to_string()),
            );
        }

        if !self.verify_not_before(now, false) {
            err.record(
                ValidationFlags::NOT_VALID_YET,
                Error::Claims("token is not valid yet".to_string()),
            );
        }

        err.into_result()
    }

    /// [`valid_at`](Claims::valid_at) with the current system time
    fn valid(&self) -> Result<(), ValidationError> {
        self.valid_at(now_unix())
    }
}

/// Which claims shape the parser should decode the payload into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimsKind {
    /// Open JSON object
    #[default]
    Map,
    /// Reserved RFC 7519 fields only
    Standard,
}

/// Claims carried by a [`Token`](crate::Token)
#[derive(Debug, Clone, PartialEq)]
pub enum TokenClaims {
    Map(MapClaims),
    Standard(StandardClaims),
}

impl TokenClaims {
    /// The shape of these claims
    pub fn kind(&self) -> ClaimsKind {
        match self {
            TokenClaims::Map(_) => ClaimsKind::Map,
            TokenClaims::Standard(_) => ClaimsKind::Standard,
        }
    }

    /// The open map, if that is the shape
    pub fn as_map(&self) -> Option<&MapClaims> {
        match self {
            TokenClaims::Map(claims) => Some(claims),
            TokenClaims::Standard(_) => None,
        }
    }

    /// The standard fields, if that is the shape
    pub fn as_standard(&self) -> Option<&StandardClaims> {
        match self {
            TokenClaims::Standard(claims) => Some(claims),
            TokenClaims::Map(_) => None,
        }
    }

    fn inner(&self) -> &dyn Claims {
        match self {
            TokenClaims::Map(claims) => claims,
            TokenClaims::Standard(claims) => claims,
        }
    }
}

impl Default for TokenClaims {
    fn default() -> Self {
        TokenClaims::Map(MapClaims::new())
    }
}

impl From<MapClaims> for TokenClaims {
    fn from(claims: MapClaims) -> Self {
        TokenClaims::Map(claims)
    }
}

impl From<StandardClaims> for TokenClaims {
    fn from(claims: StandardClaims) -> Self {
        TokenClaims::Standard(claims)
    }
}

impl Serialize for TokenClaims {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TokenClaims::Map(claims) => claims.serialize(serializer),
            TokenClaims::Standard(claims) => claims.serialize(serializer),
        }
    }
}

impl Claims for TokenClaims {
    fn verify_audience(&self, cmp: &str, required: bool) -> bool {
        self.inner().verify_audience(cmp, required)
    }

    fn verify_expires_at(&self, now: i64, required: bool) -> bool {
        self.inner().verify_expires_at(now, required)
    }

    fn verify_issued_at(&self, now: i64, required: bool) -> bool {
        self.inner().verify_issued_at(now, required)
    }

    fn verify_issuer(&self, cmp: &str, required: bool) -> bool {
        self.inner().verify_issuer(cmp, required)
    }

    fn verify_not_before(&self, now: i64, required: bool) -> bool {
        self.inner().verify_not_before(now, required)
    }

    fn valid_at(&self, now: i64) -> Result<(), ValidationError> {
        self.inner().valid_at(now)
    }
}

/// Current Unix timestamp in seconds
pub(crate) fn now_unix() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(err) => -(err.duration().as_secs() as i64),
    }
}

pub(crate) fn verify_string(value: Option<&str>, cmp: &str, required: bool) -> bool {
    match value {
        None => !required,
        Some(value) => constant_time_eq(value.as_bytes(), cmp.as_bytes()),
    }
}

pub(crate) fn verify_exp(exp: Option<i64>, now: i64, required: bool) -> bool {
    exp.map_or(!required, |exp| now <= exp)
}

pub(crate) fn verify_iat(iat: Option<i64>, now: i64, required: bool) -> bool {
    iat.map_or(!required, |iat| now >= iat)
}

pub(crate) fn verify_nbf(nbf: Option<i64>, now: i64, required: bool) -> bool {
    nbf.map_or(!required, |nbf| now >= nbf)
}
