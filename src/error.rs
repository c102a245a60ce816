//! Error types for token signing, parsing and validation
//!
//! Two layers of errors exist:
//! - [`Error`] describes a single failure coming out of a building block
//!   (segment codec, signing method, key handling, claim check).
//! - [`ValidationError`] is what the parsing pipeline reports. It accumulates
//!   every failure kind as a bit in [`ValidationFlags`] and keeps the most
//!   recently detected [`Error`] as its cause.
//!
//! A token is only trustworthy when the merged flag set is empty.

use bitflags::bitflags;
use std::fmt;

use crate::token::Token;

/// Errors produced by the individual building blocks of the library
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Base64URL segment decoding failed
    #[error("illegal base64url data: {0}")]
    Decode(String),

    /// Header or claims JSON could not be encoded or decoded
    #[error("json: {0}")]
    Json(String),

    /// Key material is unusable for the requested operation
    #[error("key is invalid")]
    InvalidKey,

    /// Key is of the wrong family for the signing method
    #[error("key is of invalid type")]
    InvalidKeyType,

    /// The requested hash is not provided by the crypto backend
    #[error("the requested hash function is unavailable")]
    HashUnavailable,

    /// Signature does not match the signing input
    #[error("signature is invalid")]
    SignatureInvalid,

    /// ECDSA signature has the wrong shape or does not verify
    #[error("ecdsa: verification error")]
    EcdsaVerification,

    /// The crypto backend refused to produce a signature
    #[error("signing failed: {0}")]
    Signing(String),

    /// A claim check failed
    #[error("{0}")]
    Claims(String),

    /// A key-retrieval callback could not supply a key
    #[error("key retrieval failed: {0}")]
    KeyRetrieval(String),

    /// A fully formed validation error, reported verbatim by the parser
    #[error("{0}")]
    Validation(Box<ValidationError>),
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(Box::new(err))
    }
}

/// Result type alias for jwtkit operations
pub type Result<T> = std::result::Result<T, Error>;

bitflags! {
    /// Independent failure kinds, OR-accumulated across validation stages
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ValidationFlags: u32 {
        /// Token could not be decoded
        const MALFORMED = 1 << 0;
        /// No usable algorithm, no key callback, or the callback failed
        const UNVERIFIABLE = 1 << 1;
        /// Signature validation failed or the algorithm is not allowed
        const SIGNATURE_INVALID = 1 << 2;
        /// `aud` check failed
        const AUDIENCE = 1 << 3;
        /// `exp` check failed
        const EXPIRED = 1 << 4;
        /// `iat` check failed (used before issued)
        const ISSUED_AT = 1 << 5;
        /// `iss` check failed
        const ISSUER = 1 << 6;
        /// `nbf` check failed
        const NOT_VALID_YET = 1 << 7;
        /// `jti` check failed
        const ID = 1 << 8;
        /// Generic claims failure not otherwise classified
        const CLAIMS_INVALID = 1 << 9;
        /// Payload cannot be represented by any claims shape
        const CLAIMS_TYPE = 1 << 10;
    }
}

/// Structured validation failure carrying every detected failure kind
///
/// `flags` is the sole definition of "no error": an empty set means valid.
/// Only one descriptive cause survives (the last one recorded), while all
/// flags are kept.
#[derive(Debug, Clone, Default)]
pub struct ValidationError {
    cause: Option<Error>,
    text: Option<String>,
    flags: ValidationFlags,
}

impl ValidationError {
    /// An empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Error with a plain message and the given flags
    pub fn with_message(text: impl Into<String>, flags: ValidationFlags) -> Self {
        Self {
            cause: None,
            text: Some(text.into()),
            flags,
        }
    }

    /// Error wrapping an underlying cause
    pub fn with_cause(cause: Error, flags: ValidationFlags) -> Self {
        Self {
            cause: Some(cause),
            text: None,
            flags,
        }
    }

    /// All failure kinds recorded so far
    pub fn flags(&self) -> ValidationFlags {
        self.flags
    }

    /// Whether every kind in `flags` is set
    pub fn has(&self, flags: ValidationFlags) -> bool {
        self.flags.contains(flags)
    }

    /// The wrapped cause, if any
    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_ref()
    }

    /// True iff no failure kind has been recorded
    pub fn is_valid(&self) -> bool {
        self.flags.is_empty()
    }

    /// Record a failure: OR the flags in and replace the cause
    pub fn record(&mut self, flags: ValidationFlags, cause: Error) {
        self.flags |= flags;
        self.cause = Some(cause);
    }

    /// OR `flags` in, keeping the current description
    pub fn insert(&mut self, flags: ValidationFlags) {
        self.flags |= flags;
    }

    /// Fold another validation error into this one
    ///
    /// Flags accumulate. The other error's description replaces this one's
    /// when it carries any.
    pub fn merge(&mut self, other: ValidationError) {
        self.flags |= other.flags;
        if other.cause.is_some() || other.text.is_some() {
            self.cause = other.cause;
            self.text = other.text;
        }
    }

    /// `Ok(())` when no flag is set, otherwise `Err(self)`
    pub fn into_result(self) -> std::result::Result<(), ValidationError> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.cause, &self.text) {
            (Some(cause), _) => write!(f, "{cause}"),
            (None, Some(text)) => write!(f, "{text}"),
            (None, None) => write!(f, "token is invalid"),
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Failure returned by the parser
///
/// Carries the validation error and, when the pipeline got far enough to
/// build one, the partially populated token. The token is for diagnostics
/// only and must never be trusted.
#[derive(Debug)]
pub struct ParseError {
    error: ValidationError,
    token: Option<Box<Token>>,
}

impl ParseError {
    pub(crate) fn new(error: ValidationError, token: Option<Token>) -> Self {
        Self {
            error,
            token: token.map(Box::new),
        }
    }

    /// The merged validation error
    pub fn validation(&self) -> &ValidationError {
        &self.error
    }

    /// Shorthand for `self.validation().flags()`
    pub fn flags(&self) -> ValidationFlags {
        self.error.flags()
    }

    /// Whether every kind in `flags` is set
    pub fn has(&self, flags: ValidationFlags) -> bool {
        self.error.has(flags)
    }

    /// The partially populated, untrusted token
    pub fn token(&self) -> Option<&Token> {
        self.token.as_deref()
    }

    /// Split into the validation error and the untrusted token
    pub fn into_parts(self) -> (ValidationError, Option<Token>) {
        (self.error, self.token.map(|token| *token))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<ParseError> for ValidationError {
    fn from(err: ParseError) -> Self {
        err.error
    }
}
