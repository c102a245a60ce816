//! Token parsing and verification pipeline
//!
//! The [`Parser`] walks a compact token through a fixed sequence of stages:
//!
//! ```text
//! split into 3 segments          Malformed
//!     │
//! decode header                  Malformed
//!     │
//! decode claims                  Malformed / ClaimsType
//!     │
//! resolve `alg` in the registry  Unverifiable
//! check the allow-list           SignatureInvalid
//!     │
//! key callback                   Unverifiable (or the callback's own error)
//!     │
//! claims valid() + signature     flags OR-merged
//!     │
//! valid iff no flag is set
//! ```
//!
//! Each stage before the last returns as soon as it fails. The claims check
//! and the signature check both run and their failures accumulate.

use crate::algorithm::registry::{self, SigningMethodRegistry};
use crate::algorithm::SigningMethod;
use crate::claims::{now_unix, Claims, ClaimsKind, MapClaims, StandardClaims, TokenClaims};
use crate::error::{Error, ParseError, ValidationError, ValidationFlags};
use crate::keys::Key;
use crate::token::{Token, TokenHeader};
use crate::utils::base64url;

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// Key-retrieval callback
///
/// Receives the decoded but unverified token, so the header (`kid`, `alg`)
/// and claims can be used to pick a key. Returning
/// [`Error::Validation`] reports that validation error verbatim (an empty
/// one is marked unverifiable); any other error marks the token
/// unverifiable.
pub type Keyfunc<'a> = dyn Fn(&Token) -> crate::error::Result<Key> + 'a;

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Stateless, reusable token parser
///
/// A `Parser` only holds configuration, so one instance can be shared
/// across threads and used for any number of concurrent parses.
///
/// # Example
///
/// ```ignore
/// use jwtkit::*;
///
/// let parser = Parser::new().valid_methods(["HS256"]);
/// let keyfunc = |_: &Token| Ok(Key::symmetric(b"secret".to_vec()));
///
/// let token = parser.parse(&compact, Some(&keyfunc))?;
/// assert!(token.is_valid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    valid_methods: Option<Vec<String>>,
    use_json_number: bool,
    skip_claims_validation: bool,
    registry: Option<Arc<SigningMethodRegistry>>,
    clock: Option<fn() -> i64>,
}

/// A token that passed the decoding stages, with the pieces verification needs
struct Decoded<'t> {
    token: Token,
    method: Arc<dyn SigningMethod>,
    signing_input: &'t str,
    signature: &'t str,
}

impl Parser {
    /// Parser with no algorithm restriction, reading the process-wide registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept tokens whose resolved algorithm is in `methods`
    ///
    /// The check runs before the key callback, so a disallowed algorithm
    /// never gets to choose a key. An empty list rejects every token.
    pub fn valid_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    /// Keep numeric claim literals exactly instead of coercing them to `f64`
    ///
    /// Only affects [`ClaimsKind::Map`].
    pub fn use_json_number(mut self, enabled: bool) -> Self {
        self.use_json_number = enabled;
        self
    }

    /// Bypass the claims `valid()` stage (use with caution!)
    ///
    /// The signature is still verified.
    pub fn skip_claims_validation(mut self, enabled: bool) -> Self {
        self.skip_claims_validation = enabled;
        self
    }

    /// Resolve algorithms through `registry` instead of the process-wide one
    pub fn with_registry(mut self, registry: Arc<SigningMethodRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Read the current Unix time from `clock` when validating claims
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Parse and verify a token carrying open claims
    ///
    /// Shorthand for [`parse_with_claims`](Parser::parse_with_claims) with
    /// [`ClaimsKind::Map`].
    pub fn parse(&self, token: &str, keyfunc: Option<&Keyfunc<'_>>) -> ParseResult<Token> {
        self.parse_with_claims(token, ClaimsKind::Map, keyfunc)
    }

    /// Parse and verify a token, decoding its claims as `kind`
    ///
    /// On success the returned token has [`is_valid`](Token::is_valid) set.
    /// On failure the [`ParseError`] carries every failure kind detected and,
    /// once the header could be split off, the partially populated token.
    pub fn parse_with_claims(
        &self,
        token: &str,
        kind: ClaimsKind,
        keyfunc: Option<&Keyfunc<'_>>,
    ) -> ParseResult<Token> {
        let Decoded {
            mut token,
            method,
            signing_input,
            signature,
        } = self.decode(token, kind)?;

        let Some(keyfunc) = keyfunc else {
            debug!(stage = "key", "token rejected: no key callback");
            return Err(ParseError::new(
                ValidationError::with_message(
                    "no Keyfunc was provided",
                    ValidationFlags::UNVERIFIABLE,
                ),
                Some(token),
            ));
        };

        let key = match keyfunc(&token) {
            Ok(key) => key,
            Err(Error::Validation(err)) => {
                let mut err = *err;
                // A rejection must never read as valid
                if err.is_valid() {
                    err.insert(ValidationFlags::UNVERIFIABLE);
                }
                debug!(stage = "key", flags = ?err.flags(), "token rejected by key callback");
                return Err(ParseError::new(err, Some(token)));
            }
            Err(err) => {
                debug!(stage = "key", error = %err, "key callback failed");
                return Err(ParseError::new(
                    ValidationError::with_cause(err, ValidationFlags::UNVERIFIABLE),
                    Some(token),
                ));
            }
        };

        let mut err = ValidationError::new();

        if !self.skip_claims_validation {
            if let Some(claims) = &token.claims {
                let now = self.clock.map_or_else(now_unix, |clock| clock());
                if let Err(claims_err) = claims.valid_at(now) {
                    debug!(stage = "claims", flags = ?claims_err.flags(), "claims failed validation");
                    err.merge(claims_err);
                }
            }
        }

        token.signature = signature.to_string();
        if let Err(sig_err) = method.verify(signing_input, signature, &key) {
            debug!(
                stage = "signature",
                alg = method.algorithm(),
                error = %sig_err,
                "signature verification failed"
            );
            err.record(ValidationFlags::SIGNATURE_INVALID, sig_err);
        }

        if err.is_valid() {
            trace!(alg = method.algorithm(), "token verified");
            token.valid = true;
            Ok(token)
        } else {
            Err(ParseError::new(err, Some(token)))
        }
    }

    /// Decode a token without verifying its signature or validating claims
    ///
    /// Runs the splitting, decoding, algorithm-resolution and allow-list
    /// stages only. The result is never marked valid: use it to inspect the
    /// header or claims before a key is available, never to trust them.
    pub fn parse_unverified(&self, token: &str, kind: ClaimsKind) -> ParseResult<Token> {
        self.decode(token, kind).map(|decoded| decoded.token)
    }

    fn decode<'t>(&self, raw: &'t str, kind: ClaimsKind) -> ParseResult<Decoded<'t>> {
        let mut segments = raw.split('.');
        let (Some(header_segment), Some(claims_segment), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            debug!(stage = "split", "token rejected: wrong segment count");
            return Err(ParseError::new(
                ValidationError::with_message(
                    "token contains an invalid number of segments",
                    ValidationFlags::MALFORMED,
                ),
                None,
            ));
        };
        let signing_input = &raw[..header_segment.len() + 1 + claims_segment.len()];

        let mut token = Token::from_raw(raw);

        token.header = match decode_header(raw, header_segment) {
            Ok(header) => header,
            Err(err) => {
                debug!(stage = "header", "token rejected: undecodable header");
                return Err(ParseError::new(err, Some(token)));
            }
        };

        token.claims = match self.decode_claims(claims_segment, kind) {
            Ok(claims) => Some(claims),
            Err(err) => {
                debug!(stage = "claims", flags = ?err.flags(), "token rejected: undecodable claims");
                return Err(ParseError::new(err, Some(token)));
            }
        };

        let Some(alg) = token.header.algorithm() else {
            debug!(stage = "alg", "token rejected: alg missing");
            return Err(ParseError::new(
                ValidationError::with_message(
                    "signing method (alg) is unspecified",
                    ValidationFlags::UNVERIFIABLE,
                ),
                Some(token),
            ));
        };

        let Some(method) = self.lookup(alg) else {
            debug!(stage = "alg", alg, "token rejected: alg not registered");
            return Err(ParseError::new(
                ValidationError::with_message(
                    "signing method (alg) is unavailable",
                    ValidationFlags::UNVERIFIABLE,
                ),
                Some(token),
            ));
        };
        token.method = Some(Arc::clone(&method));

        if let Some(valid_methods) = &self.valid_methods {
            let algorithm = method.algorithm();
            if !valid_methods.iter().any(|allowed| allowed == algorithm) {
                debug!(stage = "alg", alg = algorithm, "token rejected: alg not allowed");
                return Err(ParseError::new(
                    ValidationError::with_message(
                        format!("signing method {algorithm} is invalid"),
                        ValidationFlags::SIGNATURE_INVALID,
                    ),
                    Some(token),
                ));
            }
        }

        Ok(Decoded {
            token,
            method,
            signing_input,
            signature,
        })
    }

    fn decode_claims(
        &self,
        segment: &str,
        kind: ClaimsKind,
    ) -> std::result::Result<TokenClaims, ValidationError> {
        let malformed = |cause| ValidationError::with_cause(cause, ValidationFlags::MALFORMED);

        let bytes = base64url::decode_bytes(segment).map_err(malformed)?;
        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|e| malformed(Error::Json(e.to_string())))?;

        let Value::Object(object) = payload else {
            return Err(ValidationError::with_cause(
                Error::Json("claims payload is not a JSON object".to_string()),
                ValidationFlags::CLAIMS_TYPE,
            ));
        };

        match kind {
            ClaimsKind::Map => Ok(TokenClaims::Map(MapClaims::from_payload(
                object,
                self.use_json_number,
            ))),
            ClaimsKind::Standard => serde_json::from_slice::<StandardClaims>(&bytes)
                .map(TokenClaims::Standard)
                .map_err(|e| malformed(Error::Json(e.to_string()))),
        }
    }

    fn lookup(&self, alg: &str) -> Option<Arc<dyn SigningMethod>> {
        match &self.registry {
            Some(registry) => registry.lookup(alg),
            None => registry::global().lookup(alg),
        }
    }
}

fn decode_header(raw: &str, segment: &str) -> std::result::Result<TokenHeader, ValidationError> {
    let bytes = match base64url::decode_bytes(segment) {
        Ok(bytes) => bytes,
        Err(err) => {
            if has_bearer_prefix(raw) {
                return Err(ValidationError::with_message(
                    "tokenstring should not contain 'bearer '",
                    ValidationFlags::MALFORMED,
                ));
            }
            return Err(ValidationError::with_cause(err, ValidationFlags::MALFORMED));
        }
    };

    serde_json::from_slice(&bytes).map_err(|e| {
        ValidationError::with_cause(Error::Json(e.to_string()), ValidationFlags::MALFORMED)
    })
}

fn has_bearer_prefix(raw: &str) -> bool {
    raw.get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer "))
}
