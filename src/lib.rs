//! # jwtkit - Sign, Parse and Verify JSON Web Tokens
//!
//! **jwtkit** issues compact JWS tokens and decides whether a presented token
//! can be trusted. Signing methods are resolved by name through a
//! thread-safe registry, the parser checks the algorithm against an optional
//! allow-list before any key is chosen, and every reason a token is rejected
//! is reported together as a set of [`ValidationFlags`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwtkit::*;
//! use std::sync::Arc;
//!
//! let claims = StandardClaims {
//!     subject: Some("user123".to_string()),
//!     expires_at: Some(now + 3600),
//!     ..Default::default()
//! };
//! let compact = Token::new_with_claims(Arc::new(HS256), claims)
//!     .generate(&Key::symmetric(b"secret".to_vec()))?;
//!
//! let keyfunc = |_: &Token| Ok(Key::symmetric(b"secret".to_vec()));
//! let token = Parser::new()
//!     .valid_methods(["HS256"])
//!     .parse_with_claims(&compact, ClaimsKind::Standard, Some(&keyfunc))?;
//!
//! assert!(token.is_valid());
//! ```
//!
//! ## Parsing Pipeline
//!
//! ```text
//! "hhh.ccc.sss"
//!     │ split, decode header and claims
//!     ▼
//! header + claims (untrusted)
//!     │ resolve `alg`, check the allow-list
//!     ▼
//! signing method
//!     │ key callback
//!     ▼
//! key
//!     │ claims valid() + signature verify (both always run)
//!     ▼
//! Ok(Token) iff no flag is set, Err(ParseError) otherwise
//! ```
//!
//! A failed parse still hands back the partially decoded token through
//! [`ParseError::token`] for diagnostics. It is never marked valid.
//!
//! ## Algorithm Support
//!
//! - **HMAC**: HS256, HS384, HS512
//! - **RSA PKCS#1 v1.5**: RS256, RS384, RS512
//! - **RSA-PSS**: PS256, PS384, PS512
//! - **ECDSA**: ES256 (P-256), ES384 (P-384), ES512 (P-521)
//!
//! Additional methods can be registered under any name with
//! [`register_signing_method`] or on a dedicated [`SigningMethodRegistry`]
//! passed to [`Parser::with_registry`]. The `none` algorithm is never
//! registered.
//!
//! ## Claims
//!
//! Payloads decode either into [`MapClaims`] (any JSON object) or into
//! [`StandardClaims`] (the RFC 7519 reserved fields). Both implement
//! [`Claims`]: `exp`, `iat` and `nbf` are checked on every parse unless
//! disabled with [`Parser::skip_claims_validation`], while `aud` and `iss`
//! are checked on demand with constant-time comparison.

pub mod algorithm;
pub mod claims;
pub mod error;
pub mod keys;
pub mod parser;
pub mod token;
pub mod utils;

pub use algorithm::{
    get_signing_method, register_signing_method, EcdsaMethod, HashAlgorithm, HmacMethod,
    PssOptions, RsaMethod, RsaPssMethod, SigningMethod, SigningMethodRegistry, ES256, ES384,
    ES512, HS256, HS384, HS512, PS256, PS384, PS512, RS256, RS384, RS512,
};
pub use claims::{Claims, ClaimsKind, MapClaims, StandardClaims, TokenClaims};
pub use error::{Error, ParseError, Result, ValidationError, ValidationFlags};
pub use keys::{EcdsaCurve, Key};
pub use parser::{Keyfunc, Parser};
pub use token::{Token, TokenHeader};
