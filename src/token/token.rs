//! The token value shared by signing and parsing

use crate::algorithm::SigningMethod;
use crate::claims::{MapClaims, TokenClaims};
use crate::error::{Error, Result};
use crate::keys::Key;
use crate::token::TokenHeader;
use crate::utils::base64url;

use std::sync::Arc;

/// A JSON Web Token
///
/// Built with [`Token::new_with_claims`] for signing, or returned by the
/// [`Parser`](crate::Parser). A parsed token is only trustworthy when the
/// parser returned it as `Ok`, in which case [`is_valid`](Token::is_valid)
/// is `true`. Tokens carried inside a [`ParseError`](crate::ParseError) are
/// partially populated and must not be trusted.
#[derive(Debug, Clone)]
pub struct Token {
    pub(crate) raw: String,
    pub(crate) header: TokenHeader,
    pub(crate) claims: Option<TokenClaims>,
    pub(crate) method: Option<Arc<dyn SigningMethod>>,
    pub(crate) signature: String,
    pub(crate) valid: bool,
}

impl Token {
    /// A token with empty open claims
    pub fn new(method: Arc<dyn SigningMethod>) -> Self {
        Self::new_with_claims(method, MapClaims::new())
    }

    /// A token for `method` carrying `claims`
    ///
    /// The header holds `typ = "JWT"` and `alg = method.algorithm()`.
    pub fn new_with_claims(method: Arc<dyn SigningMethod>, claims: impl Into<TokenClaims>) -> Self {
        Self {
            raw: String::new(),
            header: TokenHeader::new(method.algorithm()),
            claims: Some(claims.into()),
            method: Some(method),
            signature: String::new(),
            valid: false,
        }
    }

    /// Empty token for the parser to fill in
    pub(crate) fn from_raw(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            header: TokenHeader::default(),
            claims: None,
            method: None,
            signature: String::new(),
            valid: false,
        }
    }

    /// The string the token was parsed from (empty for built tokens)
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The header
    pub fn header(&self) -> &TokenHeader {
        &self.header
    }

    /// Mutable header, for extra parameters such as `kid`
    pub fn header_mut(&mut self) -> &mut TokenHeader {
        &mut self.header
    }

    /// The claims, once decoded
    pub fn claims(&self) -> Option<&TokenClaims> {
        self.claims.as_ref()
    }

    /// The resolved signing method
    pub fn method(&self) -> Option<&Arc<dyn SigningMethod>> {
        self.method.as_ref()
    }

    /// The signature segment, set once a parse got as far as verification
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// True iff every parse stage passed
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Canonical signing input: `enc(json(header)) + "." + enc(json(claims))`
    pub fn signing_string(&self) -> Result<String> {
        let header_json =
            serde_json::to_vec(&self.header).map_err(|e| Error::Json(e.to_string()))?;
        let claims_json = match &self.claims {
            Some(claims) => serde_json::to_vec(claims),
            None => serde_json::to_vec(&MapClaims::new()),
        }
        .map_err(|e| Error::Json(e.to_string()))?;

        Ok(format!(
            "{}.{}",
            base64url::encode_bytes(header_json),
            base64url::encode_bytes(claims_json)
        ))
    }

    /// Sign the token and return its compact serialization
    pub fn generate(&self, key: &Key) -> Result<String> {
        let method = self
            .method
            .as_ref()
            .ok_or_else(|| Error::Signing("token has no signing method".to_string()))?;

        let signing_input = self.signing_string()?;
        let signature = method.sign(&signing_input, key)?;
        Ok(format!("{signing_input}.{signature}"))
    }
}
