//! Signing methods and the registry that resolves them by name
//!
//! Four families are built in, each registered under its JWS names:
//!
//! - **HMAC**: HS256, HS384, HS512
//! - **RSA PKCS#1 v1.5**: RS256, RS384, RS512
//! - **RSA-PSS**: PS256, PS384, PS512
//! - **ECDSA**: ES256 (P-256), ES384 (P-384), ES512 (P-521)
//!
//! The `"none"` algorithm is never registered, so unsigned tokens cannot
//! resolve to a method.

mod traits;

pub mod ecdsa;
pub mod hmac;
pub mod registry;
pub mod rsa;
pub mod rsa_pss;

#[cfg(test)]
pub(crate) mod test_keys;

pub use self::ecdsa::{EcdsaMethod, ES256, ES384, ES512};
pub use self::hmac::{HmacMethod, HS256, HS384, HS512};
pub use self::registry::{get_signing_method, register_signing_method, SigningMethodRegistry};
pub use self::rsa::{RsaMethod, RS256, RS384, RS512};
pub use self::rsa_pss::{PssOptions, RsaPssMethod, PS256, PS384, PS512};
pub use self::traits::SigningMethod;

/// Hash function a signing method is declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// Digest length in bytes
    pub const fn digest_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Conventional name of the hash
    pub const fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
