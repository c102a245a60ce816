use crate::algorithm::rsa::{sign_rsa, verify_rsa, RsaMethod};
use crate::algorithm::{HashAlgorithm, SigningMethod};
use crate::error::Result;
use crate::keys::Key;

use aws_lc_rs::signature::{self, RsaEncoding, VerificationAlgorithm};

/// Padding parameters layered on top of an [`RsaMethod`]
///
/// The salt length always equals the digest length of `hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PssOptions {
    pub hash: HashAlgorithm,
}

/// RSASSA-PSS signing method
///
/// Wraps an [`RsaMethod`] for naming and key-type checks and swaps the
/// padding for PSS. The same 2048 to 8192 bit modulus range applies on
/// verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPssMethod {
    base: RsaMethod,
    options: PssOptions,
}

/// PS256 (RSASSA-PSS with SHA-256 and MGF1 SHA-256)
pub const PS256: RsaPssMethod = RsaPssMethod::new("PS256", HashAlgorithm::Sha256);

/// PS384 (RSASSA-PSS with SHA-384 and MGF1 SHA-384)
pub const PS384: RsaPssMethod = RsaPssMethod::new("PS384", HashAlgorithm::Sha384);

/// PS512 (RSASSA-PSS with SHA-512 and MGF1 SHA-512)
pub const PS512: RsaPssMethod = RsaPssMethod::new("PS512", HashAlgorithm::Sha512);

impl RsaPssMethod {
    /// Declare a PSS method under `name`
    pub const fn new(name: &'static str, hash: HashAlgorithm) -> Self {
        Self {
            base: RsaMethod::new(name, hash),
            options: PssOptions { hash },
        }
    }

    /// The underlying PKCS#1 v1.5 method
    pub fn base(&self) -> &RsaMethod {
        &self.base
    }

    /// The padding parameters
    pub fn options(&self) -> PssOptions {
        self.options
    }
}

impl SigningMethod for RsaPssMethod {
    fn algorithm(&self) -> &str {
        self.base.name()
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<String> {
        let private_key = self.base.signing_key(key)?;
        sign_rsa(signing_input, private_key, pss_encoding(self.options.hash))
    }

    fn verify(&self, signing_input: &str, signature: &str, key: &Key) -> Result<()> {
        let public_key = self.base.verifying_key(key)?;
        verify_rsa(
            signing_input,
            signature,
            public_key.as_der(),
            pss_verification(self.options.hash),
        )
    }
}

fn pss_encoding(hash: HashAlgorithm) -> &'static dyn RsaEncoding {
    match hash {
        HashAlgorithm::Sha256 => &signature::RSA_PSS_SHA256,
        HashAlgorithm::Sha384 => &signature::RSA_PSS_SHA384,
        HashAlgorithm::Sha512 => &signature::RSA_PSS_SHA512,
    }
}

fn pss_verification(hash: HashAlgorithm) -> &'static dyn VerificationAlgorithm {
    match hash {
        HashAlgorithm::Sha256 => &signature::RSA_PSS_2048_8192_SHA256,
        HashAlgorithm::Sha384 => &signature::RSA_PSS_2048_8192_SHA384,
        HashAlgorithm::Sha512 => &signature::RSA_PSS_2048_8192_SHA512,
    }
}
