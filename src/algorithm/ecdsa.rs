use crate::algorithm::{HashAlgorithm, SigningMethod};
use crate::error::{Error, Result};
use crate::keys::{EcdsaCurve, Key};
use crate::utils::base64url;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    self, EcdsaSigningAlgorithm, EcdsaVerificationAlgorithm, UnparsedPublicKey,
};

/// ECDSA signing method
///
/// Signatures travel as the fixed-width concatenation `r || s`, each
/// component left-padded with zeros to `key_size` bytes. The key must live
/// on the curve with `curve_bits` bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcdsaMethod {
    name: &'static str,
    hash: HashAlgorithm,
    key_size: usize,
    curve_bits: usize,
}

/// ES256 (ECDSA with P-256 and SHA-256)
pub const ES256: EcdsaMethod = EcdsaMethod::new("ES256", HashAlgorithm::Sha256, 32, 256);

/// ES384 (ECDSA with P-384 and SHA-384)
pub const ES384: EcdsaMethod = EcdsaMethod::new("ES384", HashAlgorithm::Sha384, 48, 384);

/// ES512 (ECDSA with P-521 and SHA-512)
pub const ES512: EcdsaMethod = EcdsaMethod::new("ES512", HashAlgorithm::Sha512, 66, 521);

impl EcdsaMethod {
    /// Declare an ECDSA method under `name`
    pub const fn new(
        name: &'static str,
        hash: HashAlgorithm,
        key_size: usize,
        curve_bits: usize,
    ) -> Self {
        Self {
            name,
            hash,
            key_size,
            curve_bits,
        }
    }

    /// The declared hash
    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    /// Byte length of one signature component
    pub fn key_size(&self) -> usize {
        self.key_size
    }

    /// Bit size of the curve the key must live on
    pub fn curve_bits(&self) -> usize {
        self.curve_bits
    }

    fn check_curve(&self, curve: EcdsaCurve) -> Result<()> {
        if curve.bits() == self.curve_bits {
            Ok(())
        } else {
            Err(Error::InvalidKey)
        }
    }
}

impl SigningMethod for EcdsaMethod {
    fn algorithm(&self) -> &str {
        self.name
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<String> {
        let private_key = key.as_ecdsa_private()?;
        self.check_curve(private_key.curve())?;

        let key_pair = private_key.key_pair(self.hash)?;
        let rng = SystemRandom::new();
        let signature = key_pair
            .sign(&rng, signing_input.as_bytes())
            .map_err(|_| Error::Signing("ecdsa signing rejected".to_string()))?;

        Ok(base64url::encode_bytes(signature.as_ref()))
    }

    fn verify(&self, signing_input: &str, signature: &str, key: &Key) -> Result<()> {
        let public_key = key.as_ecdsa_public()?;
        self.check_curve(public_key.curve())?;

        let signature_bytes = base64url::decode_bytes(signature)?;
        if signature_bytes.len() != 2 * self.key_size {
            return Err(Error::EcdsaVerification);
        }

        let algorithm =
            verification_algorithm(public_key.curve(), self.hash).ok_or(Error::HashUnavailable)?;

        UnparsedPublicKey::new(algorithm, public_key.as_bytes())
            .verify(signing_input.as_bytes(), &signature_bytes)
            .map_err(|_| Error::EcdsaVerification)
    }
}

/// Backend signing algorithm for a curve/hash pair, if provided
pub(crate) fn signing_algorithm(
    curve: EcdsaCurve,
    hash: HashAlgorithm,
) -> Option<&'static EcdsaSigningAlgorithm> {
    match (curve, hash) {
        (EcdsaCurve::P256, HashAlgorithm::Sha256) => Some(&signature::ECDSA_P256_SHA256_FIXED_SIGNING),
        (EcdsaCurve::P384, HashAlgorithm::Sha384) => Some(&signature::ECDSA_P384_SHA384_FIXED_SIGNING),
        (EcdsaCurve::P521, HashAlgorithm::Sha512) => Some(&signature::ECDSA_P521_SHA512_FIXED_SIGNING),
        _ => None,
    }
}

/// Backend verification algorithm for a curve/hash pair, if provided
fn verification_algorithm(
    curve: EcdsaCurve,
    hash: HashAlgorithm,
) -> Option<&'static EcdsaVerificationAlgorithm> {
    match (curve, hash) {
        (EcdsaCurve::P256, HashAlgorithm::Sha256) => Some(&signature::ECDSA_P256_SHA256_FIXED),
        (EcdsaCurve::P384, HashAlgorithm::Sha384) => Some(&signature::ECDSA_P384_SHA384_FIXED),
        (EcdsaCurve::P521, HashAlgorithm::Sha512) => Some(&signature::ECDSA_P521_SHA512_FIXED),
        _ => None,
    }
}
