use crate::algorithm::{HashAlgorithm, SigningMethod};
use crate::error::{Error, Result};
use crate::keys::Key;
use crate::utils::base64url;

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// HMAC signing method over a SHA-2 hash
///
/// The key is a shared secret ([`Key::Symmetric`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmacMethod {
    name: &'static str,
    hash: HashAlgorithm,
}

/// HS256 (HMAC with SHA-256)
pub const HS256: HmacMethod = HmacMethod::new("HS256", HashAlgorithm::Sha256);

/// HS384 (HMAC with SHA-384)
pub const HS384: HmacMethod = HmacMethod::new("HS384", HashAlgorithm::Sha384);

/// HS512 (HMAC with SHA-512)
pub const HS512: HmacMethod = HmacMethod::new("HS512", HashAlgorithm::Sha512);

impl HmacMethod {
    /// Declare an HMAC method under `name`
    pub const fn new(name: &'static str, hash: HashAlgorithm) -> Self {
        Self { name, hash }
    }

    /// The declared hash
    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }
}

impl SigningMethod for HmacMethod {
    fn algorithm(&self) -> &str {
        self.name
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<String> {
        let secret = key.as_symmetric()?;
        let tag = compute_tag(self.hash, secret.as_bytes(), signing_input)?;
        Ok(base64url::encode_bytes(tag))
    }

    fn verify(&self, signing_input: &str, signature: &str, key: &Key) -> Result<()> {
        let secret = key.as_symmetric()?;
        let provided_signature = base64url::decode_bytes(signature)?;
        let expected_signature = compute_tag(self.hash, secret.as_bytes(), signing_input)?;

        if constant_time_eq(&provided_signature, &expected_signature) {
            Ok(())
        } else {
            Err(Error::SignatureInvalid)
        }
    }
}

/// Keyed hash of the signing input
fn compute_tag(hash: HashAlgorithm, secret: &[u8], signing_input: &str) -> Result<Vec<u8>> {
    let tag = match hash {
        HashAlgorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(secret).map_err(|_| Error::InvalidKey)?;
            mac.update(signing_input.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha384 => {
            let mut mac = Hmac::<Sha384>::new_from_slice(secret).map_err(|_| Error::InvalidKey)?;
            mac.update(signing_input.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(secret).map_err(|_| Error::InvalidKey)?;
            mac.update(signing_input.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
    };
    Ok(tag)
}
