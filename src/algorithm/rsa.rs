use crate::algorithm::{HashAlgorithm, SigningMethod};
use crate::error::{Error, Result};
use crate::keys::{Key, RsaPrivateKey, RsaPublicKey};
use crate::utils::base64url;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, RsaEncoding, UnparsedPublicKey, VerificationAlgorithm};

/// RSASSA-PKCS1-v1_5 signing method
///
/// Signing takes a [`Key::RsaPrivate`], verification a [`Key::RsaPublic`].
///
/// Verification only accepts moduli of 2048 to 8192 bits. A public key
/// outside that range fails like a bad signature, with
/// [`Error::SignatureInvalid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaMethod {
    name: &'static str,
    hash: HashAlgorithm,
}

/// RS256 (RSASSA-PKCS1-v1_5 with SHA-256)
pub const RS256: RsaMethod = RsaMethod::new("RS256", HashAlgorithm::Sha256);

/// RS384 (RSASSA-PKCS1-v1_5 with SHA-384)
pub const RS384: RsaMethod = RsaMethod::new("RS384", HashAlgorithm::Sha384);

/// RS512 (RSASSA-PKCS1-v1_5 with SHA-512)
pub const RS512: RsaMethod = RsaMethod::new("RS512", HashAlgorithm::Sha512);

impl RsaMethod {
    /// Declare an RSA method under `name`
    pub const fn new(name: &'static str, hash: HashAlgorithm) -> Self {
        Self { name, hash }
    }

    /// The declared hash
    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    /// Key-type check for signing
    pub(crate) fn signing_key<'k>(&self, key: &'k Key) -> Result<&'k RsaPrivateKey> {
        key.as_rsa_private()
    }

    /// Key-type check for verification
    pub(crate) fn verifying_key<'k>(&self, key: &'k Key) -> Result<&'k RsaPublicKey> {
        key.as_rsa_public()
    }
}

impl SigningMethod for RsaMethod {
    fn algorithm(&self) -> &str {
        self.name
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<String> {
        let private_key = self.signing_key(key)?;
        sign_rsa(signing_input, private_key, pkcs1_encoding(self.hash))
    }

    fn verify(&self, signing_input: &str, signature: &str, key: &Key) -> Result<()> {
        let public_key = self.verifying_key(key)?;
        verify_rsa(
            signing_input,
            signature,
            public_key.as_der(),
            pkcs1_verification(self.hash),
        )
    }
}

fn pkcs1_encoding(hash: HashAlgorithm) -> &'static dyn RsaEncoding {
    match hash {
        HashAlgorithm::Sha256 => &signature::RSA_PKCS1_SHA256,
        HashAlgorithm::Sha384 => &signature::RSA_PKCS1_SHA384,
        HashAlgorithm::Sha512 => &signature::RSA_PKCS1_SHA512,
    }
}

fn pkcs1_verification(hash: HashAlgorithm) -> &'static dyn VerificationAlgorithm {
    match hash {
        HashAlgorithm::Sha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
        HashAlgorithm::Sha384 => &signature::RSA_PKCS1_2048_8192_SHA384,
        HashAlgorithm::Sha512 => &signature::RSA_PKCS1_2048_8192_SHA512,
    }
}

/// Sign the input with the given padding and encode the result
pub(crate) fn sign_rsa(
    signing_input: &str,
    private_key: &RsaPrivateKey,
    encoding: &'static dyn RsaEncoding,
) -> Result<String> {
    let rng = SystemRandom::new();
    let mut signature_bytes = vec![0u8; private_key.modulus_len()];
    private_key
        .key_pair()
        .sign(encoding, &rng, signing_input.as_bytes(), &mut signature_bytes)
        .map_err(|_| Error::Signing("rsa signing rejected".to_string()))?;

    Ok(base64url::encode_bytes(signature_bytes))
}

/// Generic RSA signature verification
pub(crate) fn verify_rsa(
    signing_input: &str,
    signature: &str,
    public_key_der: &[u8],
    algorithm: &'static dyn VerificationAlgorithm,
) -> Result<()> {
    let signature_bytes = base64url::decode_bytes(signature)?;

    let public_key = UnparsedPublicKey::new(algorithm, public_key_der);

    public_key
        .verify(signing_input.as_bytes(), &signature_bytes)
        .map_err(|_| Error::SignatureInvalid)
}
