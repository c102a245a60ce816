/// Key material handed to signing methods
///
/// This module provides a type-safe abstraction over the key families:
/// - Symmetric secrets (for HMAC methods)
/// - RSA private/public keys (for PKCS#1 v1.5 and PSS methods)
/// - ECDSA private/public keys bound to a curve (for ECDSA methods)
///
/// Each signing method asks for the variant it needs through the `as_*`
/// accessors, which fail with [`Error::InvalidKeyType`] on a mismatch.
use crate::algorithm::ecdsa::signing_algorithm;
use crate::algorithm::HashAlgorithm;
use crate::error::{Error, Result};

use aws_lc_rs::signature::{EcdsaKeyPair, KeyPair, RsaKeyPair};
use std::fmt;
use std::sync::Arc;

/// A key that can be used to sign or verify a token
#[derive(Debug, Clone)]
pub enum Key {
    /// Shared secret for HMAC methods
    Symmetric(SymmetricKey),

    /// RSA private key, used for signing
    RsaPrivate(RsaPrivateKey),

    /// RSA public key, used for verification
    RsaPublic(RsaPublicKey),

    /// ECDSA private key, used for signing
    EcdsaPrivate(EcdsaPrivateKey),

    /// ECDSA public key, used for verification
    EcdsaPublic(EcdsaPublicKey),
}

impl Key {
    /// Create a symmetric key from bytes
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        Key::Symmetric(SymmetricKey::new(secret.into()))
    }

    /// Create an RSA private key from a PKCS#8 DER document
    pub fn rsa_private_pkcs8(der: &[u8]) -> Result<Self> {
        RsaPrivateKey::from_pkcs8(der).map(Key::RsaPrivate)
    }

    /// Create an RSA public key from DER (PKCS#1 `RSAPublicKey` or SPKI)
    pub fn rsa_public(der: impl Into<Vec<u8>>) -> Self {
        Key::RsaPublic(RsaPublicKey::new(der.into()))
    }

    /// Create an ECDSA private key on `curve` from a PKCS#8 DER document
    pub fn ecdsa_private_pkcs8(der: &[u8], curve: EcdsaCurve) -> Result<Self> {
        EcdsaPrivateKey::from_pkcs8(der, curve).map(Key::EcdsaPrivate)
    }

    /// Create an ECDSA public key on `curve` from its encoded point or SPKI DER
    pub fn ecdsa_public(bytes: impl Into<Vec<u8>>, curve: EcdsaCurve) -> Self {
        Key::EcdsaPublic(EcdsaPublicKey::new(bytes.into(), curve))
    }

    /// Get key type name for diagnostics
    pub fn key_type(&self) -> &'static str {
        match self {
            Key::Symmetric(_) => "Symmetric",
            Key::RsaPrivate(_) => "RSA private",
            Key::RsaPublic(_) => "RSA public",
            Key::EcdsaPrivate(_) => "ECDSA private",
            Key::EcdsaPublic(_) => "ECDSA public",
        }
    }

    /// Get as symmetric key or return error
    pub fn as_symmetric(&self) -> Result<&SymmetricKey> {
        match self {
            Key::Symmetric(key) => Ok(key),
            _ => Err(Error::InvalidKeyType),
        }
    }

    /// Get as RSA private key or return error
    pub fn as_rsa_private(&self) -> Result<&RsaPrivateKey> {
        match self {
            Key::RsaPrivate(key) => Ok(key),
            _ => Err(Error::InvalidKeyType),
        }
    }

    /// Get as RSA public key or return error
    pub fn as_rsa_public(&self) -> Result<&RsaPublicKey> {
        match self {
            Key::RsaPublic(key) => Ok(key),
            _ => Err(Error::InvalidKeyType),
        }
    }

    /// Get as ECDSA private key or return error
    pub fn as_ecdsa_private(&self) -> Result<&EcdsaPrivateKey> {
        match self {
            Key::EcdsaPrivate(key) => Ok(key),
            _ => Err(Error::InvalidKeyType),
        }
    }

    /// Get as ECDSA public key or return error
    pub fn as_ecdsa_public(&self) -> Result<&EcdsaPublicKey> {
        match self {
            Key::EcdsaPublic(key) => Ok(key),
            _ => Err(Error::InvalidKeyType),
        }
    }
}

/// Shared secret for HMAC methods
#[derive(Clone)]
pub struct SymmetricKey {
    secret: Vec<u8>,
}

impl SymmetricKey {
    /// Create a new symmetric key
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }

    /// Get the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("len", &self.secret.len())
            .finish_non_exhaustive()
    }
}

impl From<Vec<u8>> for SymmetricKey {
    fn from(secret: Vec<u8>) -> Self {
        Self::new(secret)
    }
}

impl From<&[u8]> for SymmetricKey {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret.to_vec())
    }
}

impl From<String> for SymmetricKey {
    fn from(secret: String) -> Self {
        Self::new(secret.into_bytes())
    }
}

impl From<&str> for SymmetricKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes().to_vec())
    }
}

/// RSA private key, parsed once and shared between clones
#[derive(Clone)]
pub struct RsaPrivateKey {
    pair: Arc<RsaKeyPair>,
}

impl RsaPrivateKey {
    /// Parse a PKCS#8 DER document
    pub fn from_pkcs8(der: &[u8]) -> Result<Self> {
        let pair = RsaKeyPair::from_pkcs8(der).map_err(|_| Error::InvalidKey)?;
        Ok(Self {
            pair: Arc::new(pair),
        })
    }

    /// The matching public key
    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey::new(self.pair.public_key().as_ref().to_vec())
    }

    /// Modulus length in bytes, which is also the signature length
    pub fn modulus_len(&self) -> usize {
        self.pair.public_modulus_len()
    }

    pub(crate) fn key_pair(&self) -> &RsaKeyPair {
        &self.pair
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("modulus_len", &self.modulus_len())
            .finish_non_exhaustive()
    }
}

/// RSA public key (DER-encoded)
#[derive(Debug, Clone)]
pub struct RsaPublicKey {
    der: Vec<u8>,
}

impl RsaPublicKey {
    /// Create a new RSA public key from DER bytes
    pub fn new(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// Get the DER-encoded key bytes
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

/// ECDSA curve identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcdsaCurve {
    /// P-256 (secp256r1) curve
    P256,
    /// P-384 (secp384r1) curve
    P384,
    /// P-521 (secp521r1) curve
    P521,
}

impl EcdsaCurve {
    /// Curve order size in bits
    pub const fn bits(self) -> usize {
        match self {
            EcdsaCurve::P256 => 256,
            EcdsaCurve::P384 => 384,
            EcdsaCurve::P521 => 521,
        }
    }

    /// Byte length of one signature component
    pub const fn key_size(self) -> usize {
        self.bits().div_ceil(8)
    }

    /// Curve matching a bit size, if supported
    pub const fn from_bits(bits: usize) -> Option<Self> {
        match bits {
            256 => Some(EcdsaCurve::P256),
            384 => Some(EcdsaCurve::P384),
            521 => Some(EcdsaCurve::P521),
            _ => None,
        }
    }

    /// Hash conventionally paired with this curve in JWS
    pub const fn default_hash(self) -> HashAlgorithm {
        match self {
            EcdsaCurve::P256 => HashAlgorithm::Sha256,
            EcdsaCurve::P384 => HashAlgorithm::Sha384,
            EcdsaCurve::P521 => HashAlgorithm::Sha512,
        }
    }
}

/// ECDSA private key (PKCS#8 DER) bound to its curve
#[derive(Clone)]
pub struct EcdsaPrivateKey {
    pkcs8: Arc<[u8]>,
    curve: EcdsaCurve,
}

impl EcdsaPrivateKey {
    /// Parse a PKCS#8 DER document for `curve`
    ///
    /// Fails with [`Error::InvalidKey`] when the document does not hold a key
    /// on that curve.
    pub fn from_pkcs8(der: &[u8], curve: EcdsaCurve) -> Result<Self> {
        let key = Self {
            pkcs8: Arc::from(der),
            curve,
        };
        key.key_pair(curve.default_hash())?;
        Ok(key)
    }

    /// The curve the key lives on
    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }

    /// The matching public key (uncompressed point)
    pub fn public_key(&self) -> Result<EcdsaPublicKey> {
        let pair = self.key_pair(self.curve.default_hash())?;
        Ok(EcdsaPublicKey::new(
            pair.public_key().as_ref().to_vec(),
            self.curve,
        ))
    }

    /// Load the key pair for signing with `hash`
    pub(crate) fn key_pair(&self, hash: HashAlgorithm) -> Result<EcdsaKeyPair> {
        let alg = signing_algorithm(self.curve, hash).ok_or(Error::HashUnavailable)?;
        EcdsaKeyPair::from_pkcs8(alg, &self.pkcs8).map_err(|_| Error::InvalidKey)
    }
}

impl fmt::Debug for EcdsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaPrivateKey")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}

/// ECDSA public key bound to its curve
#[derive(Debug, Clone)]
pub struct EcdsaPublicKey {
    bytes: Vec<u8>,
    curve: EcdsaCurve,
}

impl EcdsaPublicKey {
    /// Create a new ECDSA public key
    pub fn new(bytes: Vec<u8>, curve: EcdsaCurve) -> Self {
        Self { bytes, curve }
    }

    /// Get the encoded key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the curve
    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }
}
