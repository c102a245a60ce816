//! Key material shared by the algorithm unit tests
//!
//! RSA key generation is slow, so one key is generated per test binary.

use crate::keys::{EcdsaCurve, EcdsaPrivateKey, RsaPrivateKey};

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    EcdsaKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING, ECDSA_P384_SHA384_ASN1_SIGNING,
    ECDSA_P521_SHA512_ASN1_SIGNING,
};
use rsa::pkcs8::EncodePrivateKey;
use std::sync::OnceLock;

pub(crate) fn rsa_private_key() -> RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = rand::thread_rng();
        let key = rsa::RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate key");
        let pkcs8 = key.to_pkcs8_der().expect("Failed to serialize to PKCS#8");
        RsaPrivateKey::from_pkcs8(pkcs8.as_bytes()).expect("Failed to load RSA key")
    })
    .clone()
}

pub(crate) fn ecdsa_private_key(curve: EcdsaCurve) -> EcdsaPrivateKey {
    let alg = match curve {
        EcdsaCurve::P256 => &ECDSA_P256_SHA256_ASN1_SIGNING,
        EcdsaCurve::P384 => &ECDSA_P384_SHA384_ASN1_SIGNING,
        EcdsaCurve::P521 => &ECDSA_P521_SHA512_ASN1_SIGNING,
    };
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(alg, &SystemRandom::new()).expect("Failed to generate key");
    EcdsaPrivateKey::from_pkcs8(pkcs8.as_ref(), curve).expect("Failed to load ECDSA key")
}
