//! Shared fixtures for the integration tests
//!
//! Key generation is slow (RSA in particular), so every key is generated
//! once per test binary and cloned out of a `OnceLock`.

#![allow(dead_code)]

use jwtkit::keys::{EcdsaPrivateKey, RsaPrivateKey};
use jwtkit::*;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    EcdsaKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING, ECDSA_P384_SHA384_ASN1_SIGNING,
    ECDSA_P521_SHA512_ASN1_SIGNING,
};
use rsa::pkcs8::EncodePrivateKey;
use std::sync::{Arc, OnceLock};

pub const SECRET: &[u8] = b"integration-test-secret";

/// Fixed "now" for tests that inject a clock
pub const NOW: i64 = 1_700_000_000;

pub fn fixed_clock() -> i64 {
    NOW
}

/// Route `tracing` output through the test harness (`RUST_LOG=jwtkit=debug`)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn rsa_private_key() -> RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = rand::thread_rng();
        let key = rsa::RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate key");
        let pkcs8 = key.to_pkcs8_der().expect("Failed to serialize to PKCS#8");
        RsaPrivateKey::from_pkcs8(pkcs8.as_bytes()).expect("Failed to load RSA key")
    })
    .clone()
}

pub fn ecdsa_private_key(curve: EcdsaCurve) -> EcdsaPrivateKey {
    static KEYS: OnceLock<[EcdsaPrivateKey; 3]> = OnceLock::new();
    let keys = KEYS.get_or_init(|| {
        [EcdsaCurve::P256, EcdsaCurve::P384, EcdsaCurve::P521].map(generate_ecdsa_key)
    });
    match curve {
        EcdsaCurve::P256 => keys[0].clone(),
        EcdsaCurve::P384 => keys[1].clone(),
        EcdsaCurve::P521 => keys[2].clone(),
    }
}

fn generate_ecdsa_key(curve: EcdsaCurve) -> EcdsaPrivateKey {
    let alg = match curve {
        EcdsaCurve::P256 => &ECDSA_P256_SHA256_ASN1_SIGNING,
        EcdsaCurve::P384 => &ECDSA_P384_SHA384_ASN1_SIGNING,
        EcdsaCurve::P521 => &ECDSA_P521_SHA512_ASN1_SIGNING,
    };
    let pkcs8 =
        EcdsaKeyPair::generate_pkcs8(alg, &SystemRandom::new()).expect("Failed to generate key");
    EcdsaPrivateKey::from_pkcs8(pkcs8.as_ref(), curve).expect("Failed to load ECDSA key")
}

/// Signing and verification keys for a registered algorithm name
pub fn key_pair_for(alg: &str) -> (Key, Key) {
    match &alg[..2] {
        "HS" => (Key::symmetric(SECRET), Key::symmetric(SECRET)),
        "RS" | "PS" => {
            let private_key = rsa_private_key();
            let public_key = private_key.public_key();
            (Key::RsaPrivate(private_key), Key::RsaPublic(public_key))
        }
        "ES" => {
            let curve = match alg {
                "ES256" => EcdsaCurve::P256,
                "ES384" => EcdsaCurve::P384,
                _ => EcdsaCurve::P521,
            };
            let private_key = ecdsa_private_key(curve);
            let public_key = private_key.public_key().expect("public key");
            (Key::EcdsaPrivate(private_key), Key::EcdsaPublic(public_key))
        }
        other => panic!("no test keys for {other}"),
    }
}

/// Key callback that always hands out `key`
pub fn key_returning(key: Key) -> impl Fn(&Token) -> Result<Key> {
    move |_: &Token| Ok(key.clone())
}

pub fn secret_keyfunc(_: &Token) -> Result<Key> {
    Ok(Key::symmetric(SECRET))
}

/// HS256 token over `claims`, signed with [`SECRET`]
pub fn hs256_token(claims: impl Into<TokenClaims>) -> String {
    Token::new_with_claims(Arc::new(HS256), claims)
        .generate(&Key::symmetric(SECRET))
        .expect("signing failed")
}

/// Compact token assembled from raw JSON segments
pub fn raw_token(header_json: &str, claims_json: &str, signature: &str) -> String {
    format!(
        "{}.{}.{}",
        utils::encode(header_json),
        utils::encode(claims_json),
        signature
    )
}
