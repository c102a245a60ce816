//! Parser behaviour table: which flags and which message each failure yields

mod common;

use common::*;
use jwtkit::*;
use std::cell::Cell;

fn temporal_claims(exp: Option<i64>, nbf: Option<i64>, iat: Option<i64>) -> StandardClaims {
    StandardClaims {
        expires_at: exp,
        not_before: nbf,
        issued_at: iat,
        ..Default::default()
    }
}

fn parse_standard(compact: &str) -> std::result::Result<Token, ParseError> {
    Parser::new()
        .with_clock(fixed_clock)
        .parse_with_claims(compact, ClaimsKind::Standard, Some(&secret_keyfunc))
}

#[test]
fn claims_failures_map_to_flags() {
    init_tracing();

    let cases: [(&str, StandardClaims, ValidationFlags, &str); 5] = [
        (
            "expired",
            temporal_claims(Some(NOW - 100), None, None),
            ValidationFlags::EXPIRED,
            "token is expired",
        ),
        (
            "not yet valid",
            temporal_claims(None, Some(NOW + 100), None),
            ValidationFlags::NOT_VALID_YET,
            "token is not valid yet",
        ),
        (
            "used before issued",
            temporal_claims(None, None, Some(NOW + 100)),
            ValidationFlags::ISSUED_AT,
            "token used before issued",
        ),
        (
            "expired and not yet valid",
            temporal_claims(Some(NOW - 100), Some(NOW + 100), None),
            ValidationFlags::EXPIRED | ValidationFlags::NOT_VALID_YET,
            "token is not valid yet",
        ),
        (
            "every temporal check",
            temporal_claims(Some(NOW - 100), Some(NOW + 100), Some(NOW + 100)),
            ValidationFlags::EXPIRED | ValidationFlags::ISSUED_AT | ValidationFlags::NOT_VALID_YET,
            "token is not valid yet",
        ),
    ];

    for (name, claims, flags, message) in cases {
        let compact = hs256_token(claims);
        let err = parse_standard(&compact).unwrap_err();

        assert_eq!(err.flags(), flags, "{name}");
        assert_eq!(err.to_string(), message, "{name}");

        // The decoded token still comes back for diagnostics, never valid
        let token = err.token().expect("partial token");
        assert!(!token.is_valid(), "{name}");
        assert!(token.claims().is_some(), "{name}");
    }
}

#[test]
fn boundaries_are_inclusive() {
    let compact = hs256_token(temporal_claims(Some(NOW), Some(NOW), Some(NOW)));
    assert!(parse_standard(&compact).unwrap().is_valid());
}

#[test]
fn expired_token_with_bad_signature_reports_both() {
    let compact = hs256_token(temporal_claims(Some(NOW - 100), None, None));
    let keyfunc = key_returning(Key::symmetric(b"another-secret".to_vec()));

    let err = Parser::new()
        .with_clock(fixed_clock)
        .parse_with_claims(&compact, ClaimsKind::Standard, Some(&keyfunc))
        .unwrap_err();
    assert_eq!(
        err.flags(),
        ValidationFlags::EXPIRED | ValidationFlags::SIGNATURE_INVALID
    );
    // The signature failure is detected last, so its message wins
    assert!(matches!(err.validation().cause(), Some(Error::SignatureInvalid)));
    assert_eq!(err.to_string(), "signature is invalid");
}

#[test]
fn wrong_secret_is_signature_invalid() {
    let compact = hs256_token(MapClaims::new());
    let keyfunc = key_returning(Key::symmetric(b"another-secret".to_vec()));

    let err = Parser::new().parse(&compact, Some(&keyfunc)).unwrap_err();
    assert_eq!(err.flags(), ValidationFlags::SIGNATURE_INVALID);
    assert_eq!(err.to_string(), "signature is invalid");
    assert_eq!(err.token().unwrap().signature(), compact.rsplit('.').next().unwrap());
}

#[test]
fn missing_keyfunc_is_unverifiable() {
    let compact = hs256_token(MapClaims::new());

    let err = Parser::new().parse(&compact, None).unwrap_err();
    assert_eq!(err.flags(), ValidationFlags::UNVERIFIABLE);
    assert_eq!(err.to_string(), "no Keyfunc was provided");
    assert!(err.token().is_some());
}

#[test]
fn keyfunc_error_is_wrapped_as_unverifiable() {
    fn failing(_: &Token) -> Result<Key> {
        Err(Error::KeyRetrieval("key store offline".to_string()))
    }

    let compact = hs256_token(MapClaims::new());
    let err = Parser::new().parse(&compact, Some(&failing)).unwrap_err();

    assert_eq!(err.flags(), ValidationFlags::UNVERIFIABLE);
    assert!(matches!(err.validation().cause(), Some(Error::KeyRetrieval(_))));
    assert_eq!(err.to_string(), "key retrieval failed: key store offline");
}

#[test]
fn keyfunc_validation_error_passes_through_unchanged() {
    fn rejecting(_: &Token) -> Result<Key> {
        Err(ValidationError::with_message(
            "unknown issuer",
            ValidationFlags::ISSUER | ValidationFlags::CLAIMS_INVALID,
        )
        .into())
    }

    let compact = hs256_token(MapClaims::new());
    let err = Parser::new().parse(&compact, Some(&rejecting)).unwrap_err();

    assert_eq!(
        err.flags(),
        ValidationFlags::ISSUER | ValidationFlags::CLAIMS_INVALID
    );
    assert_eq!(err.to_string(), "unknown issuer");
    assert!(!err.has(ValidationFlags::UNVERIFIABLE));
}

#[test]
fn keyfunc_empty_validation_error_is_unverifiable() {
    fn rejecting(_: &Token) -> Result<Key> {
        Err(ValidationError::new().into())
    }

    let compact = hs256_token(MapClaims::new());
    let err = Parser::new().parse(&compact, Some(&rejecting)).unwrap_err();

    assert_eq!(err.flags(), ValidationFlags::UNVERIFIABLE);
    assert!(!err.validation().is_valid());
    assert!(!err.token().unwrap().is_valid());
}

#[test]
fn keyfunc_sees_decoded_token() {
    let mut claims = MapClaims::new();
    claims.insert("iss", "https://issuer.example");
    let compact = hs256_token(claims);

    let seen = Cell::new(false);
    let keyfunc = |token: &Token| {
        seen.set(true);
        assert_eq!(token.header().algorithm(), Some("HS256"));
        assert!(token.claims().unwrap().verify_issuer("https://issuer.example", true));
        assert!(!token.is_valid());
        assert!(token.signature().is_empty());
        Ok::<_, Error>(Key::symmetric(SECRET))
    };

    let token = Parser::new().parse(&compact, Some(&keyfunc)).unwrap();
    assert!(seen.get());
    assert!(token.is_valid());
}

#[test]
fn allow_list_rejects_before_key_retrieval() {
    let compact = hs256_token(MapClaims::new());

    let calls = Cell::new(0);
    let keyfunc = |_: &Token| {
        calls.set(calls.get() + 1);
        Ok::<_, Error>(Key::symmetric(SECRET))
    };

    let parser = Parser::new().valid_methods(["RS256", "ES256"]);
    let err = parser.parse(&compact, Some(&keyfunc)).unwrap_err();

    assert_eq!(err.flags(), ValidationFlags::SIGNATURE_INVALID);
    assert_eq!(err.to_string(), "signing method HS256 is invalid");
    assert_eq!(calls.get(), 0);

    let parser = Parser::new().valid_methods(["RS256", "HS256"]);
    assert!(parser.parse(&compact, Some(&keyfunc)).is_ok());
    assert_eq!(calls.get(), 1);
}

#[test]
fn empty_allow_list_rejects_everything() {
    let compact = hs256_token(MapClaims::new());
    let parser = Parser::new().valid_methods(Vec::<String>::new());

    let err = parser.parse(&compact, Some(&secret_keyfunc)).unwrap_err();
    assert_eq!(err.flags(), ValidationFlags::SIGNATURE_INVALID);
}

#[test]
fn skip_claims_validation_still_checks_signature() {
    let compact = hs256_token(temporal_claims(Some(NOW - 100), None, None));
    let parser = Parser::new()
        .with_clock(fixed_clock)
        .skip_claims_validation(true);

    let token = parser
        .parse_with_claims(&compact, ClaimsKind::Standard, Some(&secret_keyfunc))
        .unwrap();
    assert!(token.is_valid());

    let keyfunc = key_returning(Key::symmetric(b"wrong".to_vec()));
    let err = parser
        .parse_with_claims(&compact, ClaimsKind::Standard, Some(&keyfunc))
        .unwrap_err();
    assert_eq!(err.flags(), ValidationFlags::SIGNATURE_INVALID);
}

#[test]
fn map_claims_are_validated_too() {
    let mut claims = MapClaims::new();
    claims.insert("exp", NOW - 1);
    claims.insert("nbf", NOW + 1);
    let compact = hs256_token(claims);

    let err = Parser::new()
        .with_clock(fixed_clock)
        .parse(&compact, Some(&secret_keyfunc))
        .unwrap_err();
    assert_eq!(
        err.flags(),
        ValidationFlags::EXPIRED | ValidationFlags::NOT_VALID_YET
    );
}

#[test]
fn real_clock_is_used_by_default() {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let fresh = hs256_token(temporal_claims(Some(now + 3600), None, Some(now - 10)));
    assert!(Parser::new()
        .parse_with_claims(&fresh, ClaimsKind::Standard, Some(&secret_keyfunc))
        .is_ok());

    let stale = hs256_token(temporal_claims(Some(now - 3600), None, None));
    let err = Parser::new()
        .parse_with_claims(&stale, ClaimsKind::Standard, Some(&secret_keyfunc))
        .unwrap_err();
    assert!(err.has(ValidationFlags::EXPIRED));
}

#[test]
fn parse_unverified_skips_key_and_checks() {
    let compact = hs256_token(temporal_claims(Some(NOW - 100), None, None));
    let forged = format!("{}.AAAA", compact.rsplit_once('.').unwrap().0);

    let token = Parser::new()
        .parse_unverified(&forged, ClaimsKind::Standard)
        .unwrap();

    assert!(!token.is_valid());
    assert!(token.signature().is_empty());
    assert_eq!(token.method().unwrap().algorithm(), "HS256");
    assert_eq!(
        token.claims().and_then(TokenClaims::as_standard).unwrap().expires_at,
        Some(NOW - 100)
    );
}

#[test]
fn json_number_mode_preserves_precision() {
    let compact = {
        let header = r#"{"alg":"HS256","typ":"JWT"}"#;
        let claims = r#"{"id":12345678901234567890123,"ratio":0.1}"#;
        let signing_input = format!("{}.{}", utils::encode(header), utils::encode(claims));
        let signature = HS256
            .sign(&signing_input, &Key::symmetric(SECRET))
            .unwrap();
        format!("{signing_input}.{signature}")
    };

    let token = Parser::new()
        .use_json_number(true)
        .parse(&compact, Some(&secret_keyfunc))
        .unwrap();
    let claims = token.claims().and_then(TokenClaims::as_map).unwrap();
    assert_eq!(claims["id"].to_string(), "12345678901234567890123");
    assert_eq!(claims["ratio"].to_string(), "0.1");

    let token = Parser::new().parse(&compact, Some(&secret_keyfunc)).unwrap();
    let claims = token.claims().and_then(TokenClaims::as_map).unwrap();
    assert_ne!(claims["id"].to_string(), "12345678901234567890123");
    assert_eq!(claims["id"].as_f64(), Some(1.2345678901234568e22));
}
