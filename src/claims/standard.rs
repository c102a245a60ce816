use crate::claims::{verify_exp, verify_iat, verify_nbf, verify_string, Claims};

use serde::{Deserialize, Serialize};

/// Reserved JWT claims as defined in RFC 7519 Section 4.1
///
/// Absent fields are omitted when serialized and pass every check that does
/// not require them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardClaims {
    /// Audience (aud) - the recipient the token is intended for
    #[serde(rename = "aud", default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    /// Expiration Time (exp) - seconds since the Unix epoch
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,

    /// JWT ID (jti) - unique identifier for the token
    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Issued At (iat) - seconds since the Unix epoch
    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,

    /// Issuer (iss) - the principal that issued the token
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Not Before (nbf) - seconds since the Unix epoch
    #[serde(rename = "nbf", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<i64>,

    /// Subject (sub) - the principal the token is about
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Claims for StandardClaims {
    fn verify_audience(&self, cmp: &str, required: bool) -> bool {
        verify_string(self.audience.as_deref(), cmp, required)
    }

    fn verify_expires_at(&self, now: i64, required: bool) -> bool {
        verify_exp(self.expires_at, now, required)
    }

    fn verify_issued_at(&self, now: i64, required: bool) -> bool {
        verify_iat(self.issued_at, now, required)
    }

    fn verify_issuer(&self, cmp: &str, required: bool) -> bool {
        verify_string(self.issuer.as_deref(), cmp, required)
    }

    fn verify_not_before(&self, now: i64, required: bool) -> bool {
        verify_nbf(self.not_before, now, required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_reserved_names() {
        let json = r#"{"aud":"api","exp":1700000100,"jti":"id-1","iat":1700000000,"iss":"issuer","nbf":1700000000,"sub":"user"}"#;
        let claims: StandardClaims = serde_json::from_str(json).unwrap();

        assert_eq!(claims.audience.as_deref(), Some("api"));
        assert_eq!(claims.expires_at, Some(1_700_000_100));
        assert_eq!(claims.id.as_deref(), Some("id-1"));
        assert_eq!(claims.issued_at, Some(1_700_000_000));
        assert_eq!(claims.issuer.as_deref(), Some("issuer"));
        assert_eq!(claims.not_before, Some(1_700_000_000));
        assert_eq!(claims.subject.as_deref(), Some("user"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let claims: StandardClaims = serde_json::from_str(r#"{"sub":"user","admin":true}"#).unwrap();
        assert_eq!(claims.subject.as_deref(), Some("user"));
    }

    #[test]
    fn test_wrongly_typed_field_is_rejected() {
        assert!(serde_json::from_str::<StandardClaims>(r#"{"exp":"tomorrow"}"#).is_err());
        assert!(serde_json::from_str::<StandardClaims>(r#"{"aud":["a","b"]}"#).is_err());
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let claims = StandardClaims {
            expires_at: Some(42),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&claims).unwrap(), r#"{"exp":42}"#);
    }

    #[test]
    fn test_verify_fields() {
        let claims = StandardClaims {
            audience: Some("api".to_string()),
            expires_at: Some(100),
            issued_at: Some(50),
            issuer: Some("issuer".to_string()),
            not_before: Some(60),
            ..Default::default()
        };

        assert!(claims.verify_audience("api", true));
        assert!(!claims.verify_audience("web", false));
        assert!(claims.verify_issuer("issuer", true));
        assert!(claims.verify_expires_at(100, true));
        assert!(!claims.verify_expires_at(101, true));
        assert!(claims.verify_issued_at(50, true));
        assert!(!claims.verify_issued_at(49, true));
        assert!(claims.verify_not_before(60, true));
        assert!(!claims.verify_not_before(59, true));

        assert!(claims.valid_at(80).is_ok());
    }

    #[test]
    fn test_required_missing_fields() {
        let claims = StandardClaims::default();
        assert!(!claims.verify_audience("api", true));
        assert!(!claims.verify_expires_at(0, true));
        assert!(claims.verify_issuer("issuer", false));
    }
}
