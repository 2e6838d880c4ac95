//! Login-hint payload carried by the event QR codes.

use serde::Deserialize;

use crate::error::ApiError;

/// Server address and username pre-filled from a scanned QR code.
///
/// Only these two fields are read; anything else in the payload is
/// ignored. The scanner itself is the host application's concern, the core
/// just consumes the decoded text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginHint {
    pub url: String,
    pub user: String,
}

impl LoginHint {
    /// Parse a decoded QR payload. A malformed payload is an error the
    /// caller reports without touching previously entered form fields.
    pub fn parse(payload: &str) -> Result<Self, ApiError> {
        serde_json::from_str(payload).map_err(|e| ApiError::MalformedPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_url_and_user() {
        let hint = LoginHint::parse(r#"{"url":"https://sztab.example.org","user":"anna"}"#)
            .unwrap();
        assert_eq!(hint.url, "https://sztab.example.org");
        assert_eq!(hint.user, "anna");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let hint =
            LoginHint::parse(r#"{"url":"https://x","user":"u","version":3,"extra":"y"}"#).unwrap();
        assert_eq!(hint.user, "u");
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            LoginHint::parse("WIFI:T:WPA;S:hall;;"),
            Err(ApiError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_missing_field_rejected() {
        assert!(LoginHint::parse(r#"{"url":"https://x"}"#).is_err());
    }
}
