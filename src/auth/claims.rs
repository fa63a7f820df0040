// Bearer token payload inspection
// A decode failure never aborts a request; the token is simply treated as
// carrying no user identifier.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use super::types::TokenClaims;

/// Extract the user identifier from a signed bearer token.
///
/// Expects the usual three dot-separated segments with a base64url JSON
/// payload in the middle. Any deviation (segment count, encoding, JSON
/// shape, missing subject) yields `None`.
pub fn user_id_from_token(token: &str) -> Option<String> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        tracing::debug!(
            segments = segments.len(),
            "Bearer token is not a three-segment token, skipping user-id header"
        );
        return None;
    }

    let payload = match URL_SAFE_NO_PAD.decode(segments[1]) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Failed to decode bearer token payload: {}", e);
            return None;
        }
    };

    let claims: TokenClaims = match serde_json::from_slice(&payload) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Failed to parse bearer token claims: {}", e);
            return None;
        }
    };

    claims.sub
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_token(payload: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode("signature")
        )
    }

    #[test]
    fn test_extracts_subject() {
        let token = make_token(r#"{"sub":"user-42","iss":"idm"}"#);
        assert_eq!(user_id_from_token(&token).as_deref(), Some("user-42"));
    }

    #[test]
    fn test_extracts_aliased_field() {
        let token = make_token(r#"{"userId":"user-7"}"#);
        assert_eq!(user_id_from_token(&token).as_deref(), Some("user-7"));
    }

    #[test]
    fn test_wrong_segment_count() {
        assert_eq!(user_id_from_token("opaque-token"), None);
        assert_eq!(user_id_from_token("two.segments"), None);
        assert_eq!(user_id_from_token("a.b.c.d"), None);
        assert_eq!(user_id_from_token(""), None);
    }

    #[test]
    fn test_invalid_base64_payload() {
        assert_eq!(user_id_from_token("header.!!not-base64!!.sig"), None);
    }

    #[test]
    fn test_payload_is_not_json() {
        let token = format!(
            "header.{}.sig",
            URL_SAFE_NO_PAD.encode("definitely not json")
        );
        assert_eq!(user_id_from_token(&token), None);
    }

    #[test]
    fn test_missing_subject_field() {
        let token = make_token(r#"{"iss":"idm","exp":1700000000}"#);
        assert_eq!(user_id_from_token(&token), None);
    }

    proptest! {
        // The decoder must tolerate arbitrary garbage without panicking
        #[test]
        fn test_never_panics(token in ".*") {
            let _ = user_id_from_token(&token);
        }
    }
}
