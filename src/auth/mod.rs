use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::ApiError;

/// Claims carried by an admin bearer token. Expiry is the only
/// invalidation mechanism; there is no revocation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

pub fn issue_access_token(cfg: &AuthConfig, identity: &str) -> Result<String, ApiError> {
    let expiry = Utc::now() + Duration::hours(cfg.token_ttl_hours);
    let claims = Claims {
        sub: identity.to_string(),
        exp: expiry.timestamp(),
    };
    encode(
        &Header::new(cfg.algorithm),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to encode access token: {e}")))
}

pub fn verify_access_token(cfg: &AuthConfig, token: &str) -> Result<String, ApiError> {
    let mut validation = Validation::new(cfg.algorithm);
    validation.leeway = 0;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims.sub)
    .map_err(|_| ApiError::Unauthenticated("Could not validate credentials".to_string()))
}

/// The single admin principal is configuration-bound; there is no user table.
pub fn check_admin_credentials(cfg: &AuthConfig, username: &str, password: &str) -> bool {
    username == cfg.admin_user && password == cfg.admin_pass
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
}

/// Gate for protected routes: extracts and validates the bearer token,
/// returning the embedded identity.
pub fn authorize(cfg: &AuthConfig, headers: &HeaderMap) -> Result<String, ApiError> {
    let token = bearer_token(headers)
        .ok_or_else(|| ApiError::Unauthenticated("Missing bearer token".to_string()))?;
    verify_access_token(cfg, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::Algorithm;

    fn test_auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            algorithm: Algorithm::HS256,
            token_ttl_hours: 8,
            admin_user: "admin".to_string(),
            admin_pass: "adminpass".to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let cfg = test_auth_config();
        let token = issue_access_token(&cfg, "admin").expect("issue failed");
        let identity = verify_access_token(&cfg, &token).expect("verify failed");
        assert_eq!(identity, "admin");
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut cfg = test_auth_config();
        cfg.token_ttl_hours = -1;
        let token = issue_access_token(&cfg, "admin").expect("issue failed");
        assert!(verify_access_token(&cfg, &token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let cfg = test_auth_config();
        let token = issue_access_token(&cfg, "admin").expect("issue failed");
        let mut other = test_auth_config();
        other.jwt_secret = "a-different-secret".to_string();
        assert!(verify_access_token(&other, &token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let cfg = test_auth_config();
        assert!(verify_access_token(&cfg, "not.a.token").is_err());
    }

    #[test]
    fn test_missing_identity_claim_rejected() {
        let cfg = test_auth_config();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = encode(
            &Header::new(cfg.algorithm),
            &serde_json::json!({ "exp": exp }),
            &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        )
        .expect("encode failed");
        assert!(verify_access_token(&cfg, &token).is_err());
    }

    #[test]
    fn test_check_admin_credentials() {
        let cfg = test_auth_config();
        assert!(check_admin_credentials(&cfg, "admin", "adminpass"));
        assert!(!check_admin_credentials(&cfg, "admin", "wrong"));
        assert!(!check_admin_credentials(&cfg, "root", "adminpass"));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("bearer abc123"),
        );
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic abc123"),
        );
        assert_eq!(bearer_token(&headers), None);

        headers.remove(header::AUTHORIZATION);
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_authorize_requires_header() {
        let cfg = test_auth_config();
        let headers = HeaderMap::new();
        assert!(matches!(
            authorize(&cfg, &headers),
            Err(ApiError::Unauthenticated(_))
        ));
    }
}
