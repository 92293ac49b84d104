// src/auth.rs - Admin check (JWT bearer) and password hashing
use actix_web::http::header::Header;
use actix_web::HttpRequest;
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

// ======== AUTH SERVICE ========

/// Verifies bearer tokens minted by the identity service that shares
/// `JWT_SECRET`, and hashes passwords for storage.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(jwt_secret: &str, bcrypt_cost: u32) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            bcrypt_cost,
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, bcrypt::BcryptError> {
        hash(password, self.bcrypt_cost)
    }

    #[allow(dead_code)]
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
        verify(password, hash)
    }

    /// Tokens are normally minted by the identity service; kept for tooling and tests.
    #[allow(dead_code)]
    pub fn generate_token(&self, subject: &str, email: &str, role: &str, ttl: Duration) -> ApiResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&JwtHeader::default(), &claims, &self.encoding_key)
            .map_err(|_| ApiError::InternalServerError("Failed to generate token".to_string()))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default()).map(|data| data.claims)
    }

    /// Claims from a valid `Authorization: Bearer` header, if any.
    pub fn bearer_claims(&self, req: &HttpRequest) -> Option<Claims> {
        let bearer = Authorization::<Bearer>::parse(req).ok()?.into_scheme();

        match self.verify_token(bearer.token()) {
            Ok(claims) => Some(claims),
            Err(err) => {
                log::warn!("JWT verification failed: {}", err);
                None
            }
        }
    }

    pub fn is_admin(&self, req: &HttpRequest) -> bool {
        self.bearer_claims(req).map_or(false, |claims| claims.is_admin())
    }

    /// 401 with no further detail unless the caller holds the admin role.
    pub fn require_admin(&self, req: &HttpRequest) -> ApiResult<()> {
        if self.is_admin(req) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BCRYPT_MIN_COST;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::test::TestRequest;

    const SECRET: &str = "test_secret_that_is_long_enough_123456";

    fn service() -> AuthService {
        AuthService::new(SECRET, BCRYPT_MIN_COST)
    }

    fn request_with(token: &str) -> HttpRequest {
        TestRequest::default()
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request()
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let auth = service();
        let hashed = auth.hash_password("Secret123").unwrap();

        assert_ne!(hashed, "Secret123");
        assert!(auth.verify_password("Secret123", &hashed).unwrap());
        assert!(!auth.verify_password("secret123", &hashed).unwrap());
    }

    #[test]
    fn test_cost_bounds_match_bcrypt() {
        assert!(bcrypt::hash("Secret123", BCRYPT_MIN_COST).is_ok());
        assert!(bcrypt::hash("Secret123", BCRYPT_MIN_COST - 1).is_err());
    }

    #[test]
    fn test_admin_token_is_admin() {
        let auth = service();
        let token = auth.generate_token("u1", "admin@example.org", ADMIN_ROLE, Duration::hours(1)).unwrap();
        let req = request_with(&token);

        assert!(auth.is_admin(&req));
        assert!(auth.require_admin(&req).is_ok());
        assert_eq!(auth.bearer_claims(&req).unwrap().sub, "u1");
    }

    #[test]
    fn test_member_token_is_not_admin() {
        let auth = service();
        let token = auth.generate_token("u2", "m@example.org", "member", Duration::hours(1)).unwrap();
        let req = request_with(&token);

        assert!(!auth.is_admin(&req));
        assert!(matches!(auth.require_admin(&req), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_missing_header_is_not_admin() {
        let req = TestRequest::default().to_http_request();
        assert!(!service().is_admin(&req));
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let other = AuthService::new("another_secret_that_is_long_enough_99", BCRYPT_MIN_COST);
        let token = other.generate_token("u1", "a@example.org", ADMIN_ROLE, Duration::hours(1)).unwrap();

        assert!(!service().is_admin(&request_with(&token)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = service();
        let token = auth.generate_token("u1", "a@example.org", ADMIN_ROLE, Duration::hours(-2)).unwrap();

        assert!(!auth.is_admin(&request_with(&token)));
    }

    #[test]
    fn test_non_bearer_scheme_is_rejected() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Basic YWRtaW46YWRtaW4="))
            .to_http_request();
        assert!(!service().is_admin(&req));
    }
}
