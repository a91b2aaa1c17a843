use actix_web::{http::header, HttpRequest};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::UserRef;
use crate::services::relationships::RelationshipError;

/// Resolves the authenticated user of a request
///
/// The resolved id is handed to the relationship service as a plain argument.
pub trait CurrentUserProvider: Send + Sync {
    fn resolve(&self, req: &HttpRequest) -> Result<UserRef, RelationshipError>;
}

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Bearer-token provider backed by HS256 JWTs whose `sub` is the user id
pub struct JwtUserProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtUserProvider {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Sign a token for `user` valid for `ttl`
    pub fn issue(&self, user: UserRef, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error> {
        let exp = chrono::Utc::now().timestamp() as u64 + ttl.as_secs();
        let claims = Claims {
            sub: user.to_string(),
            exp: exp as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    fn verify(&self, token: &str) -> Result<UserRef, RelationshipError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!("Rejected session token: {}", e);
            RelationshipError::Unauthenticated
        })?;

        data.claims
            .sub
            .parse::<i64>()
            .map(UserRef)
            .map_err(|_| RelationshipError::Unauthenticated)
    }
}

impl CurrentUserProvider for JwtUserProvider {
    fn resolve(&self, req: &HttpRequest) -> Result<UserRef, RelationshipError> {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(RelationshipError::Unauthenticated)?;

        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_round_trip_through_header() {
        let provider = JwtUserProvider::new("test-secret");
        let token = provider.issue(UserRef(42), Duration::from_secs(60)).unwrap();

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        assert_eq!(provider.resolve(&req).unwrap(), UserRef(42));
    }

    #[test]
    fn test_missing_header_is_unauthenticated() {
        let provider = JwtUserProvider::new("test-secret");
        let req = TestRequest::default().to_http_request();

        assert!(matches!(
            provider.resolve(&req),
            Err(RelationshipError::Unauthenticated)
        ));
    }

    #[test]
    fn test_foreign_signature_is_unauthenticated() {
        let other = JwtUserProvider::new("other-secret");
        let token = other.issue(UserRef(1), Duration::from_secs(60)).unwrap();

        let provider = JwtUserProvider::new("test-secret");
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        assert!(matches!(
            provider.resolve(&req),
            Err(RelationshipError::Unauthenticated)
        ));
    }
}
