//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use techpack_core::config::auth::AuthConfig;
use techpack_core::error::AppError;

use super::claims::AccessClaims;

/// Validates JWT access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks signature validity and expiration.
    pub fn decode_access_token(&self, token: &str) -> Result<AccessClaims, AppError> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::unauthorized("Invalid token format")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::unauthorized("Invalid token signature")
                }
                _ => AppError::unauthorized(format!("Token validation failed: {e}")),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;

    use super::*;
    use crate::jwt::encoder::JwtEncoder;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-at-least-long-enough".to_string(),
            jwt_access_ttl_minutes: 15,
        }
    }

    #[test]
    fn round_trip_preserves_subject() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let (token, _) = JwtEncoder::new(&config)
            .issue_access_token(user_id)
            .unwrap();
        let claims = JwtDecoder::new(&config).decode_access_token(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = JwtDecoder::new(&config)
            .decode_access_token(&token)
            .unwrap_err();
        assert_eq!(err.kind, techpack_core::error::ErrorKind::Unauthorized);
        assert!(err.message.contains("expired"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let (token, _) = JwtEncoder::new(&config)
            .issue_access_token(Uuid::new_v4())
            .unwrap();

        let other = AuthConfig {
            jwt_secret: "a-different-secret-entirely".to_string(),
            ..test_config()
        };
        let err = JwtDecoder::new(&other)
            .decode_access_token(&token)
            .unwrap_err();
        assert_eq!(err.kind, techpack_core::error::ErrorKind::Unauthorized);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let config = test_config();
        assert!(
            JwtDecoder::new(&config)
                .decode_access_token("not-a-jwt")
                .is_err()
        );
    }
}
