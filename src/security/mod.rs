use crate::config::SecurityConfig;
use crate::error::Error;
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

pub mod auth;

pub use auth::AuthService;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (operator identifier)
    pub sub: String,
    /// Operator display name
    pub name: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Issued token with its metadata
#[derive(Debug, Clone, Serialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Security service for signing and validating operator tokens
pub struct SecurityService {
    config: SecurityConfig,
}

impl SecurityService {
    /// Create a new security service
    pub fn new(config: SecurityConfig) -> Self {
        Self { config }
    }

    /// Generate a signed JWT for an operator
    pub fn generate_token(&self, operator_id: &str, name: &str) -> Result<AuthToken> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.jwt_expiration_minutes as i64);

        let claims = Claims {
            sub: operator_id.to_string(),
            name: name.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Authentication(format!("Failed to generate JWT token: {}", e)))?;

        Ok(AuthToken {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.jwt_expiration_minutes * 60,
        })
    }

    /// Validate and decode a JWT token; expiry is checked
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| Error::Authentication(format!("Invalid token: {}", e)))?;

        Ok(token_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_minutes: 60,
        }
    }

    #[test]
    fn issued_tokens_validate() {
        let service = SecurityService::new(config());
        let token = service.generate_token("op-1", "Operator 1").unwrap();

        let data = service.validate_token(&token.access_token).unwrap();
        assert_eq!(data.claims.sub, "op-1");
        assert_eq!(data.claims.name, "Operator 1");
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let service = SecurityService::new(config());
        let token = service.generate_token("op-1", "Operator 1").unwrap();

        let other = SecurityService::new(SecurityConfig {
            jwt_secret: "different-secret".to_string(),
            jwt_expiration_minutes: 60,
        });
        assert!(other.validate_token(&token.access_token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let service = SecurityService::new(config());
        assert!(service.validate_token("testtoken123").is_err());
    }
}
