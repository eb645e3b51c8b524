use crate::config::SecurityConfig;
use crate::error::Error;
use crate::security::{AuthToken, Claims, SecurityService};
use anyhow::Result;
use tracing::info;

/// Authentication service guarding the alert trigger path.
///
/// Operators present signed bearer tokens with expiry; issuance happens
/// out-of-band (see the `issue_token` binary).
pub struct AuthService {
    security: SecurityService,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            security: SecurityService::new(config.clone()),
        }
    }

    /// Issue a token for an operator
    pub fn issue_token(&self, operator_id: &str, name: &str) -> Result<AuthToken> {
        let token = self.security.generate_token(operator_id, name)?;
        info!("Issued token for operator {}", operator_id);
        Ok(token)
    }

    /// Verify the `Authorization` header value of an incoming request.
    ///
    /// Missing header, non-bearer scheme, and invalid or expired tokens all
    /// map to an authentication error (401 at the API boundary).
    pub fn verify_bearer(&self, authorization: Option<&str>) -> Result<Claims> {
        let header = authorization
            .ok_or_else(|| Error::Authentication("Missing authentication token".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| Error::Authentication("Expected a bearer token".to_string()))?;

        let data = self.security.validate_token(token)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthService {
        AuthService::new(&SecurityConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_minutes: 60,
        })
    }

    #[test]
    fn bearer_header_round_trips() {
        let auth = auth();
        let token = auth.issue_token("op-1", "Operator 1").unwrap();
        let header = format!("Bearer {}", token.access_token);

        let claims = auth.verify_bearer(Some(&header)).unwrap();
        assert_eq!(claims.sub, "op-1");
    }

    #[test]
    fn missing_header_is_unauthenticated() {
        assert!(auth().verify_bearer(None).is_err());
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let auth = auth();
        let token = auth.issue_token("op-1", "Operator 1").unwrap();
        let header = format!("Basic {}", token.access_token);
        assert!(auth.verify_bearer(Some(&header)).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "op-1".to_string(),
            name: "Operator 1".to_string(),
            exp: (now - 3600) as usize,
            iat: (now - 7200) as usize,
        };
        let stale = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let header = format!("Bearer {}", stale);
        assert!(auth().verify_bearer(Some(&header)).is_err());
    }
}
