use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Which of the three principal tables the session belongs to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalRole {
    Customer,
    Driver,
    Admin,
}

/// The session context: one authenticated principal, carried in the bearer
/// token and injected into every handler. Queried, never mutated.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,       // principal id
    pub username: String,
    pub email: String,
    pub role: PrincipalRole,
    pub exp: i64,        // expiration timestamp
    pub iat: i64,        // issued at timestamp
}

pub fn create_token(
    principal_id: Uuid,
    username: &str,
    email: &str,
    role: PrincipalRole,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let now = Utc::now();
    let exp = now + Duration::hours(expiration_hours);

    let claims = Claims {
        sub: principal_id,
        username: username.to_string(),
        email: email.to_string(),
        role,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
}

pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let id = Uuid::new_v4();
        let token =
            create_token(id, "marcus", "marcus@example.com", PrincipalRole::Driver, "secret", 1)
                .unwrap();

        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.username, "marcus");
        assert_eq!(claims.role, PrincipalRole::Driver);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(
            Uuid::new_v4(),
            "marcus",
            "marcus@example.com",
            PrincipalRole::Customer,
            "secret",
            1,
        )
        .unwrap();

        assert!(verify_token(&token, "other-secret").is_err());
    }
}
