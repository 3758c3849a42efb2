use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, Result};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID from the identity provider
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Verifies bearer identity tokens. Stands in for the hosted identity
/// provider's token check; the rest of the service only sees the stable
/// user id in `sub`.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_duration: Duration,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            token_duration: Duration::hours(1),
        }
    }

    pub fn generate_token(&self, uid: &str, email: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: uid.to_string(),
            email: email.to_string(),
            exp: (now + self.token_duration).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Unauthenticated(format!("Failed to generate token: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| ApiError::Unauthenticated(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}
