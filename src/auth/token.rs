use crate::error::AppError;
use crate::models::User;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime in seconds (24 hours).
const TOKEN_TTL_SECS: i64 = 60 * 60 * 24;

/// Claims encoded inside a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's unique identifier.
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    /// Issue timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiry timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies signed, stateless session tokens.
///
/// Constructed once from the configured secret; the keys are cheap to
/// clone, so every component that needs token access holds its own copy.
/// There is no server-side session state and no revocation list: a token
/// is valid exactly as long as its signature checks out and its expiry has
/// not passed.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a token carrying the user's identity claims.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verifies a token and decodes its claims.
    ///
    /// Returns `AppError::ExpiredToken` past expiry and
    /// `AppError::InvalidToken` for anything else wrong with the input;
    /// attacker-controlled strings can never panic here.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}
