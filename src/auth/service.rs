use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::token::TokenService;
use crate::auth::{hash_password, verify_password, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::{User, UserRecord};

/// Registers new users and authenticates login attempts.
///
/// Holds the database pool, the token service, and the configured bcrypt
/// work factor; all three are injected at construction so the service has
/// no hidden environment dependencies.
#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    tokens: TokenService,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            pool,
            tokens,
            bcrypt_cost,
        }
    }

    /// Creates a new user account.
    ///
    /// The username/email pre-check gives a clean error in the common case,
    /// but it cannot rule out a concurrent registration; the unique indexes
    /// are authoritative, and a violation at insert time surfaces as the
    /// same `DuplicateIdentity` error via `From<sqlx::Error>`.
    pub async fn register(&self, input: RegisterRequest) -> Result<User, AppError> {
        input.validate()?;

        let taken: Option<(String,)> = sqlx::query_as(
            "SELECT CASE WHEN username = $1 THEN 'username' ELSE 'email' END \
             FROM users WHERE username = $1 OR email = $2 LIMIT 1",
        )
        .bind(&input.username)
        .bind(&input.email)
        .fetch_optional(&self.pool)
        .await?;

        if let Some((field,)) = taken {
            return Err(AppError::DuplicateIdentity(field));
        }

        let password_hash = hash_password(&input.password, self.bcrypt_cost)?;

        let record: UserRecord = sqlx::query_as(
            "INSERT INTO users (id, username, email, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, username, email, password_hash, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&input.username)
        .bind(&input.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    /// Authenticates a login attempt and issues a session token.
    ///
    /// Unknown email and wrong password take the same error path so the
    /// response never reveals which one it was.
    pub async fn login(&self, input: LoginRequest) -> Result<(User, String), AppError> {
        input.validate()?;

        let record: Option<UserRecord> = sqlx::query_as(
            "SELECT id, username, email, password_hash, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(&input.email)
        .fetch_optional(&self.pool)
        .await?;

        let record = record.ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&input.password, &record.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let user: User = record.into();
        let token = self.tokens.issue(&user)?;
        Ok((user, token))
    }
}
