use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::token::Claims;
use crate::error::AppError;

/// Extracts the verified identity claims that `AuthMiddleware` placed in
/// the request extensions.
///
/// Only meaningful on routes behind the middleware. If the claims are
/// missing the middleware did not run, which means the route was wired up
/// without the gate; rejecting with 401 is the safe answer.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The authenticated user's id, used as the owner filter on every
    /// repository call.
    pub fn id(&self) -> Uuid {
        self.0.sub
    }
}

impl FromRequest for AuthUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthUser(claims))),
            None => ready(Err(AppError::MissingToken.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;

    fn test_claims() -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4(),
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            iat: now,
            exp: now + 3600,
        }
    }

    #[actix_rt::test]
    async fn test_auth_user_extractor_success() {
        let claims = test_claims();
        let expected = claims.sub;

        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims);

        let mut payload = Payload::None;
        let extracted = AuthUser::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(extracted.id(), expected);
        assert_eq!(extracted.0.username, "testuser");
    }

    #[actix_rt::test]
    async fn test_auth_user_extractor_failure() {
        let req = test::TestRequest::default().to_http_request();
        // No claims inserted: simulates a route wired up without the gate.

        let mut payload = Payload::None;
        let result = AuthUser::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
