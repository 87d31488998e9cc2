use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::auth::jwt::{self, TokenError};
use crate::error::AppError;
use crate::state::SharedState;

/// The verified identity extracted from a valid access token. Carries only
/// the username; roles and permissions are resolved against the store at
/// check time, scoped to whatever the user's active tenant is *now*.
#[derive(Debug, Clone)]
pub struct Principal {
    pub username: String,
}

impl FromRequestParts<SharedState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::Unauthorized(
                        "No Bearer token provided or invalid format.".to_string(),
                    )
                })?;

        let claims = jwt::verify(bearer.token(), &state.config.access_token_secret).map_err(
            |e| match e {
                TokenError::Expired => AppError::Unauthorized("Token expired.".to_string()),
                TokenError::Invalid => AppError::Unauthorized("Invalid token.".to_string()),
            },
        )?;

        Ok(Principal {
            username: claims.sub,
        })
    }
}
