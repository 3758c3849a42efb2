use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{auth::JwtService, handlers::AppState};

/// Caller identity extracted from a verified `Authorization: Bearer` token.
/// Every authenticated route takes this as an extractor, so no handler
/// runs without a valid identity.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub uid: String,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok());

        let token = auth_header
            .and_then(|header| header.strip_prefix("Bearer "))
            .ok_or_else(|| unauthorized("Unauthorized"))?;

        let jwt_service = JwtService::new(&state.config.jwt_secret);
        let claims = jwt_service
            .verify_token(token)
            .map_err(|_| unauthorized("Unauthorized: Invalid token"))?;

        Ok(AuthenticatedUser {
            uid: claims.sub,
            email: claims.email,
        })
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}
