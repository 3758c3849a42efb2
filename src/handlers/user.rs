use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{errors::Result, handlers::AppState, middleware::AuthenticatedUser};

#[derive(Debug, Deserialize)]
pub struct InitUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct InitUserResponse {
    pub message: String,
}

/// Profile upsert. Not quota-gated.
pub async fn init_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<InitUserRequest>,
) -> Result<Json<InitUserResponse>> {
    let email = if request.email.is_empty() {
        user.email.clone()
    } else {
        request.email
    };

    state.quota.upsert_profile(&user.uid, &request.name, &email).await;

    Ok(Json(InitUserResponse {
        message: "User profile initialized".to_string(),
    }))
}
