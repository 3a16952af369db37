use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{dto::TokenResponse, jwt::JwtKeys, password::hash_password},
    error::{ApiError, USER_EXISTS},
    state::AppState,
    users::{avatar::gravatar_url, dto::RegisterRequest, repo::StoreError, repo_types::NewUser},
    validation::{validate_body, JsonBody},
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(mut payload): JsonBody<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.name = payload.name.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();
    validate_body(&payload, RegisterRequest::FIELDS)?;

    if state.store.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Business(USER_EXISTS));
    }

    let avatar = gravatar_url(&payload.email);
    let password_hash = hash_password(&payload.password)?;

    let user = match state
        .store
        .insert(NewUser {
            name: payload.name,
            email: payload.email,
            avatar,
            password_hash,
        })
        .await
    {
        Ok(u) => u,
        Err(StoreError::Conflict) => {
            warn!("lost registration race on unique email");
            return Err(ApiError::Business(USER_EXISTS));
        }
        Err(e) => return Err(e.into()),
    };

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(TokenResponse { token }))
}
