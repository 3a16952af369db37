use axum::{
    extract::{FromRef, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, TokenResponse},
        jwt::{AuthUser, JwtKeys},
        password::{verify_against_dummy, verify_password},
    },
    error::{ApiError, INVALID_CREDENTIALS},
    state::AppState,
    users::dto::PublicUser,
    validation::{validate_body, JsonBody},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth", get(current_user).post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(mut payload): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    validate_body(&payload, LoginRequest::FIELDS)?;

    // Unknown email and wrong password must stay indistinguishable to the caller.
    let Some(user) = state.store.find_by_email(&payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        verify_against_dummy(&payload.password);
        return Err(ApiError::Business(INVALID_CREDENTIALS));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Business(INVALID_CREDENTIALS));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state
        .store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no user record for authenticated id {user_id}"))?;
    Ok(Json(PublicUser::from(user)))
}
