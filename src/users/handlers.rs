use axum::extract::{Path, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::instrument;

use crate::auth::extract::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::dto::{
    LoginRequest, LoginResponse, MessageResponse, PublicUser, RegisterRequest, UpdateUserRequest,
};
use crate::users::service;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/usuarios", post(create_user).get(list_users))
        .route(
            "/usuarios/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (token, user_id) = service::authenticate(&state, payload).await?;
    Ok(Json(LoginResponse { token, user_id }))
}

#[instrument(skip(state, payload))]
async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<PublicUser>), ApiError> {
    let user = service::register(&state, payload).await?;
    let location = format!("/usuarios/{}", user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(user.into()),
    ))
}

#[instrument(skip(state))]
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let users = service::list_users(&state).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = service::get_user(&state, &id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, _auth, payload))]
async fn update_user(
    State(state): State<AppState>,
    _auth: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<PublicUser>, ApiError> {
    // Decoded by hand so an unknown field comes back as a plain 400.
    let changes: UpdateUserRequest =
        serde_json::from_value(payload).map_err(|e| ApiError::Validation(e.to_string()))?;
    let user = service::update_user(&state, &id, changes).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, _auth))]
async fn delete_user(
    State(state): State<AppState>,
    _auth: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    service::delete_user(&state, &id).await?;
    Ok(Json(MessageResponse {
        message: "user deleted".to_string(),
    }))
}
