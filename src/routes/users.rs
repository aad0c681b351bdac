use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::traits::Resource;
use crate::errors::ApiError;
use crate::resources::{User, UserCreate, UserUpdate, user};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/users",
    request_body = UserCreate,
    responses(
        (status = axum::http::StatusCode::CREATED, description = "Customer account created", body = User),
        (status = axum::http::StatusCode::CONFLICT, description = "Email already registered"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload")
    ),
    tag = "users",
    summary = "Register a customer"
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = user::register_user(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = axum::http::StatusCode::OK, description = "The user", body = User),
        (status = axum::http::StatusCode::NOT_FOUND, description = "User not found")
    ),
    tag = "users",
    summary = "Get one user"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(User::get_one(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UserUpdate,
    responses(
        (status = axum::http::StatusCode::OK, description = "User updated", body = User),
        (status = axum::http::StatusCode::NOT_FOUND, description = "User not found"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload")
    ),
    tag = "users",
    summary = "Update name or phone number"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(user::update_user(&state.db, id, payload).await?))
}
