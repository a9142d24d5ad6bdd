//! User collection controller.
//!
//! Bodies are documents, not envelopes: the list endpoint returns a JSON
//! array, create returns the stored document, update returns the updated
//! document or `null` when the id matches nothing, and delete returns a
//! fixed confirmation message.

use crate::{
    responses::{created, ApiResult, AppError, DeleteResponse},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use roster_core::{FieldMap, RosterError, UserDocument, UserId};
use tracing::debug;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", put(update_user).delete(delete_user))
}

/// List all users.
async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<UserDocument>> {
    debug!("List users request");

    let users = state.user_service.get_all().await?;
    Ok(Json(users))
}

/// Create a new user.
async fn create_user(
    State(state): State<AppState>,
    Json(fields): Json<FieldMap>,
) -> Result<(StatusCode, Json<UserDocument>), AppError> {
    debug!("Create user request");

    let user = state.user_service.create(fields).await?;
    Ok(created(user))
}

/// Update a user by id.
///
/// An id that matches no document yields `200` with a `null` body.
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<FieldMap>,
) -> ApiResult<Option<UserDocument>> {
    debug!("Update user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let user = state.user_service.update_by_id(user_id, fields).await?;
    Ok(Json(user))
}

/// Delete a user by id.
///
/// Deleting an absent id is not an error; the confirmation body is the
/// same either way.
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeleteResponse> {
    debug!("Delete user request: {}", id);

    let user_id = parse_user_id(&id)?;
    state.user_service.delete_by_id(user_id).await?;
    Ok(Json(DeleteResponse::user_deleted()))
}

fn parse_user_id(id: &str) -> Result<UserId, AppError> {
    UserId::parse(id)
        .map_err(|e| AppError(RosterError::validation(format!("invalid user id: {}", e))))
}
