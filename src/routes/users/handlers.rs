use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::auth::{CurrentUser, email::is_valid_email};
use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::repository::{UserRepository, UserUpdate};
use crate::routes::auth::{MIN_PASSWORD_LENGTH, hash_blocking, validate_username};

use super::types::{UpdateUserRequest, UserResponse};

fn user_not_found(id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("User {id} not found"))
}

/// List all accounts
#[utoipa::path(
    get,
    path = "/api/User/getall",
    responses(
        (status = 200, description = "All accounts", body = Vec<UserResponse>),
        (status = 403, description = "Admin role required"),
    ),
    tag = "users"
)]
pub async fn get_all_users(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<UserResponse>>> {
    user.require_admin()?;

    let users = UserRepository::new(&state.db).get_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Look up an account by email or username
#[utoipa::path(
    get,
    path = "/api/User/getbyuserdata/{emailOrUserName}",
    params(
        ("emailOrUserName" = String, Path, description = "Email address or username"),
    ),
    responses(
        (status = 200, description = "Account found", body = UserResponse),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such account"),
    ),
    tag = "users"
)]
pub async fn get_by_user_data(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(email_or_user_name): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let found = UserRepository::new(&state.db)
        .get_by_email_or_username(&email_or_user_name)
        .await?
        .ok_or_else(|| user_not_found(&email_or_user_name))?;

    Ok(Json(found.into()))
}

/// Look up an account by ID
#[utoipa::path(
    get,
    path = "/api/User/getbyid/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Account found", body = UserResponse),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such account"),
    ),
    tag = "users"
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    user.require_admin()?;

    let found = UserRepository::new(&state.db)
        .get_by_id(id)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    Ok(Json(found.into()))
}

/// Update profile fields; users may update themselves, admins anyone
#[utoipa::path(
    patch,
    path = "/api/User/update/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, description = "Invalid field value"),
        (status = 403, description = "Not your account"),
        (status = 404, description = "No such account"),
        (status = 409, description = "Email or username already taken"),
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    user.require_self_or_admin(id)?;

    let repo = UserRepository::new(&state.db);
    let mut update = UserUpdate {
        city: body.city.map(|city| city.trim().to_string()),
        ..UserUpdate::default()
    };

    if let Some(email) = body.email {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }
        if repo.get_by_email(&email).await?.is_some_and(|other| other.id != id) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        update.email = Some(email);
    }

    if let Some(username) = body.user_name {
        let username = validate_username(&username)?;
        if repo.get_by_username(&username).await?.is_some_and(|other| other.id != id) {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        update.username = Some(username);
    }

    if let Some(password) = body.password {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        update.password_hash = Some(hash_blocking(password).await?);
    }

    let updated = repo
        .update_profile(id, update)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Email or username already taken"))?
        .ok_or_else(|| user_not_found(id))?;
    tracing::info!(user_id = %id, by = %user.id, "User updated");

    Ok(Json(updated.into()))
}

/// Delete an account; users may delete themselves, admins anyone
#[utoipa::path(
    delete,
    path = "/api/User/delete/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID"),
    ),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 403, description = "Not your account"),
        (status = 404, description = "No such account"),
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    user.require_self_or_admin(id)?;

    let result = UserRepository::new(&state.db).delete(id).await?;
    if result.rows_affected == 0 {
        return Err(user_not_found(id));
    }

    tracing::info!(user_id = %id, by = %user.id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
