use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::auth::{CurrentUser, email::is_valid_email, password, session};
use crate::common::AppState;
use crate::entity::users::Role;
use crate::error::{AppError, AppResult};
use crate::repository::{NewUser, UserRepository};

use super::types::{AuthResponse, LoginRequest, RegisterRequest, WhoAmIResponse};

pub(crate) const MIN_PASSWORD_LENGTH: usize = 6;

/// Trimmed username, or `400` when it is blank or could be mistaken for an
/// email address at login.
pub(crate) fn validate_username(raw: &str) -> AppResult<String> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username cannot be empty".to_string()));
    }
    if username.contains('@') {
        return Err(AppError::BadRequest("Username cannot contain '@'".to_string()));
    }
    Ok(username.to_string())
}

/// Hash on the blocking pool; Argon2 is deliberately slow.
pub(crate) async fn hash_blocking(plain: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| AppError::Internal(format!("hash task failed: {e}")))?
}

/// Create an account with the `User` role
#[utoipa::path(
    post,
    path = "/api/Auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid email, username or password"),
        (status = 409, description = "Email or username already taken"),
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let email = body.email.trim().to_lowercase();

    if !is_valid_email(&email) {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    let username = validate_username(&body.user_name)?;
    if body.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let repo = UserRepository::new(&state.db);
    if repo.get_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if repo.get_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = hash_blocking(body.password).await?;
    let user = repo
        .create(NewUser {
            email,
            username,
            password_hash,
            city: body.city.trim().to_string(),
            role: Role::User,
        })
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Email or username already taken"))?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            email: user.email,
            user_name: user.username,
        }),
    ))
}

/// Log in with an email or username and receive the session cookie
#[utoipa::path(
    post,
    path = "/api/Auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Response> {
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let user = UserRepository::new(&state.db)
        .get_by_email_or_username(&body.email_or_user_name)
        .await?
        .ok_or_else(invalid)?;

    let hash = user.password_hash.clone();
    let plain = body.password;
    let valid = tokio::task::spawn_blocking(move || password::verify_password(&plain, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("verify task failed: {e}")))??;

    if !valid {
        tracing::debug!(identifier = %body.email_or_user_name, "Login rejected");
        return Err(invalid());
    }

    let token = session::create_session_token(&user, &state.config)?;
    let cookie = session::session_cookie(&token, &state.config);
    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            email: user.email,
            user_name: user.username,
        }),
    )
        .into_response())
}

/// The logged-in user as carried by the session
#[utoipa::path(
    get,
    path = "/api/Auth/whoami",
    responses(
        (status = 200, description = "Current session", body = WhoAmIResponse),
        (status = 401, description = "Not logged in"),
    ),
    tag = "auth"
)]
pub async fn whoami(user: CurrentUser) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        email: user.email,
        user_name: user.username,
        city: user.city,
        role: user.role,
    })
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/api/Auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared"),
        (status = 401, description = "Not logged in"),
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>, user: CurrentUser) -> impl IntoResponse {
    tracing::info!(user_id = %user.id, "User logged out");

    (
        StatusCode::OK,
        [(header::SET_COOKIE, session::clear_session_cookie(&state.config))],
    )
}
