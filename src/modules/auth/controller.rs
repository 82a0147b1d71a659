use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header::SET_COOKIE};
use axum::response::{AppendHeaders, IntoResponse};
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::{CurrentUser, SESSION_COOKIE};
use crate::modules::users::model::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    ResetPasswordRequest,
};
use super::service::AuthService;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Session cookie for browser clients; API clients use the token from the
/// response body as a bearer header instead.
fn session_cookie(token: &str, max_age: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}")
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = AuthService::register(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Login and receive a session token
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid password", body = ErrorResponse),
        (status = 404, description = "No account with that email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (token, user) = AuthService::login(&state.db, dto, &state.jwt_config).await?;

    let cookie = session_cookie(&token, state.jwt_config.access_token_expiry);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Logout and clear the session cookie
#[utoipa::path(
    post,
    path = "/api/users/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn logout_user(_current_user: CurrentUser) -> impl IntoResponse {
    // The token itself stays valid until expiry (stateless sessions); all
    // the server can revoke is the browser cookie.
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");

    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(MessageResponse::ok("Logged out successfully")),
    )
}

/// Request a password-reset email
#[utoipa::path(
    post,
    path = "/api/users/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset token dispatched", body = MessageResponse),
        (status = 404, description = "No account with that email", body = ErrorResponse),
        (status = 500, description = "Email delivery failed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::forgot_password(&state.db, dto, &state.email_config).await?;
    Ok(Json(MessageResponse::ok("Token sent to email!")))
}

/// Reset the password with a recovery token
#[utoipa::path(
    patch,
    path = "/api/users/reset-password/{token}",
    params(("token" = String, Path, description = "Raw recovery token from the reset email")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated, new session issued", body = LoginResponse),
        (status = 400, description = "Token is invalid or has expired", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto, token))]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (access_token, user) =
        AuthService::reset_password(&state.db, &token, dto, &state.jwt_config).await?;

    let cookie = session_cookie(&access_token, state.jwt_config.access_token_expiry);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse {
            token: access_token,
            user: user.into(),
        }),
    ))
}
