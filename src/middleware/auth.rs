use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::modules::users::model::{User, UserRole};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Name of the HTTP-only session cookie set at login and cleared at logout.
pub const SESSION_COOKIE: &str = "auth_token";

/// Extractor that validates the bearer credential and resolves the subject
/// against the credential store.
///
/// Handlers taking `CurrentUser` never run for requests that fail any of:
/// credential present, signature and expiry valid, subject still exists.
/// The store lookup is the single point where a deleted user invalidates an
/// otherwise-valid token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

fn token_from_cookie_header<'a>(cookie_header: &'a str, cookie_name: &str) -> Option<&'a str> {
    cookie_header.split(';').map(str::trim).find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name.trim() == cookie_name).then_some(value.trim())
    })
}

/// Pulls the session token from the `Authorization: Bearer` header, falling
/// back to the session cookie for browser clients.
fn extract_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    parts
        .headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| token_from_cookie_header(cookies, SESSION_COOKIE))
        .map(str::to_string)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or_else(|| {
            AppError::unauthenticated("Missing authentication token".to_string())
        })?;

        let claims = verify_token(&token, &state.jwt_config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::invalid_token("Invalid subject in token".to_string()))?;

        let user = UserService::find_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| AppError::user_not_found("User not found".to_string()))?;

        Ok(CurrentUser(user))
    }
}
