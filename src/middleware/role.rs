//! Role-based authorization middleware.
//!
//! The role used for every decision comes from the store-resolved user
//! attached by [`CurrentUser`], never from anything the client asserted.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};

use crate::middleware::auth::CurrentUser;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Middleware that admits the request only when the authenticated user's
/// role is in `allowed_roles`.
///
/// # Usage with `axum::middleware::from_fn_with_state`
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/institution", get(get_institution))
///     .layer(middleware::from_fn_with_state(
///         state.clone(),
///         |state, req, next| require_roles(state, req, next, vec![UserRole::CharityAdmin]),
///     ));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: Vec<UserRole>,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let current_user = CurrentUser::from_request_parts(&mut parts, &state).await?;

    check_any_role(&current_user, &allowed_roles)?;

    // Attach the resolved user so handlers don't pay for a second lookup.
    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Charity-admin-only routes.
pub async fn require_charity_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_roles(State(state), req, next, vec![UserRole::CharityAdmin]).await
}

/// Volunteer-only routes.
pub async fn require_volunteer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_roles(State(state), req, next, vec![UserRole::Volunteer]).await
}

/// Manual role check for use inside handler logic.
pub fn check_role(user: &CurrentUser, required_role: UserRole) -> Result<(), AppError> {
    if user.role() != required_role {
        return Err(AppError::forbidden(format!(
            "Access denied. Required role: {:?}, but user has role: {:?}",
            required_role,
            user.role()
        )));
    }

    Ok(())
}

/// Manual check against a set of allowed roles.
pub fn check_any_role(user: &CurrentUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if !allowed_roles.contains(&user.role()) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles,
            user.role()
        )));
    }

    Ok(())
}
