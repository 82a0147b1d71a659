use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::middleware::auth::CurrentUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::institutions::model::InstitutionResponse;
use crate::modules::institutions::service::InstitutionService;
use crate::modules::users::model::{ProfileResponse, UpdateProfileRequest};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "Role-shaped profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn get_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = UserService::get_profile(&state.db, current_user.0).await?;
    Ok(Json(profile))
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated role-shaped profile", body = ProfileResponse),
        (status = 400, description = "Email already in use", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = UserService::update_profile(&state.db, current_user.0, dto).await?;
    Ok(Json(profile))
}

/// Get the charity admin's own institution
#[utoipa::path(
    get,
    path = "/api/users/institution",
    responses(
        (status = 200, description = "The admin's institution", body = InstitutionResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not a charity admin", body = ErrorResponse),
        (status = 404, description = "No institution on record", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn get_institution(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<InstitutionResponse>, AppError> {
    let institution_id = current_user.0.institution_id.ok_or_else(|| {
        AppError::not_found("No institution associated with this account".to_string())
    })?;

    let institution = InstitutionService::find_by_id(&state.db, institution_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Institution with id {} not found", institution_id))
        })?;

    Ok(Json(institution.into()))
}
