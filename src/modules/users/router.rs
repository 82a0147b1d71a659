use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_institution, get_profile, update_profile};

pub fn init_users_router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

/// Charity-admin-only routes; the role layer is applied where this router is
/// mounted.
pub fn init_institution_router() -> Router<AppState> {
    Router::new().route("/institution", get(get_institution))
}
