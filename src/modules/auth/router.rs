use axum::{
    Router,
    routing::{patch, post},
};

use crate::state::AppState;

use super::controller::{forgot_password, login_user, logout_user, register_user, reset_password};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_user))
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/{token}", patch(reset_password))
}
