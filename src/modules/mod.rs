pub mod auth;
pub mod institutions;
pub mod users;
