//! Request middleware and extractors.
//!
//! # Authentication flow
//!
//! 1. Client sends a request with `Authorization: Bearer <token>` or the
//!    session cookie set at login
//! 2. The [`auth::CurrentUser`] extractor validates the token and resolves
//!    the subject against the database
//! 3. Role middleware from [`role`] checks the resolved role where a route
//!    restricts access
//! 4. The handler runs only if every check passed

pub mod auth;
pub mod role;
