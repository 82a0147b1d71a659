//! # VolunHub API
//!
//! REST API backend for a volunteer/charity coordination platform. Volunteers
//! and charity admins register, authenticate, and manage their profiles; the
//! event and engagement features consume the identity this crate establishes.
//!
//! ## Architecture
//!
//! The authentication and authorization core:
//!
//! - **Token issuance**: stateless JWT sessions, minted at login and after a
//!   password reset, delivered both in the body and as an HTTP-only cookie
//! - **Session gate**: the [`middleware::auth::CurrentUser`] extractor
//!   validates the credential and resolves the subject against the database
//!   on every request
//! - **Role guard**: [`middleware::role`] gates routes by the resolved role
//! - **Password reset**: single-use, hashed, time-bounded recovery tokens
//!   consumed by an atomic conditional update
//!
//! ```text
//! src/
//! ├── config/           # Env-driven configuration (db, jwt, email, cors, rate limit)
//! ├── middleware/       # Session gate and role guard
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Registration, login, logout, password reset
//! │   ├── users/       # Profile and institution routes
//! │   └── institutions/ # Institution records owned by charity admins
//! └── utils/           # Errors, JWT, password hashing, reset tokens, email
//! ```
//!
//! Each feature module follows a consistent structure: `controller.rs` (HTTP
//! handlers), `service.rs` (business logic), `model.rs` (DTOs and rows),
//! `router.rs` (route wiring).

pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
