//! Configuration modules.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with development-friendly defaults:
//!
//! - [`cors`]: allowed browser origins
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`email`]: SMTP settings for the password-reset mailer
//! - [`jwt`]: session token secret and expiry
//! - [`rate_limit`]: throttling for credential endpoints

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod rate_limit;
