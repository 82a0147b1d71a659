//! User data models and DTOs.
//!
//! The stored row ([`User`]) carries the hashed secret and recovery-token
//! state and is never serialized to clients; responses go through
//! [`UserResponse`] (registration/login) and [`ProfileResponse`]
//! (role-shaped profile).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::institutions::model::{InstitutionResponse, UpdateInstitutionRequest};

/// Account role. Determines the profile shape and which role-gated routes
/// apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Volunteer,
    CharityAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Volunteer => "volunteer",
            UserRole::CharityAdmin => "charity_admin",
        }
    }
}

/// A user row as stored.
///
/// `password` holds the bcrypt hash; `reset_token_hash` and
/// `reset_token_expires_at` are set together when a recovery token is
/// outstanding and cleared together on consumption, expiry cleanup, or
/// delivery failure.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub profile_image: Option<String>,
    pub skills: Vec<String>,
    pub availability: Option<String>,
    pub areas_of_interest: Vec<String>,
    pub institution_id: Option<Uuid>,
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sanitized user data returned by registration, login, and reset.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub profile_image: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone_number: user.phone_number,
            birth_date: user.birth_date,
            profile_image: user.profile_image,
        }
    }
}

/// Role-shaped profile payload.
///
/// Each variant carries only the fields that apply to its role; the `role`
/// tag discriminates on the wire.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ProfileResponse {
    #[serde(rename_all = "camelCase")]
    Volunteer {
        id: Uuid,
        name: String,
        email: String,
        phone_number: Option<String>,
        birth_date: Option<NaiveDate>,
        profile_image: Option<String>,
        skills: Vec<String>,
        availability: Option<String>,
        areas_of_interest: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    CharityAdmin {
        id: Uuid,
        name: String,
        email: String,
        phone_number: Option<String>,
        birth_date: Option<NaiveDate>,
        profile_image: Option<String>,
        institution: Option<InstitutionResponse>,
    },
}

impl ProfileResponse {
    /// Shapes the response by exhaustive role match rather than conditional
    /// field spreading.
    pub fn from_user(user: User, institution: Option<InstitutionResponse>) -> Self {
        match user.role {
            UserRole::Volunteer => ProfileResponse::Volunteer {
                id: user.id,
                name: user.name,
                email: user.email,
                phone_number: user.phone_number,
                birth_date: user.birth_date,
                profile_image: user.profile_image,
                skills: user.skills,
                availability: user.availability,
                areas_of_interest: user.areas_of_interest,
            },
            UserRole::CharityAdmin => ProfileResponse::CharityAdmin {
                id: user.id,
                name: user.name,
                email: user.email,
                phone_number: user.phone_number,
                birth_date: user.birth_date,
                profile_image: user.profile_image,
                institution,
            },
        }
    }
}

/// Body for `PUT /api/users/profile`.
///
/// All fields are optional; role-specific fields sent for the other role are
/// ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub skills: Option<Vec<String>>,
    pub availability: Option<String>,
    pub areas_of_interest: Option<Vec<String>>,
    #[validate(nested)]
    pub institution: Option<UpdateInstitutionRequest>,
}
