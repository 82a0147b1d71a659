use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// An institution (charity, NGO, shelter) owned by a charity admin.
///
/// Created inline during charity-admin registration and managed through the
/// owner's profile; there are no standalone institution endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct Institution {
    pub id: Uuid,
    pub name: String,
    pub institution_type: String,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InstitutionResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub institution_type: String,
    pub contact: Option<String>,
}

impl From<Institution> for InstitutionResponse {
    fn from(institution: Institution) -> Self {
        Self {
            id: institution.id,
            name: institution.name,
            institution_type: institution.institution_type,
            contact: institution.contact,
        }
    }
}

/// Institution fields a charity admin may change from their profile.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateInstitutionRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub institution_type: Option<String>,
    pub contact: Option<String>,
}
