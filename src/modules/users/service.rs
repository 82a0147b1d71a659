use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::institutions::service::InstitutionService;
use crate::modules::users::model::{ProfileResponse, UpdateProfileRequest, User, UserRole};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

pub struct UserService;

impl UserService {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(db)
            .await?;

        Ok(user)
    }

    /// Builds the role-shaped profile for an already-resolved user.
    #[instrument(skip(db, user), fields(user_id = %user.id))]
    pub async fn get_profile(db: &PgPool, user: User) -> Result<ProfileResponse, AppError> {
        let institution = match (user.role, user.institution_id) {
            (UserRole::CharityAdmin, Some(institution_id)) => {
                InstitutionService::find_by_id(db, institution_id)
                    .await?
                    .map(Into::into)
            }
            _ => None,
        };

        Ok(ProfileResponse::from_user(user, institution))
    }

    /// Applies a profile update for the resolved user.
    ///
    /// Role-specific fields only take effect for the matching role; a new
    /// email is re-checked for uniqueness and a new password is re-hashed.
    #[instrument(skip(db, user, dto), fields(user_id = %user.id))]
    pub async fn update_profile(
        db: &PgPool,
        user: User,
        dto: UpdateProfileRequest,
    ) -> Result<ProfileResponse, AppError> {
        if let Some(new_email) = &dto.email {
            if new_email != &user.email
                && Self::find_by_email(db, new_email).await?.is_some()
            {
                return Err(AppError::bad_request("Email already in use".to_string()));
            }
        }

        let hashed_password = match &dto.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let (skills, availability, areas_of_interest) = match user.role {
            UserRole::Volunteer => (dto.skills, dto.availability, dto.areas_of_interest),
            UserRole::CharityAdmin => (None, None, None),
        };

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($1, name),
                email = COALESCE($2, email),
                password = COALESCE($3, password),
                phone_number = COALESCE($4, phone_number),
                birth_date = COALESCE($5, birth_date),
                skills = COALESCE($6, skills),
                availability = COALESCE($7, availability),
                areas_of_interest = COALESCE($8, areas_of_interest),
                updated_at = now()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(&dto.phone_number)
        .bind(dto.birth_date)
        .bind(&skills)
        .bind(&availability)
        .bind(&areas_of_interest)
        .bind(user.id)
        .fetch_one(db)
        .await?;

        if let (UserRole::CharityAdmin, Some(institution_dto), Some(institution_id)) =
            (user.role, dto.institution.as_ref(), user.institution_id)
        {
            InstitutionService::update(db, institution_id, institution_dto).await?;
        }

        Self::get_profile(db, updated).await
    }
}
