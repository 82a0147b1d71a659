use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::modules::institutions::model::{Institution, UpdateInstitutionRequest};
use crate::utils::errors::AppError;

pub struct InstitutionService;

impl InstitutionService {
    /// Inserts an institution inside the caller's transaction so a failed
    /// registration never leaves an orphaned institution behind.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        institution_type: &str,
        contact: Option<&str>,
    ) -> Result<Institution, AppError> {
        let institution = sqlx::query_as::<_, Institution>(
            r#"
            INSERT INTO institutions (name, institution_type, contact)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(institution_type)
        .bind(contact)
        .fetch_one(&mut **tx)
        .await?;

        Ok(institution)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Institution>, AppError> {
        let institution =
            sqlx::query_as::<_, Institution>("SELECT * FROM institutions WHERE id = $1")
                .bind(id)
                .fetch_optional(db)
                .await?;

        Ok(institution)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        dto: &UpdateInstitutionRequest,
    ) -> Result<Institution, AppError> {
        let institution = sqlx::query_as::<_, Institution>(
            r#"
            UPDATE institutions
            SET name = COALESCE($1, name),
                institution_type = COALESCE($2, institution_type),
                contact = COALESCE($3, contact),
                updated_at = now()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.institution_type)
        .bind(&dto.contact)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Institution with id {} not found", id)))?;

        Ok(institution)
    }
}
