use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::email::EmailConfig;
use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
};
use crate::modules::institutions::service::InstitutionService;
use crate::modules::users::model::{User, UserRole};
use crate::modules::users::service::UserService;
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::reset_token::{
    RESET_TOKEN_TTL_MINUTES, generate_reset_token, hash_reset_token,
};

pub struct AuthService;

impl AuthService {
    /// Registers a new account; charity admins get their institution created
    /// in the same transaction.
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn register(db: &PgPool, dto: RegisterRequest) -> Result<User, AppError> {
        if UserService::find_by_email(db, &dto.email).await?.is_some() {
            return Err(AppError::bad_request("User already exists".to_string()));
        }

        let hashed_password = hash_password(&dto.password)?;

        let mut tx = db.begin().await?;

        let institution_id = match dto.role {
            UserRole::CharityAdmin => {
                let name = dto.institution_name.as_deref().ok_or_else(|| {
                    AppError::validation(
                        "institutionName is required for charity admins".to_string(),
                    )
                })?;
                let institution_type = dto.institution_type.as_deref().ok_or_else(|| {
                    AppError::validation(
                        "institutionType is required for charity admins".to_string(),
                    )
                })?;

                let institution = InstitutionService::create(
                    &mut tx,
                    name,
                    institution_type,
                    dto.phone_number.as_deref(),
                )
                .await?;
                Some(institution.id)
            }
            UserRole::Volunteer => None,
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, role, phone_number, birth_date, institution_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(dto.role)
        .bind(&dto.phone_number)
        .bind(dto.birth_date)
        .bind(institution_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<(String, User), AppError> {
        let user = UserService::find_by_email(db, &dto.email)
            .await?
            .ok_or_else(|| AppError::user_not_found("User not found".to_string()))?;

        if !verify_password(&dto.password, &user.password)? {
            return Err(AppError::unauthenticated("Invalid password".to_string()));
        }

        let token = create_access_token(user.id, &user.email, &user.role, jwt_config)?;

        Ok((token, user))
    }

    /// Starts the recovery flow: mints a one-time token, persists its hash
    /// with a short expiry, and dispatches the raw value by email.
    ///
    /// A delivery failure clears the half-issued token so the account drops
    /// back to the idle state instead of holding a token nobody received.
    #[instrument(skip_all, fields(email = %dto.email))]
    pub async fn forgot_password(
        db: &PgPool,
        dto: ForgotPasswordRequest,
        email_config: &EmailConfig,
    ) -> Result<(), AppError> {
        let user = UserService::find_by_email(db, &dto.email)
            .await?
            .ok_or_else(|| AppError::user_not_found("User not found".to_string()))?;

        let (raw_token, token_hash) = generate_reset_token();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        sqlx::query(
            r#"
            UPDATE users
            SET reset_token_hash = $1,
                reset_token_expires_at = $2,
                updated_at = now()
            WHERE id = $3
            "#,
        )
        .bind(&token_hash)
        .bind(expires_at)
        .bind(user.id)
        .execute(db)
        .await?;

        let email_service = EmailService::new(email_config.clone());
        if let Err(err) = email_service
            .send_password_reset_email(&user.email, &user.name, &raw_token)
            .await
        {
            Self::clear_reset_token(db, user.id).await?;
            return Err(err);
        }

        Ok(())
    }

    /// Consumes a recovery token and sets the new secret.
    ///
    /// The conditional single-statement update is the concurrency control:
    /// of any number of racing consumers, exactly one observes the live
    /// token; the rest match zero rows and fail.
    #[instrument(skip_all)]
    pub async fn reset_password(
        db: &PgPool,
        raw_token: &str,
        dto: ResetPasswordRequest,
        jwt_config: &JwtConfig,
    ) -> Result<(String, User), AppError> {
        let token_hash = hash_reset_token(raw_token);
        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password = $1,
                reset_token_hash = NULL,
                reset_token_expires_at = NULL,
                updated_at = now()
            WHERE reset_token_hash = $2
              AND reset_token_expires_at > now()
            RETURNING *
            "#,
        )
        .bind(&hashed_password)
        .bind(&token_hash)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::InvalidResetToken)?;

        // Auto-login after a successful reset.
        let token = create_access_token(user.id, &user.email, &user.role, jwt_config)?;

        Ok((token, user))
    }

    async fn clear_reset_token(db: &PgPool, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_token_hash = NULL,
                reset_token_expires_at = NULL,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(db)
        .await?;

        Ok(())
    }
}
