use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use volunhub::config::cors::CorsConfig;
use volunhub::config::email::EmailConfig;
use volunhub::config::jwt::JwtConfig;
use volunhub::config::rate_limit::RateLimitConfig;
use volunhub::modules::users::model::UserRole;
use volunhub::router::init_router;
use volunhub::state::AppState;
use volunhub::utils::password::hash_password;
use volunhub::utils::reset_token::hash_reset_token;

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_purposes";

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub institution_id: Option<Uuid>,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry: 3600,
    }
}

/// Builds the app with a stable JWT secret, SMTP disabled, and rate limits
/// generous enough that tests never trip them.
pub async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        email_config: EmailConfig {
            enabled: false,
            ..EmailConfig::from_env()
        },
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig {
            auth_per_second: 100,
            auth_burst_size: 100,
        },
    };
    init_router(state)
}

pub async fn create_test_user(
    pool: &PgPool,
    email: &str,
    password: &str,
    role: UserRole,
) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO users (name, email, password, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind("Test User")
    .bind(email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
        role,
        institution_id: None,
    }
}

/// Creates a charity admin together with an owned institution, the way
/// registration does.
#[allow(dead_code)]
pub async fn create_test_charity_admin(pool: &PgPool, email: &str, password: &str) -> TestUser {
    let institution_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO institutions (name, institution_type, contact)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind("Test Shelter")
    .bind("shelter")
    .bind("555-0100")
    .fetch_one(pool)
    .await
    .unwrap();

    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO users (name, email, password, role, institution_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind("Test Admin")
    .bind(email)
    .bind(&hashed)
    .bind(UserRole::CharityAdmin)
    .bind(institution_id)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
        role: UserRole::CharityAdmin,
        institution_id: Some(institution_id),
    }
}

/// Stores the hash of `raw_token` on the user with an expiry offset in
/// minutes (negative for an already-expired token).
#[allow(dead_code)]
pub async fn set_reset_token(pool: &PgPool, user_id: Uuid, raw_token: &str, minutes_from_now: i64) {
    let expires_at = Utc::now() + Duration::minutes(minutes_from_now);

    sqlx::query(
        r#"
        UPDATE users
        SET reset_token_hash = $1, reset_token_expires_at = $2
        WHERE id = $3
        "#,
    )
    .bind(hash_reset_token(raw_token))
    .bind(expires_at)
    .bind(user_id)
    .execute(pool)
    .await
    .unwrap();
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}
