mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use common::{
    create_test_user, generate_unique_email, set_reset_token, setup_test_app, test_jwt_config,
};
use volunhub::modules::users::model::UserRole;
use volunhub::utils::jwt::verify_token;

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        // The auth routes rate-limit per client IP.
        .header("x-forwarded-for", "10.0.0.1")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_volunteer_success(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let email = generate_unique_email();

    let request = json_request(
        "POST",
        "/api/users",
        json!({
            "name": "Ada Volunteer",
            "email": email,
            "password": "secret-pass-1",
            "role": "volunteer",
            "phoneNumber": "555-0199"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "volunteer");
    // The stored secret must never appear in a response.
    assert!(body.get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_email(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "first-pass-1", UserRole::Volunteer).await;

    let app = setup_test_app(pool.clone()).await;

    let request = json_request(
        "POST",
        "/api/users",
        json!({
            "name": "Second Account",
            "email": email,
            "password": "second-pass-1",
            "role": "volunteer"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_charity_admin_creates_institution(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;
    let email = generate_unique_email();

    let request = json_request(
        "POST",
        "/api/users",
        json!({
            "name": "Grace Admin",
            "email": email,
            "password": "secret-pass-1",
            "role": "charity_admin",
            "phoneNumber": "555-0123",
            "institutionName": "Hope Shelter",
            "institutionType": "shelter"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let institution_id = sqlx::query_scalar::<_, Option<Uuid>>(
        "SELECT institution_id FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert!(institution_id.is_some());

    let institution_name =
        sqlx::query_scalar::<_, String>("SELECT name FROM institutions WHERE id = $1")
            .bind(institution_id.unwrap())
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(institution_name, "Hope Shelter");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_charity_admin_missing_institution_fields(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let request = json_request(
        "POST",
        "/api/users",
        json!({
            "name": "Grace Admin",
            "email": generate_unique_email(),
            "password": "secret-pass-1",
            "role": "charity_admin"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success(pool: PgPool) {
    let email = generate_unique_email();
    let password = "testpass123";
    create_test_user(&pool, &email, password, UserRole::Volunteer).await;

    let app = setup_test_app(pool.clone()).await;

    let request = json_request(
        "POST",
        "/api/users/login",
        json!({ "email": email, "password": password }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("auth_token="));
    assert!(set_cookie.contains("HttpOnly"));

    let body = body_json(response).await;
    assert!(body.get("token").is_some());
    assert_eq!(body["user"]["email"], email);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_token_subject_matches_registered_identity(pool: PgPool) {
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, "testpass123", UserRole::Volunteer).await;

    let app = setup_test_app(pool.clone()).await;

    let request = json_request(
        "POST",
        "/api/users/login",
        json!({ "email": email, "password": "testpass123" }),
    );

    let response = app.oneshot(request).await.unwrap();
    let body = body_json(response).await;

    let claims = verify_token(body["token"].as_str().unwrap(), &test_jwt_config()).unwrap();
    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.email, email);
    assert_eq!(claims.role, "volunteer");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "correctpass", UserRole::Volunteer).await;

    let app = setup_test_app(pool.clone()).await;

    let request = json_request(
        "POST",
        "/api/users/login",
        json!({ "email": email, "password": "wrongpass" }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_email(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let request = json_request(
        "POST",
        "/api/users/login",
        json!({ "email": generate_unique_email(), "password": "whatever1" }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_invalid_email_format(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let request = json_request(
        "POST",
        "/api/users/login",
        json!({ "email": "not-an-email", "password": "password123" }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_missing_password(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let request = json_request("POST", "/api/users/login", json!({ "email": "a@test.com" }));

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_clears_cookie(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", UserRole::Volunteer).await;

    let app = setup_test_app(pool.clone()).await;

    let login = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            json!({ "email": email, "password": "testpass123" }),
        ))
        .await
        .unwrap();
    let token = body_json(login).await["token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/api/users/logout")
        .header("x-forwarded-for", "10.0.0.1")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_requires_authentication(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/users/logout")
        .header("x-forwarded-for", "10.0.0.1")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_forgot_password_unknown_email(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let request = json_request(
        "POST",
        "/api/users/forgot-password",
        json!({ "email": generate_unique_email() }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_forgot_password_stores_hashed_token(pool: PgPool) {
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, "testpass123", UserRole::Volunteer).await;

    let app = setup_test_app(pool.clone()).await;

    let request = json_request("POST", "/api/users/forgot-password", json!({ "email": email }));

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (token_hash, expires_at) = sqlx::query_as::<_, (Option<String>, Option<chrono::DateTime<chrono::Utc>>)>(
        "SELECT reset_token_hash, reset_token_expires_at FROM users WHERE id = $1",
    )
    .bind(user.id)
    .fetch_one(&pool)
    .await
    .unwrap();

    let token_hash = token_hash.expect("reset token hash should be stored");
    // SHA-256 hex digest, not a raw token.
    assert_eq!(token_hash.len(), 64);
    assert!(expires_at.expect("expiry should be stored") > chrono::Utc::now());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reset_password_consumes_token_exactly_once(pool: PgPool) {
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, "oldpass123", UserRole::Volunteer).await;

    let raw_token = "a".repeat(64);
    set_reset_token(&pool, user.id, &raw_token, 10).await;

    let app = setup_test_app(pool.clone()).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/users/reset-password/{raw_token}"),
            json!({ "password": "newpass123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Auto-login: a fresh session token comes back with the response.
    let body = body_json(response).await;
    let claims = verify_token(body["token"].as_str().unwrap(), &test_jwt_config()).unwrap();
    assert_eq!(claims.sub, user.id.to_string());

    // The new password works, the old one does not.
    let login_new = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            json!({ "email": email, "password": "newpass123" }),
        ))
        .await
        .unwrap();
    assert_eq!(login_new.status(), StatusCode::OK);

    let login_old = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            json!({ "email": email, "password": "oldpass123" }),
        ))
        .await
        .unwrap();
    assert_eq!(login_old.status(), StatusCode::UNAUTHORIZED);

    // Reuse of the consumed token always fails.
    let reuse = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/users/reset-password/{raw_token}"),
            json!({ "password": "anotherpass1" }),
        ))
        .await
        .unwrap();
    assert_eq!(reuse.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reset_password_expired_token(pool: PgPool) {
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, "oldpass123", UserRole::Volunteer).await;

    let raw_token = "b".repeat(64);
    set_reset_token(&pool, user.id, &raw_token, -1).await;

    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/users/reset-password/{raw_token}"),
            json!({ "password": "newpass123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Token is invalid or has expired");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reset_password_unknown_token(pool: PgPool) {
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/users/reset-password/{}", "c".repeat(64)),
            json!({ "password": "newpass123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_reset_exactly_one_succeeds(pool: PgPool) {
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, "oldpass123", UserRole::Volunteer).await;

    let raw_token = "d".repeat(64);
    set_reset_token(&pool, user.id, &raw_token, 10).await;

    let app = setup_test_app(pool.clone()).await;

    let first = app.clone().oneshot(json_request(
        "PATCH",
        &format!("/api/users/reset-password/{raw_token}"),
        json!({ "password": "racerpass1" }),
    ));
    let second = app.clone().oneshot(json_request(
        "PATCH",
        &format!("/api/users/reset-password/{raw_token}"),
        json!({ "password": "racerpass2" }),
    ));

    let (first, second) = tokio::join!(first, second);
    let statuses = [first.unwrap().status(), second.unwrap().status()];

    let successes = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let rejections = statuses
        .iter()
        .filter(|s| **s == StatusCode::BAD_REQUEST)
        .count();

    assert_eq!(successes, 1, "exactly one racer may consume the token");
    assert_eq!(rejections, 1, "the loser must observe the cleared token");
}
