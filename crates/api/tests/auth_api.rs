//! Signup and token exchange against a real database.

mod common;

use axum::body::Body;
use axum::http::{Response, StatusCode};
use common::{body_json, get_auth, post_json};
use serde_json::json;
use sqlx::PgPool;
use yamdb_db::repositories::UserRepo;

async fn signup(pool: &PgPool, username: &str, email: &str) -> Response<Body> {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/auth/signup/",
        json!({ "username": username, "email": email }),
    )
    .await
}

async fn request_token(pool: &PgPool, username: &str, code: &str) -> Response<Body> {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/auth/token/",
        json!({ "username": username, "confirmation_code": code }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_then_token_flow(pool: PgPool) {
    let response = signup(&pool, "bob", "bob@x.com").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "username": "bob", "email": "bob@x.com" }));

    let user = UserRepo::find_by_username(&pool, "bob")
        .await
        .unwrap()
        .expect("signup should create the account");

    let response = request_token(&pool, "bob", "wrong-code").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["confirmation_code"].is_array());

    let code = common::confirmation_code(&user);
    let response = request_token(&pool, "bob", &code).await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"]
        .as_str()
        .expect("token should be a string")
        .to_string();

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/users/me/", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "bob");
    assert_eq!(json["role"], "user");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn code_is_single_use(pool: PgPool) {
    signup(&pool, "bob", "bob@x.com").await;
    let user = UserRepo::find_by_username(&pool, "bob").await.unwrap().unwrap();
    let code = common::confirmation_code(&user);

    let response = request_token(&pool, "bob", &code).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = request_token(&pool, "bob", &code).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_signup_is_allowed(pool: PgPool) {
    assert_eq!(signup(&pool, "bob", "bob@x.com").await.status(), StatusCode::OK);
    assert_eq!(signup(&pool, "bob", "bob@x.com").await.status(), StatusCode::OK);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_conflicts_are_rejected(pool: PgPool) {
    signup(&pool, "bob", "bob@x.com").await;

    let response = signup(&pool, "bob", "other@x.com").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = signup(&pool, "alice", "bob@x.com").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Email or username is already taken, choose another one."
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_for_unknown_user_is_404(pool: PgPool) {
    let response = request_token(&pool, "ghost", "whatever").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_of_deleted_user_is_rejected(pool: PgPool) {
    let user = common::create_user(&pool, "bob", yamdb_core::roles::Role::User).await;
    let token = common::token_for(&user);
    UserRepo::delete(&pool, user.id).await.unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn simultaneous_identical_signups_both_succeed(pool: PgPool) {
    for round in 0..10 {
        let username = format!("twin{round}");
        let email = format!("twin{round}@x.com");

        let (a, b) = tokio::join!(
            signup(&pool, &username, &email),
            signup(&pool, &username, &email),
        );
        assert_eq!(a.status(), StatusCode::OK, "round {round}");
        assert_eq!(b.status(), StatusCode::OK, "round {round}");
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 10);
}
