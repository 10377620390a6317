//! Access rules that are decided before any database access.
//!
//! These run against a pool that cannot connect, so they need no database.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, get_auth, post_json, send};
use serde_json::json;

#[tokio::test]
async fn anonymous_title_create_is_forbidden() {
    let app = common::build_test_app(common::lazy_pool());
    let body = json!({ "name": "Solaris", "year": 1972 });
    let response = post_json(app, "/api/v1/titles/", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(
        json["error"],
        "You must have admin rights to perform this action."
    );
}

#[tokio::test]
async fn anonymous_classifier_writes_are_forbidden() {
    for uri in ["/api/v1/categories", "/api/v1/genres/"] {
        let app = common::build_test_app(common::lazy_pool());
        let response = post_json(app, uri, json!({ "name": "Drama", "slug": "drama" })).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    let app = common::build_test_app(common::lazy_pool());
    let response = send(app, Method::DELETE, "/api/v1/genres/drama/", None, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_review_create_is_unauthorized() {
    let app = common::build_test_app(common::lazy_pool());
    let body = json!({ "text": "Great", "score": 9 });
    let response = post_json(app, "/api/v1/titles/1/reviews/", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Authentication credentials were not provided.");
}

#[tokio::test]
async fn anonymous_comment_create_is_unauthorized() {
    let app = common::build_test_app(common::lazy_pool());
    let response = post_json(
        app,
        "/api/v1/titles/1/reviews/1/comments",
        json!({ "text": "Agreed" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_requires_credentials() {
    let app = common::build_test_app(common::lazy_pool());
    let response = send(app, Method::GET, "/api/v1/users/me/", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_management_requires_credentials() {
    let app = common::build_test_app(common::lazy_pool());
    let response = send(app, Method::GET, "/api/v1/users", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_token_is_unauthorized() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get_auth(app, "/api/v1/users/me", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn invalid_token_is_unauthorized_on_catalog_writes() {
    let app = common::build_test_app(common::lazy_pool());
    let response = send(
        app,
        Method::POST,
        "/api/v1/titles",
        Some("not-a-jwt"),
        Some(json!({ "name": "Solaris", "year": 1972 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_authorization_header_is_unauthorized() {
    let app = common::build_test_app(common::lazy_pool());
    let request = axum::http::Request::builder()
        .uri("/api/v1/users/me")
        .header("authorization", "Token abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_rejects_reserved_username() {
    let app = common::build_test_app(common::lazy_pool());
    let body = json!({ "username": "me", "email": "me@x.com" });
    let response = post_json(app, "/api/v1/auth/signup/", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["username"].is_array());
}

#[tokio::test]
async fn signup_rejects_disallowed_characters() {
    let app = common::build_test_app(common::lazy_pool());
    let body = json!({ "username": "bob smith!", "email": "bob@x.com" });
    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["fields"]["username"][0],
        "' ' cannot be used in a username"
    );
}

#[tokio::test]
async fn signup_rejects_malformed_json() {
    let app = common::build_test_app(common::lazy_pool());
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/signup")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_is_not_allowed() {
    let app = common::build_test_app(common::lazy_pool());
    let response = send(
        app,
        Method::PUT,
        "/api/v1/titles/1",
        None,
        Some(json!({ "name": "Solaris" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
