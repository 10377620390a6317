//! Reviews and comments against a real database.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, patch_json_auth, post_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;
use yamdb_core::roles::Role;
use yamdb_db::models::title::CreateTitle;
use yamdb_db::repositories::TitleRepo;

async fn seed_title(pool: &PgPool) -> i64 {
    let input = CreateTitle {
        name: "Solaris".to_string(),
        year: 1972,
        description: None,
        category_id: None,
        genre_ids: Vec::new(),
    };
    TitleRepo::create(pool, &input).await.unwrap().id
}

async fn post(pool: &PgPool, uri: &str, body: Value, token: &str) -> (StatusCode, Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, uri, body, token).await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn patch(pool: &PgPool, uri: &str, body: Value, token: &str) -> StatusCode {
    let app = common::build_test_app(pool.clone());
    patch_json_auth(app, uri, body, token).await.status()
}

async fn delete(pool: &PgPool, uri: &str, token: &str) -> StatusCode {
    let app = common::build_test_app(pool.clone());
    delete_auth(app, uri, token).await.status()
}

async fn fetch(pool: &PgPool, uri: &str) -> (StatusCode, Value) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, uri).await;
    let status = response.status();
    (status, body_json(response).await)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_create_and_rating(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let bob = common::token_for(&common::create_user(&pool, "bob", Role::User).await);
    let alice = common::token_for(&common::create_user(&pool, "alice", Role::User).await);
    let uri = format!("/api/v1/titles/{title_id}/reviews/");

    let (status, review) = post(&pool, &uri, json!({ "text": "Great", "score": 8 }), &bob).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["author"], "bob");
    assert_eq!(review["title"], "Solaris");
    assert_eq!(review["score"], 8);

    let (status, _) = post(&pool, &uri, json!({ "text": "Superb", "score": 9 }), &alice).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, title) = fetch(&pool, &format!("/api/v1/titles/{title_id}")).await;
    assert_eq!(title["rating"], 8);

    let (status, list) = fetch(&pool, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 2);
    assert_eq!(list["results"][0]["author"], "bob");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_review_by_same_author_is_rejected(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let bob = common::token_for(&common::create_user(&pool, "bob", Role::User).await);
    let uri = format!("/api/v1/titles/{title_id}/reviews");

    let (status, _) = post(&pool, &uri, json!({ "text": "Great", "score": 8 }), &bob).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = post(&pool, &uri, json!({ "text": "Again", "score": 2 }), &bob).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "You have already reviewed this title.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_score_must_be_in_range(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let bob = common::token_for(&common::create_user(&pool, "bob", Role::User).await);
    let uri = format!("/api/v1/titles/{title_id}/reviews");

    for score in [0, 11] {
        let (status, json) =
            post(&pool, &uri, json!({ "text": "Hmm", "score": score }), &bob).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "score {score}");
        assert!(json["fields"]["score"].is_array());
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_on_missing_title_is_404(pool: PgPool) {
    let bob = common::token_for(&common::create_user(&pool, "bob", Role::User).await);
    let (status, _) = post(
        &pool,
        "/api/v1/titles/999/reviews",
        json!({ "text": "Great", "score": 8 }),
        &bob,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_changes_follow_author_or_staff(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let bob = common::token_for(&common::create_user(&pool, "bob", Role::User).await);
    let stranger = common::token_for(&common::create_user(&pool, "eve", Role::User).await);
    let moderator = common::token_for(&common::create_user(&pool, "mod", Role::Moderator).await);
    let admin = common::token_for(&common::create_user(&pool, "admin", Role::Admin).await);

    let (_, review) = post(
        &pool,
        &format!("/api/v1/titles/{title_id}/reviews"),
        json!({ "text": "Great", "score": 8 }),
        &bob,
    )
    .await;
    let uri = format!("/api/v1/titles/{title_id}/reviews/{}/", review["id"]);

    assert_eq!(
        patch(&pool, &uri, json!({ "score": 1 }), &stranger).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(delete(&pool, &uri, &stranger).await, StatusCode::FORBIDDEN);

    assert_eq!(
        patch(&pool, &uri, json!({ "score": 7 }), &bob).await,
        StatusCode::OK
    );
    assert_eq!(
        patch(&pool, &uri, json!({ "text": "Moderated" }), &moderator).await,
        StatusCode::OK
    );

    let (_, json) = fetch(&pool, &uri).await;
    assert_eq!(json["score"], 7);
    assert_eq!(json["text"], "Moderated");
    assert_eq!(json["author"], "bob");

    assert_eq!(delete(&pool, &uri, &admin).await, StatusCode::NO_CONTENT);
    let (status, _) = fetch(&pool, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_is_scoped_to_its_title(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let other_title_id = seed_title(&pool).await;
    let bob = common::token_for(&common::create_user(&pool, "bob", Role::User).await);

    let (_, review) = post(
        &pool,
        &format!("/api/v1/titles/{title_id}/reviews"),
        json!({ "text": "Great", "score": 8 }),
        &bob,
    )
    .await;

    let (status, _) = fetch(
        &pool,
        &format!("/api/v1/titles/{other_title_id}/reviews/{}", review["id"]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_lifecycle(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let bob = common::token_for(&common::create_user(&pool, "bob", Role::User).await);
    let alice = common::token_for(&common::create_user(&pool, "alice", Role::User).await);

    let (_, review) = post(
        &pool,
        &format!("/api/v1/titles/{title_id}/reviews"),
        json!({ "text": "Great", "score": 8 }),
        &bob,
    )
    .await;
    let comments_uri = format!("/api/v1/titles/{title_id}/reviews/{}/comments/", review["id"]);

    let (status, comment) = post(&pool, &comments_uri, json!({ "text": "Agreed" }), &alice).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["author"], "alice");
    assert_eq!(comment["review"], review["id"]);

    let (status, json) = post(&pool, &comments_uri, json!({ "text": "" }), &alice).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["fields"]["text"].is_array());

    let (_, list) = fetch(&pool, &comments_uri).await;
    assert_eq!(list["count"], 1);

    let comment_uri = format!("{comments_uri}{}", comment["id"]);
    assert_eq!(
        patch(&pool, &comment_uri, json!({ "text": "Hijacked" }), &bob).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        patch(&pool, &comment_uri, json!({ "text": "Strongly agreed" }), &alice).await,
        StatusCode::OK
    );

    let (_, json) = fetch(&pool, &comment_uri).await;
    assert_eq!(json["text"], "Strongly agreed");

    assert_eq!(delete(&pool, &comment_uri, &alice).await, StatusCode::NO_CONTENT);
    let (_, list) = fetch(&pool, &comments_uri).await;
    assert_eq!(list["count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comments_on_missing_review_are_404(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let bob = common::token_for(&common::create_user(&pool, "bob", Role::User).await);

    let uri = format!("/api/v1/titles/{title_id}/reviews/999/comments");
    let (status, _) = fetch(&pool, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&pool, &uri, json!({ "text": "Hello" }), &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_edit_by_stranger_is_forbidden(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let bob = common::token_for(&common::create_user(&pool, "bob", Role::User).await);
    let eve = common::token_for(&common::create_user(&pool, "eve", Role::User).await);

    let (_, review) = post(
        &pool,
        &format!("/api/v1/titles/{title_id}/reviews"),
        json!({ "text": "Great", "score": 8 }),
        &bob,
    )
    .await;
    let review_uri = format!("/api/v1/titles/{title_id}/reviews/{}", review["id"]);

    let (_, comment) = post(
        &pool,
        &format!("{review_uri}/comments"),
        json!({ "text": "Agreed" }),
        &bob,
    )
    .await;
    let comment_uri = format!("{review_uri}/comments/{}", comment["id"]);

    assert_eq!(
        patch(&pool, &review_uri, json!({ "score": 11 }), &eve).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        patch(&pool, &comment_uri, json!({ "text": "" }), &eve).await,
        StatusCode::FORBIDDEN
    );

    // The author still gets field errors for the same payloads.
    assert_eq!(
        patch(&pool, &review_uri, json!({ "score": 11 }), &bob).await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        patch(&pool, &comment_uri, json!({ "text": "" }), &bob).await,
        StatusCode::BAD_REQUEST
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_patch_is_partial(pool: PgPool) {
    let title_id = seed_title(&pool).await;
    let bob = common::token_for(&common::create_user(&pool, "bob", Role::User).await);

    let (_, review) = post(
        &pool,
        &format!("/api/v1/titles/{title_id}/reviews"),
        json!({ "text": "Great", "score": 8 }),
        &bob,
    )
    .await;
    let comments_uri = format!("/api/v1/titles/{title_id}/reviews/{}/comments", review["id"]);
    let (_, comment) = post(&pool, &comments_uri, json!({ "text": "Agreed" }), &bob).await;
    let comment_uri = format!("{comments_uri}/{}", comment["id"]);

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(app, &comment_uri, json!({}), &bob).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["text"], "Agreed");
    assert_eq!(json["author"], "bob");
}
