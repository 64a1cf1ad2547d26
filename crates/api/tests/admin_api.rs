//! HTTP-level integration tests for the admin endpoints: stats,
//! moderation listing, cross-owner deletion, and RBAC enforcement.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_character, create_test_user, get_auth, login_token,
    member_with_token, post_json_auth, ADMIN_ROLE_ID,
};
use sqlx::PgPool;

async fn admin_token(pool: &PgPool, app: axum::Router) -> String {
    let (_admin, password) = create_test_user(pool, "gallery_admin", ADMIN_ROLE_ID).await;
    login_token(app, "gallery_admin", &password).await
}

/// Stats report user, character, and vote totals plus per-system counts.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_stats(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;
    let (_member, member_token) = member_with_token(&pool, app.clone(), "contributor").await;

    let c1 = create_test_character(app.clone(), &member_token, "One", "D&D 5e").await;
    create_test_character(app.clone(), &member_token, "Two", "D&D 5e").await;
    create_test_character(app.clone(), &member_token, "Three", "GURPS").await;
    let id = c1["id"].as_i64().unwrap();
    post_json_auth(
        app.clone(),
        &format!("/api/v1/characters/{id}/votes"),
        &member_token,
        serde_json::json!({ "vote_type": "like" }),
    )
    .await;

    let response = get_auth(app, "/api/v1/admin/stats", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total_users"], 2);
    assert_eq!(json["total_characters"], 3);
    assert_eq!(json["total_votes"], 1);

    let by_system = json["characters_by_system"].as_array().unwrap();
    assert_eq!(by_system.len(), 2);
    // Largest group first.
    assert_eq!(by_system[0]["rpg_system"], "D&D 5e");
    assert_eq!(by_system[0]["character_count"], 2);
}

/// The moderation listing includes each character's owner username.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_character_listing_includes_owner(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;
    let (_member, member_token) = member_with_token(&pool, app.clone(), "author").await;

    create_test_character(app.clone(), &member_token, "Listed", "GURPS").await;

    let response = get_auth(app, "/api/v1/admin/characters", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Listed");
    assert_eq!(list[0]["owner_username"], "author");
}

/// An admin can delete any character regardless of owner.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_can_delete_any_character(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;
    let (_member, member_token) = member_with_token(&pool, app.clone(), "victim").await;

    let created = create_test_character(app.clone(), &member_token, "Doomed", "GURPS").await;
    let id = created["id"].as_i64().unwrap();

    let response =
        common::delete_auth(app.clone(), &format!("/api/v1/admin/characters/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = common::get(app, &format!("/api/v1/characters/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Regular members are rejected from admin endpoints with 403.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_member_rejected_from_admin_endpoints(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_member, member_token) = member_with_token(&pool, app.clone(), "plain").await;

    let response = get_auth(app.clone(), "/api/v1/admin/stats", &member_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, "/api/v1/admin/characters", &member_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Admin endpoints reject anonymous callers with 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_endpoints_require_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::get(app, "/api/v1/admin/stats").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
