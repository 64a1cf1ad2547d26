//! Integration tests for the vote repository: the unique constraint,
//! atomic upsert, conditional retract, and aggregate counting.

use sqlx::PgPool;
use taverna_core::vote::VoteChoice;
use taverna_db::models::character::CreateCharacter;
use taverna_db::models::user::CreateUser;
use taverna_db::repositories::{CharacterRepo, UserRepo, VoteRepo};

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: "x".to_string(),
        role_id: 1,
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

async fn seed_character(pool: &PgPool, user_id: i64) -> i64 {
    let input = CreateCharacter {
        user_id,
        name: "Subject".to_string(),
        player_name: "Player".to_string(),
        age: 30,
        height: 1.8,
        rpg_system: "GURPS".to_string(),
        story: String::new(),
        image_url: None,
        friendships: vec![],
    };
    CharacterRepo::create(pool, &input).await.unwrap().character.id
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upsert_records_then_replaces(pool: PgPool) {
    let user_id = seed_user(&pool, "voter").await;
    let character_id = seed_character(&pool, user_id).await;

    let vote = VoteRepo::upsert(&pool, character_id, user_id, VoteChoice::Like)
        .await
        .unwrap();
    assert_eq!(vote.vote_type, "like");

    // Same (character, user) key: the row is replaced, not duplicated.
    let vote = VoteRepo::upsert(&pool, character_id, user_id, VoteChoice::Dislike)
        .await
        .unwrap();
    assert_eq!(vote.vote_type, "dislike");

    assert_eq!(VoteRepo::count(&pool).await.unwrap(), 1);

    let aggregate = VoteRepo::aggregate(&pool, character_id).await.unwrap();
    assert_eq!(aggregate.likes, 0);
    assert_eq!(aggregate.dislikes, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_retract_is_conditional_on_choice(pool: PgPool) {
    let user_id = seed_user(&pool, "retractor").await;
    let character_id = seed_character(&pool, user_id).await;

    VoteRepo::upsert(&pool, character_id, user_id, VoteChoice::Like)
        .await
        .unwrap();

    // Retracting the other choice is a no-op (lost race with a switch).
    let removed = VoteRepo::retract(&pool, character_id, user_id, VoteChoice::Dislike)
        .await
        .unwrap();
    assert!(!removed);
    assert_eq!(VoteRepo::count(&pool).await.unwrap(), 1);

    let removed = VoteRepo::retract(&pool, character_id, user_id, VoteChoice::Like)
        .await
        .unwrap();
    assert!(removed);
    assert_eq!(VoteRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_user_vote(pool: PgPool) {
    let user_id = seed_user(&pool, "finder").await;
    let character_id = seed_character(&pool, user_id).await;

    assert_eq!(
        VoteRepo::find_user_vote(&pool, character_id, user_id)
            .await
            .unwrap(),
        None
    );

    VoteRepo::upsert(&pool, character_id, user_id, VoteChoice::Like)
        .await
        .unwrap();

    assert_eq!(
        VoteRepo::find_user_vote(&pool, character_id, user_id)
            .await
            .unwrap(),
        Some(VoteChoice::Like)
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_aggregate_counts_per_choice(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let fan = seed_user(&pool, "fan").await;
    let critic = seed_user(&pool, "critic").await;
    let character_id = seed_character(&pool, owner).await;

    VoteRepo::upsert(&pool, character_id, owner, VoteChoice::Like)
        .await
        .unwrap();
    VoteRepo::upsert(&pool, character_id, fan, VoteChoice::Like)
        .await
        .unwrap();
    VoteRepo::upsert(&pool, character_id, critic, VoteChoice::Dislike)
        .await
        .unwrap();

    let aggregate = VoteRepo::aggregate(&pool, character_id).await.unwrap();
    assert_eq!(aggregate.likes, 2);
    assert_eq!(aggregate.dislikes, 1);
    assert_eq!(aggregate.total(), 3);
}

/// Aggregates of characters that do not exist are the empty state.
#[sqlx::test(migrations = "./migrations")]
async fn test_aggregate_of_unknown_character_is_zero(pool: PgPool) {
    let aggregate = VoteRepo::aggregate(&pool, 999).await.unwrap();
    assert_eq!(aggregate.likes, 0);
    assert_eq!(aggregate.dislikes, 0);
}

/// Direct inserts bypassing the upsert still hit the unique constraint.
#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_vote_violates_unique_constraint(pool: PgPool) {
    let user_id = seed_user(&pool, "dupe").await;
    let character_id = seed_character(&pool, user_id).await;

    sqlx::query("INSERT INTO character_votes (character_id, user_id, vote_type) VALUES ($1, $2, 'like')")
        .bind(character_id)
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let result = sqlx::query(
        "INSERT INTO character_votes (character_id, user_id, vote_type) VALUES ($1, $2, 'dislike')",
    )
    .bind(character_id)
    .bind(user_id)
    .execute(&pool)
    .await;

    let err = result.expect_err("second vote for the same pair must fail");
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
}
