//! Like-toggle scenarios through the real engine and store.

mod common;

use common::{actor, harness, seed_board, seed_user};
use eb_core::error::AppError;
use eb_core::roles::Role;
use uuid::Uuid;

#[tokio::test]
async fn toggling_twice_returns_to_the_original_count() {
    let h = harness().await;
    let author = seed_user(&h.store, "ferris", Role::User).await;
    let board = seed_board(&h.store, "general", Role::User).await;
    let post_id = h
        .posts
        .create_post(board.id, actor(&author), "title", "content")
        .await
        .unwrap();
    let comment_id = h
        .threads
        .create_comment(post_id, author.id, "nice", None)
        .await
        .unwrap();

    let liker = seed_user(&h.store, "crab", Role::User).await;
    assert_eq!(
        h.likes.toggle_comment_like(comment_id, liker.id).await.unwrap(),
        1
    );
    assert_eq!(
        h.likes.toggle_comment_like(comment_id, liker.id).await.unwrap(),
        0
    );
    assert_eq!(
        h.likes.toggle_comment_like(comment_id, liker.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn at_most_one_like_row_per_user_and_target() {
    let h = harness().await;
    let author = seed_user(&h.store, "ferris", Role::User).await;
    let board = seed_board(&h.store, "general", Role::User).await;
    let post_id = h
        .posts
        .create_post(board.id, actor(&author), "title", "content")
        .await
        .unwrap();

    let liker = seed_user(&h.store, "crab", Role::User).await;
    // odd number of flips lands on "liked"
    for _ in 0..3 {
        h.likes.toggle_post_like(post_id, liker.id).await.unwrap();
    }

    let rows = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM post_likes WHERE user_id = ? AND post_id = ?",
    )
    .bind(liker.id.as_bytes().to_vec())
    .bind(post_id.as_bytes().to_vec())
    .fetch_one(h.store.pool())
    .await
    .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn liking_a_missing_target_is_not_found() {
    let h = harness().await;
    let user = seed_user(&h.store, "crab", Role::User).await;

    let err = h
        .likes
        .toggle_post_like(Uuid::now_v7(), user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_, _)));

    let err = h
        .likes
        .toggle_comment_like(Uuid::now_v7(), user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_, _)));
}

#[tokio::test]
async fn post_like_feeds_the_denormalized_counter() {
    let h = harness().await;
    let author = seed_user(&h.store, "ferris", Role::User).await;
    let board = seed_board(&h.store, "general", Role::User).await;
    let post_id = h
        .posts
        .create_post(board.id, actor(&author), "title", "content")
        .await
        .unwrap();

    let a = seed_user(&h.store, "a", Role::User).await;
    let b = seed_user(&h.store, "b", Role::User).await;
    h.likes.toggle_post_like(post_id, a.id).await.unwrap();
    let count = h.likes.toggle_post_like(post_id, b.id).await.unwrap();
    assert_eq!(count, 2);

    let stored = sqlx::query_scalar::<_, i64>("SELECT like_count FROM posts WHERE id = ?")
        .bind(post_id.as_bytes().to_vec())
        .fetch_one(h.store.pool())
        .await
        .unwrap();
    assert_eq!(stored, 2);
}
