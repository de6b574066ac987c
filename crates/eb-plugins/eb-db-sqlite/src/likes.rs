//! `LikeRepo` implementation: transactional like flips.
//!
//! Delete-first toggle: if the (user, target) row was there, the flip is an
//! unlike; otherwise insert + increment. The composite primary key is the
//! backstop: two racing likes by the same user collapse into one row, and
//! the loser's transaction fails instead of double-counting.

use async_trait::async_trait;
use chrono::Utc;
use eb_core::traits::LikeRepo;
use uuid::Uuid;

use crate::{counters, uuid_to_blob, SqliteStore};

#[async_trait]
impl LikeRepo for SqliteStore {
    async fn toggle_post_like(&self, post_id: Uuid, user_id: Uuid) -> anyhow::Result<i64> {
        let mut tx = self.pool().begin().await?;

        let removed = sqlx::query("DELETE FROM post_likes WHERE user_id = ? AND post_id = ?")
            .bind(uuid_to_blob(user_id))
            .bind(uuid_to_blob(post_id))
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed > 0 {
            counters::decrement_post_like_count(&mut *tx, post_id).await?;
        } else {
            sqlx::query("INSERT INTO post_likes (user_id, post_id, created_at) VALUES (?, ?, ?)")
                .bind(uuid_to_blob(user_id))
                .bind(uuid_to_blob(post_id))
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
            counters::increment_post_like_count(&mut *tx, post_id).await?;
        }

        let count: i64 = sqlx::query_scalar("SELECT like_count FROM posts WHERE id = ?")
            .bind(uuid_to_blob(post_id))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(count)
    }

    async fn toggle_comment_like(&self, comment_id: Uuid, user_id: Uuid) -> anyhow::Result<i64> {
        let mut tx = self.pool().begin().await?;

        let removed = sqlx::query("DELETE FROM comment_likes WHERE user_id = ? AND comment_id = ?")
            .bind(uuid_to_blob(user_id))
            .bind(uuid_to_blob(comment_id))
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed > 0 {
            counters::decrement_comment_like_count(&mut *tx, comment_id).await?;
        } else {
            sqlx::query(
                "INSERT INTO comment_likes (user_id, comment_id, created_at) VALUES (?, ?, ?)",
            )
            .bind(uuid_to_blob(user_id))
            .bind(uuid_to_blob(comment_id))
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
            counters::increment_comment_like_count(&mut *tx, comment_id).await?;
        }

        let count: i64 = sqlx::query_scalar("SELECT like_count FROM comments WHERE id = ?")
            .bind(uuid_to_blob(comment_id))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, seed_board, seed_user, ts};
    use eb_core::models::Comment;
    use eb_core::traits::{CommentRepo, PostRepo};

    async fn seed_comment(store: &SqliteStore) -> (Uuid, Uuid) {
        let user = seed_user(store, "ferris").await;
        let board = seed_board(store, "general").await;
        let p = post(board.id, user.id, 0);
        let post_id = p.id;
        store.create_post(p).await.unwrap();

        let comment = Comment {
            id: Uuid::now_v7(),
            post_id,
            author_id: user.id,
            parent_id: None,
            content: "hello".to_string(),
            like_count: 0,
            created_at: ts(1),
            updated_at: None,
            deleted_at: None,
        };
        let comment_id = comment.id;
        store.create_comment(comment).await.unwrap();
        (comment_id, user.id)
    }

    #[tokio::test]
    async fn toggle_flips_one_zero_one() {
        let store = SqliteStore::in_memory().await.unwrap();
        let (comment_id, user_id) = seed_comment(&store).await;

        assert_eq!(store.toggle_comment_like(comment_id, user_id).await.unwrap(), 1);
        assert_eq!(store.toggle_comment_like(comment_id, user_id).await.unwrap(), 0);
        assert_eq!(store.toggle_comment_like(comment_id, user_id).await.unwrap(), 1);

        let stored = store.find_comment(comment_id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, 1);
    }

    #[tokio::test]
    async fn likes_from_two_users_accumulate() {
        let store = SqliteStore::in_memory().await.unwrap();
        let (comment_id, first) = seed_comment(&store).await;
        let second = seed_user(&store, "other").await;

        assert_eq!(store.toggle_comment_like(comment_id, first).await.unwrap(), 1);
        assert_eq!(
            store.toggle_comment_like(comment_id, second.id).await.unwrap(),
            2
        );
        assert_eq!(store.toggle_comment_like(comment_id, first).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn post_likes_flip_the_same_way() {
        let store = SqliteStore::in_memory().await.unwrap();
        let user = seed_user(&store, "ferris").await;
        let board = seed_board(&store, "general").await;
        let p = post(board.id, user.id, 0);
        let post_id = p.id;
        store.create_post(p).await.unwrap();

        assert_eq!(store.toggle_post_like(post_id, user.id).await.unwrap(), 1);
        assert_eq!(store.toggle_post_like(post_id, user.id).await.unwrap(), 0);
        let stored = store.find_post(post_id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, 0);
    }
}
