//! Counter store: atomic in-place updates of the denormalized aggregate
//! columns on posts and comments.
//!
//! Every mutation here is a single `UPDATE` executed at the storage layer,
//! never a read-modify-write in engine memory, so concurrent writers cannot
//! lose updates. Decrements clamp at zero with `MAX(x - n, 0)`.
//!
//! The functions take any SQLite executor so callers can run them inside
//! their own transactions alongside the row mutation they cache.

use sqlx::sqlite::Sqlite;
use sqlx::Executor;
use uuid::Uuid;

use crate::uuid_to_blob;

pub async fn increment_comment_count<'e, E>(exec: E, post_id: Uuid) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = ?")
        .bind(uuid_to_blob(post_id))
        .execute(exec)
        .await?;
    Ok(())
}

/// Decrements by `amount`, floored at zero. Returns rows affected so callers
/// can spot a decrement that found no post.
pub async fn decrement_comment_count<'e, E>(exec: E, post_id: Uuid, amount: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE posts SET comment_count = MAX(comment_count - ?, 0) WHERE id = ?")
        .bind(amount)
        .bind(uuid_to_blob(post_id))
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

pub async fn increment_post_like_count<'e, E>(exec: E, post_id: Uuid) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE posts SET like_count = like_count + 1 WHERE id = ?")
        .bind(uuid_to_blob(post_id))
        .execute(exec)
        .await?;
    Ok(())
}

pub async fn decrement_post_like_count<'e, E>(exec: E, post_id: Uuid) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE posts SET like_count = MAX(like_count - 1, 0) WHERE id = ?")
        .bind(uuid_to_blob(post_id))
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

pub async fn increment_comment_like_count<'e, E>(exec: E, comment_id: Uuid) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE comments SET like_count = like_count + 1 WHERE id = ?")
        .bind(uuid_to_blob(comment_id))
        .execute(exec)
        .await?;
    Ok(())
}

pub async fn decrement_comment_like_count<'e, E>(exec: E, comment_id: Uuid) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE comments SET like_count = MAX(like_count - 1, 0) WHERE id = ?")
        .bind(uuid_to_blob(comment_id))
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

pub async fn increment_view_count<'e, E>(exec: E, post_id: Uuid) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = ?")
        .bind(uuid_to_blob(post_id))
        .execute(exec)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, seed_board, seed_user};
    use crate::SqliteStore;
    use eb_core::traits::PostRepo;

    #[tokio::test]
    async fn decrement_clamps_at_zero() {
        let store = SqliteStore::in_memory().await.unwrap();
        let user = seed_user(&store, "u").await;
        let board = seed_board(&store, "b").await;
        let p = post(board.id, user.id, 0);
        let post_id = p.id;
        store.create_post(p).await.unwrap();

        increment_comment_count(store.pool(), post_id).await.unwrap();
        decrement_comment_count(store.pool(), post_id, 5)
            .await
            .unwrap();

        let stored = store.find_post(post_id).await.unwrap().unwrap();
        assert_eq!(stored.comment_count, 0);
    }

    #[tokio::test]
    async fn decrement_on_missing_post_affects_no_rows() {
        let store = SqliteStore::in_memory().await.unwrap();
        let affected = decrement_comment_count(store.pool(), uuid::Uuid::now_v7(), 1)
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }
}
