//! `CommentRepo` implementation: thread listings with author joins and the
//! transactional comment write paths.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eb_core::models::{Comment, CommentWithAuthor, DELETED_AUTHOR};
use eb_core::traits::CommentRepo;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row};
use uuid::Uuid;

use crate::{blob_to_uuid, counters, uuid_to_blob, SqliteStore};

fn row_to_comment(row: &SqliteRow) -> Comment {
    Comment {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        post_id: blob_to_uuid(row.get::<Vec<u8>, _>("post_id").as_slice()),
        author_id: blob_to_uuid(row.get::<Vec<u8>, _>("author_id").as_slice()),
        parent_id: row
            .get::<Option<Vec<u8>>, _>("parent_id")
            .map(|blob| blob_to_uuid(blob.as_slice())),
        content: row.get("content"),
        like_count: row.get("like_count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
    }
}

fn row_to_record(row: &SqliteRow) -> CommentWithAuthor {
    CommentWithAuthor {
        comment: row_to_comment(row),
        // a vanished account reads the same as a deleted comment's author
        author_nickname: row
            .get::<Option<String>, _>("nickname")
            .unwrap_or_else(|| DELETED_AUTHOR.to_string()),
    }
}

const RECORD_SELECT: &str = "SELECT c.id, c.post_id, c.author_id, c.parent_id, c.content, \
     c.like_count, c.created_at, c.updated_at, c.deleted_at, u.nickname \
     FROM comments c LEFT JOIN users u ON u.id = c.author_id";

#[async_trait]
impl CommentRepo for SqliteStore {
    async fn find_comment(&self, id: Uuid) -> anyhow::Result<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(|row| row_to_comment(&row)))
    }

    async fn count_threads(&self, post_id: Uuid) -> anyhow::Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = ? AND parent_id IS NULL")
                .bind(uuid_to_blob(post_id))
                .fetch_one(self.pool())
                .await?;
        Ok(count)
    }

    async fn list_threads(
        &self,
        post_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<CommentWithAuthor>> {
        let sql = format!(
            "{RECORD_SELECT} WHERE c.post_id = ? AND c.parent_id IS NULL \
             ORDER BY c.created_at DESC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query(&sql)
            .bind(uuid_to_blob(post_id))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool())
            .await?;
        Ok(rows.iter().map(row_to_record).collect())
    }

    async fn list_replies(&self, parent_ids: &[Uuid]) -> anyhow::Result<Vec<CommentWithAuthor>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(RECORD_SELECT);
        qb.push(" WHERE c.parent_id IN (");
        let mut sep = qb.separated(", ");
        for parent_id in parent_ids {
            sep.push_bind(uuid_to_blob(*parent_id));
        }
        qb.push(") ORDER BY c.created_at ASC");

        let rows = qb.build().fetch_all(self.pool()).await?;
        Ok(rows.iter().map(row_to_record).collect())
    }

    /// Insert + post counter bump as one transaction: both land or neither.
    async fn create_comment(&self, comment: Comment) -> anyhow::Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "INSERT INTO comments (id, post_id, author_id, parent_id, content, like_count, \
             created_at, updated_at, deleted_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(comment.id))
        .bind(uuid_to_blob(comment.post_id))
        .bind(uuid_to_blob(comment.author_id))
        .bind(comment.parent_id.map(uuid_to_blob))
        .bind(comment.content)
        .bind(comment.like_count)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .bind(comment.deleted_at)
        .execute(&mut *tx)
        .await?;

        counters::increment_comment_count(&mut *tx, comment.post_id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Soft delete + counter decrement as one transaction. Only the directly
    /// removed comment decrements the post total; its replies stay visible
    /// under the placeholder and keep counting.
    async fn soft_delete_comment(
        &self,
        id: Uuid,
        post_id: Uuid,
        at: DateTime<Utc>,
    ) -> anyhow::Result<u64> {
        let mut tx = self.pool().begin().await?;

        let affected =
            sqlx::query("UPDATE comments SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
                .bind(at)
                .bind(uuid_to_blob(id))
                .execute(&mut *tx)
                .await?
                .rows_affected();

        if affected > 0 {
            counters::decrement_comment_count(&mut *tx, post_id, affected as i64).await?;
        }

        tx.commit().await?;
        Ok(affected)
    }
}
