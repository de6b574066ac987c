//! `PostRepo` implementation: post rows, feed queries, sweep persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eb_core::models::{Board, Post, PostSummary, ScoreSnapshot};
use eb_core::roles::Role;
use eb_core::traits::PostRepo;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row};
use uuid::Uuid;

use crate::{blob_to_uuid, counters, uuid_to_blob, SqliteStore};

fn row_to_post(row: &SqliteRow) -> Post {
    Post {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        board_id: blob_to_uuid(row.get::<Vec<u8>, _>("board_id").as_slice()),
        author_id: blob_to_uuid(row.get::<Vec<u8>, _>("author_id").as_slice()),
        title: row.get("title"),
        content: row.get("content"),
        view_count: row.get("view_count"),
        comment_count: row.get("comment_count"),
        like_count: row.get("like_count"),
        hot_score: row.get("hot_score"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
    }
}

fn row_to_summary(row: &SqliteRow) -> PostSummary {
    PostSummary {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        board_id: blob_to_uuid(row.get::<Vec<u8>, _>("board_id").as_slice()),
        board_slug: row.get("board_slug"),
        title: row.get("title"),
        author_id: blob_to_uuid(row.get::<Vec<u8>, _>("author_id").as_slice()),
        view_count: row.get("view_count"),
        comment_count: row.get("comment_count"),
        like_count: row.get("like_count"),
        hot_score: row.get("hot_score"),
        created_at: row.get("created_at"),
    }
}

const SUMMARY_SELECT: &str = "SELECT p.id, p.board_id, b.slug AS board_slug, p.title, p.author_id, \
     p.view_count, p.comment_count, p.like_count, p.hot_score, p.created_at \
     FROM posts p JOIN boards b ON b.id = p.board_id \
     WHERE p.deleted_at IS NULL";

fn push_slug_exclusion<'a>(qb: &mut QueryBuilder<'a, sqlx::Sqlite>, excluded_slugs: &'a [String]) {
    if !excluded_slugs.is_empty() {
        qb.push(" AND b.slug NOT IN (");
        let mut sep = qb.separated(", ");
        for slug in excluded_slugs {
            sep.push_bind(slug.as_str());
        }
        qb.push(")");
    }
}

#[async_trait]
impl PostRepo for SqliteStore {
    async fn find_board(&self, id: Uuid) -> anyhow::Result<Option<Board>> {
        let row = sqlx::query(
            "SELECT id, slug, title, description, min_write_role, created_at FROM boards WHERE id = ?",
        )
        .bind(uuid_to_blob(id))
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|row| Board {
            id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
            slug: row.get("slug"),
            title: row.get("title"),
            description: row.get("description"),
            min_write_role: Role::from_str_loose(row.get::<String, _>("min_write_role").as_str())
                .unwrap_or(Role::User),
            created_at: row.get("created_at"),
        }))
    }

    async fn find_post(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
        let row = sqlx::query("SELECT * FROM posts WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(|row| row_to_post(&row)))
    }

    async fn create_post(&self, post: Post) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO posts (id, board_id, author_id, title, content, view_count, comment_count, \
             like_count, hot_score, created_at, updated_at, deleted_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(post.id))
        .bind(uuid_to_blob(post.board_id))
        .bind(uuid_to_blob(post.author_id))
        .bind(post.title)
        .bind(post.content)
        .bind(post.view_count)
        .bind(post.comment_count)
        .bind(post.like_count)
        .bind(post.hot_score)
        .bind(post.created_at)
        .bind(post.updated_at)
        .bind(post.deleted_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Marks the post deleted and cascades over its live comments.
    ///
    /// One transaction: a crash between the two updates must not leave
    /// orphaned live comments on a dead post.
    async fn soft_delete_post(&self, id: Uuid, at: DateTime<Utc>) -> anyhow::Result<u64> {
        let mut tx = self.pool().begin().await?;

        let affected = sqlx::query("UPDATE posts SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(at)
            .bind(uuid_to_blob(id))
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if affected > 0 {
            sqlx::query("UPDATE comments SET deleted_at = ? WHERE post_id = ? AND deleted_at IS NULL")
                .bind(at)
                .bind(uuid_to_blob(id))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(affected)
    }

    async fn find_recent(
        &self,
        board_ids: &[Uuid],
        limit: i64,
        excluded_slugs: &[String],
    ) -> anyhow::Result<Vec<PostSummary>> {
        let mut qb: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(SUMMARY_SELECT);

        if !board_ids.is_empty() {
            qb.push(" AND p.board_id IN (");
            let mut sep = qb.separated(", ");
            for board_id in board_ids {
                sep.push_bind(uuid_to_blob(*board_id));
            }
            qb.push(")");
        }
        push_slug_exclusion(&mut qb, excluded_slugs);

        qb.push(" ORDER BY p.created_at DESC LIMIT ");
        qb.push_bind(limit);

        let rows = qb.build().fetch_all(self.pool()).await?;
        Ok(rows.iter().map(row_to_summary).collect())
    }

    async fn find_popular(
        &self,
        limit: i64,
        excluded_slugs: &[String],
    ) -> anyhow::Result<Vec<PostSummary>> {
        let mut qb: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(SUMMARY_SELECT);
        push_slug_exclusion(&mut qb, excluded_slugs);
        qb.push(" ORDER BY p.hot_score DESC LIMIT ");
        qb.push_bind(limit);

        let rows = qb.build().fetch_all(self.pool()).await?;
        Ok(rows.iter().map(row_to_summary).collect())
    }

    async fn list_scorable(&self) -> anyhow::Result<Vec<ScoreSnapshot>> {
        let rows = sqlx::query(
            "SELECT id, view_count, comment_count, like_count, created_at FROM posts WHERE deleted_at IS NULL",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .iter()
            .map(|row| ScoreSnapshot {
                id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
                view_count: row.get("view_count"),
                comment_count: row.get("comment_count"),
                like_count: row.get("like_count"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    async fn update_hot_score(&self, id: Uuid, score: f64) -> anyhow::Result<u64> {
        let result = sqlx::query("UPDATE posts SET hot_score = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(score)
            .bind(uuid_to_blob(id))
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn increment_view_count(&self, id: Uuid) -> anyhow::Result<()> {
        counters::increment_view_count(self.pool(), id).await?;
        Ok(())
    }
}
