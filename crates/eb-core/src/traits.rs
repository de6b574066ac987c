//! # Core Traits (Ports)
//!
//! Persistence contracts the engines depend on. Any storage plugin must
//! implement these traits to be used by the binary.
//!
//! Methods return `anyhow::Result`: infrastructure failures are opaque at
//! this boundary and get mapped onto [`crate::AppError`] by the services.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Board, Comment, CommentWithAuthor, Post, PostSummary, ScoreSnapshot};

/// Persistence contract for boards, posts, and the feed queries.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn find_board(&self, id: Uuid) -> anyhow::Result<Option<Board>>;
    async fn find_post(&self, id: Uuid) -> anyhow::Result<Option<Post>>;

    async fn create_post(&self, post: Post) -> anyhow::Result<()>;

    /// Soft-deletes the post and cascades a soft delete over its comments in
    /// one transaction. Returns the number of post rows affected (0 means
    /// the post was already gone when the write landed).
    async fn soft_delete_post(&self, id: Uuid, at: DateTime<Utc>) -> anyhow::Result<u64>;

    /// Live posts, newest first. Empty `board_ids` / `excluded_slugs` mean
    /// "no filter", never "match nothing".
    async fn find_recent(
        &self,
        board_ids: &[Uuid],
        limit: i64,
        excluded_slugs: &[String],
    ) -> anyhow::Result<Vec<PostSummary>>;

    /// Live posts by descending hot score.
    async fn find_popular(
        &self,
        limit: i64,
        excluded_slugs: &[String],
    ) -> anyhow::Result<Vec<PostSummary>>;

    /// Counter snapshots for every live post, for the ranking sweep.
    async fn list_scorable(&self) -> anyhow::Result<Vec<ScoreSnapshot>>;

    /// Persists a swept score. Returns rows affected so the sweep can spot
    /// posts deleted mid-pass.
    async fn update_hot_score(&self, id: Uuid, score: f64) -> anyhow::Result<u64>;

    /// Atomic in-place bump of the view counter.
    async fn increment_view_count(&self, id: Uuid) -> anyhow::Result<()>;
}

/// Persistence contract for comment threads.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    /// Looks up a comment *including* soft-deleted rows: deleted comments
    /// remain valid reply anchors and still count against the depth cap.
    async fn find_comment(&self, id: Uuid) -> anyhow::Result<Option<Comment>>;

    /// Number of top-level comments on the post, deleted ones included
    /// (they still occupy a slot in the listing).
    async fn count_threads(&self, post_id: Uuid) -> anyhow::Result<i64>;

    /// One page of top-level comments, newest first, authors joined.
    async fn list_threads(
        &self,
        post_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<CommentWithAuthor>>;

    /// All direct replies of the given parents, oldest first, authors joined.
    async fn list_replies(&self, parent_ids: &[Uuid]) -> anyhow::Result<Vec<CommentWithAuthor>>;

    /// Inserts the comment and increments the post's comment counter in one
    /// transaction.
    async fn create_comment(&self, comment: Comment) -> anyhow::Result<()>;

    /// Soft-deletes the comment and decrements the post's comment counter
    /// (floored at zero) in one transaction. Returns comment rows affected.
    async fn soft_delete_comment(
        &self,
        id: Uuid,
        post_id: Uuid,
        at: DateTime<Utc>,
    ) -> anyhow::Result<u64>;
}

/// Persistence contract for like toggles.
///
/// Each toggle is a single transaction: existence check, row insert/delete,
/// and counter adjustment land together, with the (user, target) uniqueness
/// constraint as the final backstop against double insertion.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LikeRepo: Send + Sync {
    /// Flips the (user, post) like row and returns the post's new like count.
    async fn toggle_post_like(&self, post_id: Uuid, user_id: Uuid) -> anyhow::Result<i64>;

    /// Flips the (user, comment) like row and returns the comment's new like
    /// count.
    async fn toggle_comment_like(&self, comment_id: Uuid, user_id: Uuid) -> anyhow::Result<i64>;
}
