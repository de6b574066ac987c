//! Like Toggle Engine.
//!
//! One call flips one (user, target) like: insert-and-increment if the row
//! is absent, delete-and-decrement if present. The storage layer runs the
//! whole flip as a single transaction and clamps counters at zero, so a
//! racing double-unlike degrades to a no-op rather than a negative count.

use std::sync::Arc;

use uuid::Uuid;

use eb_core::error::{AppError, Result};
use eb_core::traits::{CommentRepo, LikeRepo, PostRepo};

pub struct LikeService {
    posts: Arc<dyn PostRepo>,
    comments: Arc<dyn CommentRepo>,
    likes: Arc<dyn LikeRepo>,
}

impl LikeService {
    pub fn new(
        posts: Arc<dyn PostRepo>,
        comments: Arc<dyn CommentRepo>,
        likes: Arc<dyn LikeRepo>,
    ) -> Self {
        Self {
            posts,
            comments,
            likes,
        }
    }

    /// Flips the caller's like on a post and returns the new like count.
    pub async fn toggle_post_like(&self, post_id: Uuid, user_id: Uuid) -> Result<i64> {
        self.posts
            .find_post(post_id)
            .await?
            .filter(|p| !p.is_deleted())
            .ok_or_else(|| AppError::not_found("post", post_id))?;

        let count = self.likes.toggle_post_like(post_id, user_id).await?;
        tracing::debug!(%post_id, %user_id, count, "post like toggled");
        Ok(count)
    }

    /// Flips the caller's like on a comment and returns the new like count.
    pub async fn toggle_comment_like(&self, comment_id: Uuid, user_id: Uuid) -> Result<i64> {
        self.comments
            .find_comment(comment_id)
            .await?
            .filter(|c| !c.is_deleted())
            .ok_or_else(|| AppError::not_found("comment", comment_id))?;

        let count = self.likes.toggle_comment_like(comment_id, user_id).await?;
        tracing::debug!(%comment_id, %user_id, count, "comment like toggled");
        Ok(count)
    }
}
