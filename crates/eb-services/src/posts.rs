//! Post write paths: creation (role-gated per board, hot-score seeded) and
//! soft removal with comment cascade. Read-side CRUD lives with the HTTP
//! layer's own projections and is not part of this core.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use eb_core::error::{AppError, Result};
use eb_core::models::{Actor, Post};
use eb_core::roles::{has_role, Role};
use eb_core::traits::PostRepo;

use crate::ranking::initial_score;

pub struct PostService {
    posts: Arc<dyn PostRepo>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepo>) -> Self {
        Self { posts }
    }

    /// Creates a post on the board, provided the actor's role clears the
    /// board's minimum write role. The hot score starts at the creation-time
    /// seed and stays there until the next ranking sweep.
    pub async fn create_post(
        &self,
        board_id: Uuid,
        actor: Actor,
        title: &str,
        content: &str,
    ) -> Result<Uuid> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(AppError::ValidationError(
                "post title and content must not be blank".to_string(),
            ));
        }

        let board = self
            .posts
            .find_board(board_id)
            .await?
            .ok_or_else(|| AppError::not_found("board", board_id))?;

        if !has_role(actor.role, board.min_write_role) {
            return Err(AppError::PermissionDenied(format!(
                "board '{}' requires role {} to post",
                board.slug,
                board.min_write_role.as_str()
            )));
        }

        let now = Utc::now();
        let post = Post {
            id: Uuid::now_v7(),
            board_id,
            author_id: actor.id,
            title: title.to_string(),
            content: content.to_string(),
            view_count: 0,
            comment_count: 0,
            like_count: 0,
            hot_score: initial_score(now),
            created_at: now,
            updated_at: None,
            deleted_at: None,
        };
        let post_id = post.id;

        self.posts.create_post(post).await?;
        tracing::info!(%post_id, %board_id, "post created");

        Ok(post_id)
    }

    /// Soft-deletes a post and cascades over its comments. Allowed for the
    /// post's author and for admins.
    pub async fn remove_post(&self, post_id: Uuid, actor: Actor) -> Result<()> {
        let post = self
            .posts
            .find_post(post_id)
            .await?
            .filter(|p| !p.is_deleted())
            .ok_or_else(|| AppError::not_found("post", post_id))?;

        if post.author_id != actor.id && !has_role(actor.role, Role::Admin) {
            return Err(AppError::PermissionDenied(
                "only the author or an admin may remove a post".to_string(),
            ));
        }

        let affected = self.posts.soft_delete_post(post_id, Utc::now()).await?;
        if affected == 0 {
            return Err(AppError::Internal(anyhow::anyhow!(
                "soft delete of post {post_id} affected no rows"
            )));
        }

        tracing::info!(%post_id, actor = %actor.id, "post removed");
        Ok(())
    }

    /// Atomic view-counter bump, called by the reading layer on each post
    /// render. Unknown ids fall through as a no-op update.
    pub async fn record_view(&self, post_id: Uuid) -> Result<()> {
        self.posts.increment_view_count(post_id).await?;
        Ok(())
    }
}
