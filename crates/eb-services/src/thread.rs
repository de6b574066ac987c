//! Thread Engine: flattened, display-ready comment listings plus the
//! comment create/remove paths.
//!
//! A "thread" is a top-level comment and its direct replies. Listings are
//! paginated over top-level comments only; replies ride along with their
//! parent, so a page boundary never splits a thread.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use eb_core::error::{AppError, Result};
use eb_core::models::{Actor, Comment, CommentRow, CommentWithAuthor, ThreadPage};
use eb_core::roles::{has_role, Role};
use eb_core::traits::{CommentRepo, PostRepo};

/// Top-level threads per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

pub struct ThreadService {
    posts: Arc<dyn PostRepo>,
    comments: Arc<dyn CommentRepo>,
    page_size: i64,
}

impl ThreadService {
    pub fn new(posts: Arc<dyn PostRepo>, comments: Arc<dyn CommentRepo>) -> Self {
        Self {
            posts,
            comments,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Returns one page of the post's comment thread, flattened for display:
    /// each top-level comment (newest thread first) immediately followed by
    /// its replies, oldest reply first.
    ///
    /// Page numbers are 1-based; anything below 1 is treated as page 1. A
    /// page past the end comes back empty but with the real totals. An
    /// unknown post id yields an empty page; whether that is an error is
    /// the caller's policy, not ours.
    pub async fn get_thread(&self, post_id: Uuid, page: i64) -> Result<ThreadPage> {
        let page = page.max(1);

        let total_items = self.comments.count_threads(post_id).await?;
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + self.page_size - 1) / self.page_size
        };

        let offset = (page - 1) * self.page_size;
        let parents = if total_items > 0 && offset < total_items {
            self.comments
                .list_threads(post_id, self.page_size, offset)
                .await?
        } else {
            Vec::new()
        };

        let parent_ids: Vec<Uuid> = parents.iter().map(|p| p.comment.id).collect();
        let replies = if parent_ids.is_empty() {
            Vec::new()
        } else {
            self.comments.list_replies(&parent_ids).await?
        };

        // Replies arrive ordered ascending by creation time; grouping keeps
        // that order within each parent.
        let mut by_parent: HashMap<Uuid, Vec<CommentWithAuthor>> = HashMap::new();
        for reply in replies {
            if let Some(parent_id) = reply.comment.parent_id {
                by_parent.entry(parent_id).or_default().push(reply);
            }
        }

        let mut rows = Vec::with_capacity(parents.len());
        for parent in &parents {
            let children = by_parent.remove(&parent.comment.id).unwrap_or_default();
            rows.push(CommentRow::from_record(parent, !children.is_empty()));
            for child in &children {
                rows.push(CommentRow::from_record(child, false));
            }
        }

        Ok(ThreadPage {
            rows,
            current_page: page,
            total_items,
            total_pages,
        })
    }

    /// Creates a comment on the post, optionally as a reply.
    ///
    /// The insert and the post's comment-counter increment land in one
    /// transaction at the storage layer.
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Uuid> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::ValidationError(
                "comment content must not be blank".to_string(),
            ));
        }

        self.posts
            .find_post(post_id)
            .await?
            .filter(|p| !p.is_deleted())
            .ok_or_else(|| AppError::not_found("post", post_id))?;

        if let Some(parent_id) = parent_id {
            // Soft-deleted parents are still valid anchors; only a row that
            // never existed (or lives on another post) is a miss.
            let parent = self
                .comments
                .find_comment(parent_id)
                .await?
                .filter(|c| c.post_id == post_id)
                .ok_or_else(|| AppError::not_found("parent comment", parent_id))?;

            if parent.parent_id.is_some() {
                return Err(AppError::MaxDepthExceeded);
            }
        }

        let comment = Comment {
            id: Uuid::now_v7(),
            post_id,
            author_id,
            parent_id,
            content: content.to_string(),
            like_count: 0,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        };
        let comment_id = comment.id;

        self.comments.create_comment(comment).await?;
        tracing::debug!(%post_id, %comment_id, reply = parent_id.is_some(), "comment created");

        Ok(comment_id)
    }

    /// Soft-deletes a comment. Allowed for the comment's author and for
    /// admins. Replies survive; the deleted comment keeps its slot in the
    /// thread as a placeholder row.
    pub async fn remove_comment(&self, comment_id: Uuid, actor: Actor) -> Result<()> {
        let comment = self
            .comments
            .find_comment(comment_id)
            .await?
            .filter(|c| !c.is_deleted())
            .ok_or_else(|| AppError::not_found("comment", comment_id))?;

        if comment.author_id != actor.id && !has_role(actor.role, Role::Admin) {
            return Err(AppError::PermissionDenied(
                "only the author or an admin may remove a comment".to_string(),
            ));
        }

        let affected = self
            .comments
            .soft_delete_comment(comment_id, comment.post_id, Utc::now())
            .await?;
        if affected == 0 {
            // We just read the row as live; a zero-row delete means the
            // precondition and the write saw different states.
            return Err(AppError::Internal(anyhow::anyhow!(
                "soft delete of comment {comment_id} affected no rows"
            )));
        }

        tracing::debug!(%comment_id, actor = %actor.id, "comment removed");
        Ok(())
    }
}
