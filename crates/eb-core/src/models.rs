//! # Domain Models
//!
//! These structs represent the core entities of Emberboard.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::Role;

/// Content shown in place of a soft-deleted comment's body.
pub const DELETED_CONTENT: &str = "[deleted]";
/// Nickname shown for a soft-deleted comment's author.
pub const DELETED_AUTHOR: &str = "unknown";

/// A discussion board (e.g., "general", "notices").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: Uuid,
    /// The URL slug (e.g., "general"). Unique across boards.
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// Minimum role required to create or remove posts on this board.
    pub min_write_role: Role,
    pub created_at: DateTime<Utc>,
}

/// A registered account. Only the fields the core needs: the nickname
/// rendered into thread rows and the role checked on mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub nickname: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// The acting user on a mutation path, as established by the (out of scope)
/// auth layer.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

/// A post on a board. Counters are denormalized caches over the comment and
/// like rows; they are only ever mutated through atomic in-place updates at
/// the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub board_id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub comment_count: i64,
    pub like_count: i64,
    /// Recomputed by the periodic ranking sweep; seeded at creation.
    pub hot_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// The fundamental unit of conversation. `parent_id` is `None` for a
/// top-level thread and points at a top-level comment for a reply; nesting
/// never goes deeper than that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// One user's like on a post. The row's existence is the source of truth;
/// `Post::like_count` is a cache kept in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostLike {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One user's like on a comment. Same contract as [`PostLike`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentLike {
    pub user_id: Uuid,
    pub comment_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A comment as fetched for thread display: the row itself plus its
/// author's current nickname.
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author_nickname: String,
}

/// A single displayable row in a flattened thread listing.
///
/// Soft-deleted comments keep their place in the thread (their replies still
/// reference them) but are masked: body and author collapse to fixed
/// placeholders so the author's current nickname does not leak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub author_nickname: String,
    pub like_count: i64,
    /// True iff the comment has at least one reply, shown or not.
    /// Always false for replies themselves, since nesting stops there.
    pub has_replies: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CommentRow {
    pub fn from_record(record: &CommentWithAuthor, has_replies: bool) -> Self {
        let c = &record.comment;
        let (content, author_nickname) = if c.is_deleted() {
            (DELETED_CONTENT.to_string(), DELETED_AUTHOR.to_string())
        } else {
            (c.content.clone(), record.author_nickname.clone())
        };
        Self {
            id: c.id,
            parent_id: c.parent_id,
            content,
            author_nickname,
            like_count: c.like_count,
            has_replies,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// One page of a flattened comment thread.
///
/// `total_items` and `total_pages` count top-level threads only; replies ride
/// along with their parent and never shift a page boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadPage {
    pub rows: Vec<CommentRow>,
    pub current_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

/// A post as returned by the recent/popular feed queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub board_id: Uuid,
    pub board_slug: String,
    pub title: String,
    pub author_id: Uuid,
    pub view_count: i64,
    pub comment_count: i64,
    pub like_count: i64,
    pub hot_score: f64,
    pub created_at: DateTime<Utc>,
}

/// The counter values the ranking sweep reads for one live post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub id: Uuid,
    pub view_count: i64,
    pub comment_count: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}
