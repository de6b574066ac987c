//! Shared wiring for the end-to-end scenarios: a fresh in-memory store plus
//! the real engines on top of it.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use eb_core::models::{Actor, Board, User};
use eb_core::roles::Role;
use eb_core::traits::{CommentRepo, LikeRepo, PostRepo};
use eb_db_sqlite::SqliteStore;
use eb_services::{LikeService, PostService, RankingService, ThreadService};
use uuid::Uuid;

pub struct Harness {
    pub store: SqliteStore,
    pub threads: ThreadService,
    pub likes: LikeService,
    pub posts: PostService,
    pub ranking: RankingService,
}

pub async fn harness() -> Harness {
    let store = SqliteStore::in_memory().await.unwrap();
    let posts: Arc<dyn PostRepo> = Arc::new(store.clone());
    let comments: Arc<dyn CommentRepo> = Arc::new(store.clone());
    let likes: Arc<dyn LikeRepo> = Arc::new(store.clone());

    Harness {
        threads: ThreadService::new(posts.clone(), comments.clone()),
        likes: LikeService::new(posts.clone(), comments.clone(), likes),
        posts: PostService::new(posts.clone()),
        ranking: RankingService::new(posts),
        store,
    }
}

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub async fn seed_user(store: &SqliteStore, nickname: &str, role: Role) -> User {
    let user = User {
        id: Uuid::now_v7(),
        nickname: nickname.to_string(),
        role,
        created_at: ts(0),
    };
    sqlx::query("INSERT INTO users (id, nickname, role, created_at) VALUES (?, ?, ?, ?)")
        .bind(user.id.as_bytes().to_vec())
        .bind(&user.nickname)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(store.pool())
        .await
        .unwrap();
    user
}

pub async fn seed_board(store: &SqliteStore, slug: &str, min_write_role: Role) -> Board {
    let board = Board {
        id: Uuid::now_v7(),
        slug: slug.to_string(),
        title: slug.to_string(),
        description: None,
        min_write_role,
        created_at: ts(0),
    };
    sqlx::query(
        "INSERT INTO boards (id, slug, title, description, min_write_role, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(board.id.as_bytes().to_vec())
    .bind(&board.slug)
    .bind(&board.title)
    .bind(&board.description)
    .bind(board.min_write_role.as_str())
    .bind(board.created_at)
    .execute(store.pool())
    .await
    .unwrap();
    board
}

pub fn actor(user: &User) -> Actor {
    Actor {
        id: user.id,
        role: user.role,
    }
}
