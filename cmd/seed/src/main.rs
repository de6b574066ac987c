//! Seeds the configured database with a small demo dataset, driving the
//! real engines end to end: boards and users land via plain inserts (their
//! administration is outside this core), posts, comments, and likes go
//! through the services, and one ranking sweep replaces the creation seeds
//! with real scores.

use std::sync::Arc;

use chrono::Utc;
use eb_configs::Settings;
use eb_core::models::Actor;
use eb_core::roles::Role;
use eb_core::traits::{CommentRepo, LikeRepo, PostRepo};
use eb_db_sqlite::SqliteStore;
use eb_services::{LikeService, PostService, RankingService, ThreadService};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

async fn insert_user(store: &SqliteStore, nickname: &str, role: Role) -> anyhow::Result<Uuid> {
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO users (id, nickname, role, created_at) VALUES (?, ?, ?, ?)")
        .bind(id.as_bytes().to_vec())
        .bind(nickname)
        .bind(role.as_str())
        .bind(Utc::now())
        .execute(store.pool())
        .await?;
    Ok(id)
}

async fn insert_board(
    store: &SqliteStore,
    slug: &str,
    title: &str,
    min_write_role: Role,
) -> anyhow::Result<Uuid> {
    let id = Uuid::now_v7();
    sqlx::query(
        "INSERT INTO boards (id, slug, title, description, min_write_role, created_at) VALUES (?, ?, ?, NULL, ?, ?)",
    )
    .bind(id.as_bytes().to_vec())
    .bind(slug)
    .bind(title)
    .bind(min_write_role.as_str())
    .bind(Utc::now())
    .execute(store.pool())
    .await?;
    Ok(id)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load()?;
    let store = SqliteStore::new(&settings.database.url, settings.database.max_connections).await?;

    let posts_repo: Arc<dyn PostRepo> = Arc::new(store.clone());
    let comments_repo: Arc<dyn CommentRepo> = Arc::new(store.clone());
    let likes_repo: Arc<dyn LikeRepo> = Arc::new(store.clone());

    let posts = PostService::new(posts_repo.clone());
    let threads = ThreadService::new(posts_repo.clone(), comments_repo.clone())
        .with_page_size(settings.thread.page_size);
    let likes = LikeService::new(posts_repo.clone(), comments_repo, likes_repo);
    let ranking = RankingService::new(posts_repo);

    let alice = insert_user(&store, "alice", Role::User).await?;
    let bob = insert_user(&store, "bob", Role::User).await?;
    let root = insert_user(&store, "root", Role::Admin).await?;

    let general = insert_board(&store, "general", "General", Role::User).await?;
    let notices = insert_board(&store, "notices", "Notices", Role::Admin).await?;

    let admin = Actor {
        id: root,
        role: Role::Admin,
    };
    posts
        .create_post(notices, admin, "Welcome", "Board rules live here.")
        .await?;

    let alice_actor = Actor {
        id: alice,
        role: Role::User,
    };
    let hello = posts
        .create_post(general, alice_actor, "Hello, world", "First post!")
        .await?;

    let top = threads
        .create_comment(hello, bob, "Welcome aboard.", None)
        .await?;
    threads
        .create_comment(hello, alice, "Thanks!", Some(top))
        .await?;

    likes.toggle_post_like(hello, bob).await?;
    likes.toggle_comment_like(top, alice).await?;
    posts.record_view(hello).await?;

    ranking.recompute_hot_scores().await?;

    let popular = ranking.list_popular(&settings.ranking.feed_excluded_slugs).await?;
    tracing::info!(posts = popular.len(), "seeded; popular feed ready");

    Ok(())
}
