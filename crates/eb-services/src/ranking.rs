//! Ranking Engine: decaying hot-score computation, the periodic sweep that
//! persists it, and the recent/popular feed queries.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use eb_core::error::{AppError, Result};
use eb_core::models::PostSummary;
use eb_core::traits::PostRepo;

/// Fixed result size of the popular feed.
pub const POPULAR_LIMIT: i64 = 10;
/// Upper bound on a single recent-feed fetch.
pub const MAX_FEED_LIMIT: i64 = 100;

/// Engagement-weighted score with a decaying freshness boost.
///
/// The `+ 2.0` offset caps the boost near age zero instead of letting it
/// diverge; the 1.5 exponent sets how fast the recency advantage fades.
pub fn hot_score(
    view_count: i64,
    comment_count: i64,
    like_count: i64,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> f64 {
    let age_hours = (now - created_at).num_seconds() as f64 / 3600.0;
    view_count as f64 * 1.5
        + comment_count as f64 * 2.0
        + like_count as f64 * 3.0
        + (1.0 / (age_hours + 2.0).powf(1.5)) * 100.0
}

/// Score assigned at post creation, before the first sweep touches it: the
/// creation instant in epoch seconds. Not an engagement value at all, but a
/// monotonic tie-breaker that outranks every swept score until the next
/// sweep replaces it.
pub fn initial_score(now: DateTime<Utc>) -> f64 {
    (now.timestamp_millis() / 1000) as f64
}

pub struct RankingService {
    posts: Arc<dyn PostRepo>,
}

impl RankingService {
    pub fn new(posts: Arc<dyn PostRepo>) -> Self {
        Self { posts }
    }

    /// Recomputes and persists the hot score of every live post.
    ///
    /// One post's persistence failure never blocks the rest of the pass: the
    /// failure is logged with the post id, the sweep moves on, and the whole
    /// call fails at the end if anything failed. A score update that hits no
    /// row means the post was deleted mid-pass and is skipped quietly.
    pub async fn recompute_hot_scores(&self) -> Result<()> {
        let snapshots = self.posts.list_scorable().await?;
        let total = snapshots.len();
        let now = Utc::now();

        let mut failed = 0usize;
        for snap in snapshots {
            let score = hot_score(
                snap.view_count,
                snap.comment_count,
                snap.like_count,
                snap.created_at,
                now,
            );
            match self.posts.update_hot_score(snap.id, score).await {
                Ok(0) => {
                    tracing::debug!(post_id = %snap.id, "post vanished mid-sweep, skipping");
                }
                Ok(_) => {}
                Err(err) => {
                    failed += 1;
                    tracing::warn!(post_id = %snap.id, error = %err, "failed to persist hot score");
                }
            }
        }

        if failed > 0 {
            return Err(AppError::Internal(anyhow::anyhow!(
                "hot score sweep failed for {failed} of {total} posts"
            )));
        }

        tracing::info!(posts = total, "hot score sweep complete");
        Ok(())
    }

    /// Live posts, newest first. `board_ids` / `excluded_slugs` left empty
    /// disable the corresponding filter.
    pub async fn list_recent(
        &self,
        board_ids: &[Uuid],
        limit: i64,
        excluded_slugs: &[String],
    ) -> Result<Vec<PostSummary>> {
        let limit = limit.clamp(1, MAX_FEED_LIMIT);
        let posts = self.posts.find_recent(board_ids, limit, excluded_slugs).await?;
        Ok(posts)
    }

    /// Top posts by hot score, fixed at [`POPULAR_LIMIT`].
    pub async fn list_popular(&self, excluded_slugs: &[String]) -> Result<Vec<PostSummary>> {
        let posts = self.posts.find_popular(POPULAR_LIMIT, excluded_slugs).await?;
        Ok(posts)
    }
}

/// Runs the sweep on a fixed interval on its own task, detached from any
/// request lifecycle. The first sweep fires immediately; sweeps that overrun
/// the interval delay the next tick instead of bunching up.
pub fn spawn_sweeper(service: Arc<RankingService>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(err) = service.recompute_hot_scores().await {
                tracing::error!(error = %err, "hot score sweep failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use eb_core::models::ScoreSnapshot;
    use eb_core::traits::MockPostRepo;

    #[test]
    fn formula_matches_reference_value() {
        // views=10, comments=0, likes=0, age=0h:
        // 10*1.5 + (1/2^1.5)*100 = 15 + 35.35533...
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let score = hot_score(10, 0, 0, now, now);
        assert!((score - 50.35533905932738).abs() < 1e-5);
    }

    #[test]
    fn freshness_boost_decays() {
        let created = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let fresh = hot_score(0, 0, 0, created, created);
        let later = hot_score(0, 0, 0, created, created + chrono::Duration::hours(24));
        assert!(fresh > later);
        assert!(later > 0.0);
    }

    #[test]
    fn engagement_terms_are_linear() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let base = hot_score(0, 0, 0, now, now);
        assert!((hot_score(1, 0, 0, now, now) - base - 1.5).abs() < 1e-9);
        assert!((hot_score(0, 1, 0, now, now) - base - 2.0).abs() < 1e-9);
        assert!((hot_score(0, 0, 1, now, now) - base - 3.0).abs() < 1e-9);
    }

    #[test]
    fn initial_score_is_epoch_seconds() {
        let now = Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap();
        assert_eq!(initial_score(now), 1_700_000_000.0);
    }

    fn snapshot(id: Uuid) -> ScoreSnapshot {
        ScoreSnapshot {
            id,
            view_count: 1,
            comment_count: 1,
            like_count: 1,
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn sweep_attempts_every_post_then_fails_aggregate() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::now_v7()).collect();
        let bad = ids[1];

        let mut posts = MockPostRepo::new();
        let snaps: Vec<ScoreSnapshot> = ids.iter().map(|id| snapshot(*id)).collect();
        posts
            .expect_list_scorable()
            .returning(move || Ok(snaps.clone()));
        posts
            .expect_update_hot_score()
            .times(3)
            .returning(move |id, _| {
                if id == bad {
                    Err(anyhow::anyhow!("disk on fire"))
                } else {
                    Ok(1)
                }
            });

        let svc = RankingService::new(Arc::new(posts));
        let err = svc.recompute_hot_scores().await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(err.to_string().contains("1 of 3"));
    }

    #[tokio::test]
    async fn sweep_tolerates_posts_deleted_mid_pass() {
        let mut posts = MockPostRepo::new();
        let snaps = vec![snapshot(Uuid::now_v7())];
        posts
            .expect_list_scorable()
            .returning(move || Ok(snaps.clone()));
        posts.expect_update_hot_score().returning(|_, _| Ok(0));

        let svc = RankingService::new(Arc::new(posts));
        svc.recompute_hot_scores().await.unwrap();
    }

    #[tokio::test]
    async fn recent_limit_is_clamped() {
        let mut posts = MockPostRepo::new();
        posts
            .expect_find_recent()
            .withf(|_, limit, _| *limit == 1)
            .returning(|_, _, _| Ok(Vec::new()));

        let svc = RankingService::new(Arc::new(posts));
        svc.list_recent(&[], -5, &[]).await.unwrap();
    }

    #[tokio::test]
    async fn popular_asks_for_exactly_ten() {
        let mut posts = MockPostRepo::new();
        posts
            .expect_find_popular()
            .withf(|limit, _| *limit == POPULAR_LIMIT)
            .returning(|_, _| Ok(Vec::new()));

        let svc = RankingService::new(Arc::new(posts));
        svc.list_popular(&[]).await.unwrap();
    }
}
