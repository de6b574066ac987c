//! emberboard/crates/eb-services/src/lib.rs
//!
//! The engines behind the forum's front pages: thread listing, like
//! toggling, post writes, and hot-score ranking. Everything here talks to
//! storage through the eb-core port traits only.

pub mod likes;
pub mod posts;
pub mod ranking;
pub mod thread;

pub use likes::LikeService;
pub use posts::PostService;
pub use ranking::{spawn_sweeper, RankingService};
pub use thread::ThreadService;
