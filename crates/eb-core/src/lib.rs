//! emberboard/crates/eb-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Emberboard.

pub mod error;
pub mod models;
pub mod roles;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use roles::*;
pub use traits::*;
