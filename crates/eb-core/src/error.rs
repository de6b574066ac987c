//! # AppError
//!
//! Centralized error handling for the Emberboard core.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all eb-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Board, Post, Comment, parent comment)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., blank content, title too long)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Actor is neither the resource owner nor of sufficient role
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Comment nesting is capped at two levels; replying to a reply fails
    #[error("comment nesting depth limit reached")]
    MaxDepthExceeded,

    /// Infrastructure failure, or a write that observed state inconsistent
    /// with its own precondition check (e.g., a soft-delete affecting zero rows)
    #[error("internal service error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(kind: &str, id: impl ToString) -> Self {
        Self::NotFound(kind.to_string(), id.to_string())
    }
}

/// A specialized Result type for Emberboard logic.
pub type Result<T> = std::result::Result<T, AppError>;
