//! HTTP handlers

pub mod historical;
pub mod monitoring;
pub mod predict;
pub mod status;

use crate::AppError;

/// Router fallback for unknown paths
pub async fn not_found() -> AppError {
    AppError::NotFound
}
