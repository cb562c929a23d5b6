//! # roster-api
//!
//! HTTP layer for Roster — axum router, handlers, extractors, and the
//! `AppError` → HTTP response mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
