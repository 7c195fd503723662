//! Bookshelf
//!
//! Authors and books catalog served as a JSON REST API under `/api/v1`
//! and as server-rendered admin pages, with a bulk seeding command.

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub views: Arc<admin::Views>,
    pub pool: Pool<Postgres>,
}
