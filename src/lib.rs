//! # fleetdesk
//!
//! Car-rental search and booking API built on Axum and Sea-ORM.
//!
//! The heart of the crate is the search pipeline in [`filtering`]: structured
//! criteria, an allow-listed sort with an id tie-break, and validated
//! pagination that always reports the total number of matches. Around it sit
//! the booking lifecycle ([`core::booking`]), back-office management of the
//! fleet and its reference data, and customer accounts.
//!
//! ```rust,ignore
//! let settings = Settings::from_env()?;
//! let db = Database::connect(&settings.database_url).await?;
//! Migrator::up(&db, None).await?;
//! axum::serve(listener, fleetdesk::app(AppState::new(db, settings))).await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod errors;
pub mod filtering;
pub mod migration;
pub mod models;
pub mod resources;
pub mod routes;
pub mod state;
pub mod validation;

use axum::{Router, http::StatusCode};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

pub use config::Settings;
pub use errors::ApiError;
pub use migration::Migrator;
pub use state::AppState;

/// The full application: routes, docs and the middleware stack.
pub fn app(state: AppState) -> Router {
    let timeout = state.settings.request_timeout;
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(TraceLayer::new_for_http())
}
