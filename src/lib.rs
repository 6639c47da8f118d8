//! Good Gateway
//!
//! HTTP gateway that creates catalog goods through the good middleware and
//! returns them with the metadata of every coin they reference.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │   HTTP handlers, routing, rate limiting      │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │  Create-then-enrich orchestration, health    │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │   Wire types, validation, traits, errors     │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │  Good middleware and coininfo HTTP clients   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! A create request is validated field by field and rejected on the first
//! failing check. A valid request is forwarded once to the good middleware;
//! the created good is then enriched with the primary coin and each
//! supported coin, in the order the good lists them. Any downstream failure
//! fails the whole request.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use good_gateway::api::create_router;
//! use good_gateway::app::AppState;
//! use good_gateway::infra::{HttpCoinInfoClient, HttpGoodBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = Arc::new(HttpGoodBackend::with_defaults("http://good-middleware:50030")?);
//!     let coininfo = Arc::new(HttpCoinInfoClient::with_defaults("http://sphinx-coininfo:50170")?);
//!
//!     let state = Arc::new(AppState::new(backend, coininfo));
//!
//!     let router = create_router(state);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, router).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
