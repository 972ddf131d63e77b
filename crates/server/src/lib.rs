pub mod config;
pub mod error;
pub mod orchestrator;
pub mod query;
pub mod routes;
pub mod state;
pub mod webhook;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use wri_blobstore::InMemoryBlobStore;
use wri_store::InMemoryStore;

use crate::config::Config;
use crate::state::AppState;

/// Builds the router against whatever store/blobstore the caller wires in
/// -- `main` uses the in-memory fakes; a deployment built with the
/// `dynamodb`/`s3` features on `wri-store`/`wri-blobstore` would pass the
/// real backends here instead, without touching this function.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/upload", post(routes::upload))
        .route("/api/search", post(routes::search))
        .route("/api/match/:arena_unique_id", get(routes::match_detail))
        .route("/api/generate-video", post(routes::generate_video))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default().include_headers(true)))
        .with_state(state)
}

pub fn default_state(config: Config) -> AppState {
    AppState::new(config, Arc::new(InMemoryStore::new()), Arc::new(InMemoryBlobStore::new()))
}
