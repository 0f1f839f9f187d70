//! HTTP surface for the optimization engine.
//!
//! One endpoint: `POST /api/routes/calculate`. Registration, persistence,
//! and the rest of the route-management CRUD live in the outer service
//! that calls this engine; they have no business here.

mod handlers;
mod state;

use axum::routing::post;
use axum::Router;
use state::AppState;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use crate::geocode::CoordinateResolver;
use crate::optimizer::Optimizer;

pub fn build_router(resolver: CoordinateResolver) -> Router {
    let state = Arc::new(AppState {
        optimizer: Mutex::new(Optimizer::with_resolver(resolver)),
    });

    Router::new()
        .route("/api/routes/calculate", post(handlers::calculate_route))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, resolver: CoordinateResolver) {
    let app = build_router(resolver);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Cannot bind to {}: {}", addr, e);
            std::process::exit(1);
        });

    eprintln!("  Routecraft server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        });
}
