// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::face::{
    embeddings_handler, health_handler, upload_face_handler, MAX_UPLOAD_BODY_BYTES,
};
use crate::faces::FaceEmbeddingService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FaceEmbeddingService>,
    /// Upper bound for one request's blocking work
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(service: Arc<FaceEmbeddingService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Face endpoints
        .route("/api/face/embeddings", get(embeddings_handler))
        .route(
            "/api/face/upload",
            post(upload_face_handler).layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves
pub async fn start_server(
    addr: SocketAddr,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("🚀 Face API listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
