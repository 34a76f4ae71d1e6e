//! Axum-based HTTP server bootstrap.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use vita_store_lmdb::LmdbEnvironment;
use vita_verification::VerificationService;

use crate::auth::StaticTokens;
use crate::comparer::HttpFaceComparer;
use crate::config::RpcConfig;
use crate::error::RpcError;
use crate::handlers::{self, AppState};

/// The `/v1` route table over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/register/options", post(handlers::register_options))
        .route("/v1/register/verify", post(handlers::register_verify))
        .route(
            "/v1/authenticate/options",
            post(handlers::authenticate_options),
        )
        .route(
            "/v1/authenticate/verify",
            post(handlers::authenticate_verify),
        )
        .route("/v1/face/verify", post(handlers::face_verify))
        .route("/v1/review/decide", post(handlers::review_decide))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct RpcServer {
    config: RpcConfig,
}

impl RpcServer {
    pub fn new(config: RpcConfig) -> Self {
        Self { config }
    }

    /// Open storage, wire up the service and serve until shutdown.
    pub async fn start(&self) -> Result<(), RpcError> {
        std::fs::create_dir_all(&self.config.data_dir)
            .map_err(|e| RpcError::Config(e.to_string()))?;
        let env = LmdbEnvironment::open(&self.config.data_dir, self.config.map_size())
            .map_err(|e| RpcError::Config(e.to_string()))?;

        let comparer = HttpFaceComparer::new(
            self.config.comparison_url.clone(),
            Duration::from_secs(self.config.comparison_timeout_secs),
        )?;

        let service = VerificationService::new(
            Arc::new(env.challenges()),
            Arc::new(env.credentials()),
            Arc::new(env.attempts()),
            Arc::new(env.reviews()),
            Arc::new(env.subjects()),
            Arc::new(env.references()),
            Arc::new(comparer),
            self.config.verification.clone(),
        );
        let state = AppState {
            service: Arc::new(service),
            identity: Arc::new(StaticTokens::new(
                self.config.subject_tokens.clone(),
                self.config.officer_tokens.clone(),
            )),
        };

        let addr = format!("{}:{}", self.config.listen_addr, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!(%addr, "vita server listening");
        axum::serve(listener, router(state))
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
