//! API server for Mentor

use anyhow::Result;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use mentor_kg::{MemoryGraphStore, Mentor, MentorConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::graph_file::GraphFile;

use super::middleware::request_id_middleware;
use super::routes::{
    cache_stats, context_pack, create_concept, create_edge, delete_concept, delete_edge,
    get_concept, health_check, list_concepts, update_concept, AppState,
};

/// Configuration for the API server
pub struct ApiServerConfig {
    pub host: String,
    pub port: u16,
    /// Snapshot file loaded at start and rewritten after writes; `None` keeps the graph in memory
    pub graph_path: Option<PathBuf>,
    pub mentor: MentorConfig,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            graph_path: Some(GraphFile::default_path()),
            mentor: MentorConfig::default(),
        }
    }
}

/// Build the router over shared state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/concepts", get(list_concepts).post(create_concept))
        .route(
            "/concepts/:id",
            get(get_concept).patch(update_concept).delete(delete_concept),
        )
        .route("/concepts/:id/context-pack", get(context_pack))
        .route("/edges", post(create_edge).delete(delete_edge))
        .route("/cache/stats", get(cache_stats))
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        // Add CORS layer
        .layer(CorsLayer::permissive())
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
}

impl ApiServer {
    /// Create a new API server with configuration
    pub fn new(config: ApiServerConfig) -> Self {
        Self { config }
    }

    /// Create a new API server with default configuration
    pub fn with_defaults() -> Self {
        Self {
            config: ApiServerConfig::default(),
        }
    }

    /// Bind the configured address and serve until shutdown
    pub async fn start(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let graph_file = self.config.graph_path.map(GraphFile::new);
        let mentor = match &graph_file {
            Some(file) => file.open(self.config.mentor)?,
            None => Mentor::new(MemoryGraphStore::new(), self.config.mentor)?,
        };

        let app = router(Arc::new(AppState::new(mentor, graph_file)));

        info!("Starting API server on {}", listener.local_addr()?);
        axum::serve(listener, app).await?;

        Ok(())
    }
}
