use std::sync::Arc;

use tokio::net::TcpListener;

use jsondb_store::DocumentStore;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// HTTP front end over a [`DocumentStore`].
pub struct JsonDbServer {
    config: ServerConfig,
    store: Arc<dyn DocumentStore>,
}

impl JsonDbServer {
    pub fn new(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(Arc::clone(&self.store), &self.config))
    }

    /// Bind the configured address and serve until the process exits.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> ServerResult<()> {
        let app = self.router();
        tracing::info!(
            addr = %listener.local_addr()?,
            root = %self.config.data_root.display(),
            collection = %self.config.collection,
            "jsondb server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
