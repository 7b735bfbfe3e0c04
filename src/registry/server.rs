//! Registry server

use crate::common::secret::Argon2Hasher;
use crate::common::{Config, Result};
use crate::registry::http::{create_app, RegistryState};
use crate::registry::store::PatientStore;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct RegistryServer {
    config: Config,
}

impl RegistryServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn serve(self) -> Result<()> {
        self.config.validate()?;

        tracing::info!("Starting patient registry");
        tracing::info!("  HTTP API: {}", self.config.bind_addr);
        tracing::info!("  Prefixes: {}", self.config.route_prefixes.join(", "));
        tracing::info!("  Request timeout: {}s", self.config.request_timeout_secs);

        let store = Arc::new(PatientStore::new());
        let state = RegistryState::new(store, Arc::new(Argon2Hasher::new()));
        let app = create_app(state, &self.config);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("✓ Registry ready on {}", listener.local_addr()?);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Registry stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
