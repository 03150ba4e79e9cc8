//! Gateway service: validated config plus the serving loop.

use axum::Router;
use response_ingest::{IngestConfig, ResponderApi};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::origin::OriginPolicy;
use crate::router::{build_router, AppState};

/// HTTP front of the responder.
pub struct ResponderGateway {
    bind_addr: SocketAddr,
    state: AppState,
}

impl ResponderGateway {
    /// Create a new gateway.
    ///
    /// # Errors
    ///
    /// `Config` when either configuration fails validation.
    pub fn new(
        config: GatewayConfig,
        ingest: &IngestConfig,
        api: Arc<dyn ResponderApi>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;
        ingest
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self {
            bind_addr: config.bind_addr,
            state: AppState::new(api, config, OriginPolicy::new(ingest)),
        })
    }

    /// The router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.bind_addr)
            .await
            .map_err(GatewayError::Bind)?;

        info!(
            addr = %self.bind_addr,
            shape = ?self.state.config.response_shape,
            metrics = self.state.config.expose_metrics,
            "Responder listening"
        );

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(GatewayError::Serve)?;

        info!("Responder stopped");
        Ok(())
    }
}
