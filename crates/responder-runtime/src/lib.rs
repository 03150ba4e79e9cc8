//! # Stello Responder Runtime
//!
//! Wiring for the responder binary.
//!
//! ## Startup Sequence
//!
//! 1. Load [`RuntimeConfig`] from the environment and validate it
//! 2. Initialize telemetry (logging subscriber, metrics registry)
//! 3. Build the filesystem object store and the notification transport
//! 4. Assemble the ingest pipeline behind the gateway
//! 5. Serve until Ctrl+C

pub mod adapters;
pub mod config;

use std::sync::Arc;

use response_gateway::{GatewayError, ResponderGateway};
use response_ingest::{NotifyError, ResponderService};
use responder_telemetry::TracingReporter;

use crate::adapters::{FsObjectStore, HttpNotifier};
pub use crate::config::{NotifierConfig, RuntimeConfig, RuntimeConfigError};

/// Errors assembling the runtime.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("notification transport: {0}")]
    Transport(#[from] NotifyError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Assemble the gateway over production adapters.
pub fn build_gateway(config: &RuntimeConfig) -> Result<ResponderGateway, RuntimeError> {
    let store = Arc::new(FsObjectStore::new(&config.storage_dir));
    let transport = Arc::new(HttpNotifier::for_deployment(
        config.ingest.deployment.is_hosted(),
        &config.notifier,
    )?);

    let service = ResponderService::new(
        Arc::new(config.ingest.clone()),
        store,
        transport,
        Arc::new(TracingReporter),
    );

    Ok(ResponderGateway::new(
        config.gateway.clone(),
        &config.ingest,
        Arc::new(service),
    )?)
}
