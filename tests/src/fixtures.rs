//! Shared fixtures: one RSA key pair per test binary and a full responder
//! stack over a temporary filesystem store.

use std::sync::{Arc, OnceLock};

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use response_gateway::{GatewayConfig, ResponderGateway};
use response_ingest::{
    Bucket, FixedTimeSource, IngestConfig, MemoryTransport, ObjectStore, ResponderService,
};
use responder_runtime::adapters::FsObjectStore;
use responder_telemetry::MemoryReporter;
use rsa::pkcs8::EncodePublicKey;
use rsa::RsaPrivateKey;
use serde_json::Value;
use shared_crypto::HybridEnvelope;
use shared_types::{NotifyMode, Owner, ResponseType, SenderConfig};
use tempfile::TempDir;
use tower::ServiceExt;

pub const NOW: u64 = 1_750_000_000;
pub const SELF_ORIGIN: &str = "https://my-msgs.s3-us-west-2.amazonaws.com";

/// Sender's key pair: private half for opening records, url64 SPKI public half.
pub fn keypair() -> &'static (RsaPrivateKey, String) {
    static KEYS: OnceLock<(RsaPrivateKey, String)> = OnceLock::new();
    KEYS.get_or_init(|| {
        let private = RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).unwrap();
        let der = private.to_public_key().to_public_key_der().unwrap();
        (private, shared_crypto::bytes_to_url64(der.as_bytes()))
    })
}

/// Sender accepting everything and notifying on replies and reactions.
pub fn sender() -> SenderConfig {
    SenderConfig {
        notify_mode: NotifyMode::RepliesAndReactions,
        notify_include_contents: true,
        allow_replies: true,
        allow_reactions: true,
        allow_resend_requests: true,
        allow_delete: false,
        resp_key_public: keypair().1.clone(),
        email: Some("sender@example.com".into()),
    }
}

/// Gateway, pipeline and filesystem store wired together.
pub struct Stack {
    pub dir: TempDir,
    pub store: Arc<FsObjectStore>,
    pub transport: Arc<MemoryTransport>,
    pub reporter: Arc<MemoryReporter>,
    pub router: Router,
}

impl Stack {
    /// Stack whose owner already has a plain JSON `sender` config.
    pub async fn new(
        ingest: IngestConfig,
        gateway: GatewayConfig,
        owner: &Owner,
        sender: &SenderConfig,
    ) -> Self {
        let stack = Self::empty(ingest, gateway);
        stack
            .store
            .put_object(
                Bucket::Responses,
                &owner.config_key(),
                serde_json::to_vec(sender).unwrap(),
            )
            .await
            .unwrap();
        stack
    }

    /// Stack with nothing stored yet.
    pub fn empty(ingest: IngestConfig, gateway: GatewayConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsObjectStore::new(dir.path()));
        let transport = Arc::new(MemoryTransport::new());
        let reporter = Arc::new(MemoryReporter::new());

        let service = ResponderService::with_time_source(
            Arc::new(ingest.clone()),
            store.clone(),
            transport.clone(),
            reporter.clone(),
            FixedTimeSource(NOW),
        );
        let gateway = ResponderGateway::new(gateway, &ingest, Arc::new(service)).unwrap();

        Self {
            router: gateway.router(),
            dir,
            store,
            transport,
            reporter,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// POST a response from `origin`.
    pub async fn respond(&self, origin: &str, response_type: &str, body: &Value) -> Response {
        self.request(post(origin, response_type, body)).await
    }

    /// Open every record of one type stored for `owner`.
    pub async fn records(&self, owner: &Owner, response_type: ResponseType) -> Vec<Value> {
        let prefix = owner.responses_prefix(response_type);
        let dir = self.dir.path().join("responses").join(&prefix);
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };

        let mut records = Vec::new();
        for entry in entries {
            let name = entry.unwrap().file_name().into_string().unwrap();
            let body = self
                .store
                .get_object(Bucket::Responses, &format!("{}{}", prefix, name))
                .await
                .unwrap();
            let envelope: HybridEnvelope = serde_json::from_slice(&body).unwrap();
            records.push(serde_json::from_slice(&envelope.open(&keypair().0).unwrap()).unwrap());
        }
        records
    }
}

pub fn post(origin: &str, response_type: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(format!("/responder/{}", response_type))
        .header(header::ORIGIN, origin)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(origin: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
