//! Responder Service
//!
//! Implements [`ResponderApi`] over the outbound ports. One call handles one
//! response end to end:
//!
//! ```text
//! body ─→ JSON object ─→ `encrypted` ─→ type ─→ sender config + public key
//!      ─→ validate ─→ authorize + handler ─→ plan notification
//!      ─→ write record (fatal on failure) ─→ deliver notification (best-effort)
//! ```
//!
//! The notification is planned before the record is written, so stored
//! counts never include the current event and "+1" is exact for this
//! request. Nothing is retried and nothing is rolled back: a tag update
//! followed by a failed record write stays applied.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shared_crypto::ResponsePublicKey;
use shared_types::{
    Owner, RawEvent, ResponderError, ResponderResult, ResponseEvent, ResponseId, ResponseType,
    SenderConfig, ValidationError,
};
use tracing::{debug, info, instrument, warn};

use responder_telemetry::{
    time_histogram, ErrorReport, ErrorReporter, NOTIFICATIONS, RECORDS_WRITTEN, REQUEST_DURATION,
    RESPONSES_RECEIVED, RESPONSES_REJECTED,
};

use super::handlers::{advance_read_counter, delete_copy};
use super::image_service::ImageService;
use super::sender_config::SenderConfigLoader;
use crate::domain::{
    decide, dispatch, require_str, DeploymentMode, EventValidator, HandlerAction, IngestConfig,
    InviteImage, Notification, PolicyDecision, RecordPayload, RecordPolicy, ResponseCounts,
    SkipReason,
};
use crate::error::{NotifyError, StoreError};
use crate::ports::{
    Bucket, ImageQuery, NotificationOutcome, NotificationTransport, ObjectStore, Recipient,
    RequestMeta, ResponderApi, ResponseReceipt, ResponseRequest, SystemTimeSource, TimeSource,
};

/// Notification state carried from planning to delivery.
#[derive(Debug)]
enum PlannedNotification {
    Deliver(Notification),
    Suppressed(SkipReason),
    Failed(ResponderError),
}

/// Everything needed to write the record for this request.
struct PendingRecord<'a> {
    owner: &'a Owner,
    response_type: ResponseType,
    key: &'a ResponsePublicKey,
    event: &'a RawEvent,
    ip: Option<&'a str>,
}

/// The response-ingestion pipeline.
pub struct ResponderService<S, N, T = SystemTimeSource>
where
    S: ObjectStore,
    N: NotificationTransport,
    T: TimeSource,
{
    config: Arc<IngestConfig>,
    store: Arc<S>,
    transport: Arc<N>,
    reporter: Arc<dyn ErrorReporter>,
    time: T,
    validator: EventValidator,
    configs: SenderConfigLoader<S>,
    images: ImageService<S>,
}

impl<S: ObjectStore, N: NotificationTransport> ResponderService<S, N, SystemTimeSource> {
    pub fn new(
        config: Arc<IngestConfig>,
        store: Arc<S>,
        transport: Arc<N>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self::with_time_source(config, store, transport, reporter, SystemTimeSource)
    }
}

impl<S, N, T> ResponderService<S, N, T>
where
    S: ObjectStore,
    N: NotificationTransport,
    T: TimeSource,
{
    pub fn with_time_source(
        config: Arc<IngestConfig>,
        store: Arc<S>,
        transport: Arc<N>,
        reporter: Arc<dyn ErrorReporter>,
        time: T,
    ) -> Self {
        Self {
            validator: EventValidator::new(&config),
            configs: SenderConfigLoader::new(store.clone(), config.config_encryption),
            images: ImageService::new(store.clone()),
            config,
            store,
            transport,
            reporter,
            time,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    #[instrument(
        name = "handle_response",
        skip_all,
        fields(owner = %request.owner, response_type = %request.response_type)
    )]
    async fn handle(&self, request: ResponseRequest) -> ResponderResult<ResponseReceipt> {
        let _timer = time_histogram!(REQUEST_DURATION);

        let result = self.process(&request).await;
        match &result {
            Ok(receipt) => info!(
                record_id = %receipt.record_id,
                notification = receipt.notification.as_str(),
                "Response recorded"
            ),
            Err(err) => {
                RESPONSES_REJECTED
                    .with_label_values(&[err.reject_reason()])
                    .inc();
                if err.is_reportable() {
                    warn!(kind = err.kind(), error = %err, "Response rejected");
                    self.report(err, &request.meta).await;
                } else {
                    debug!(error = %err, "Response refused by sender settings");
                }
            }
        }
        result
    }

    async fn process(&self, request: &ResponseRequest) -> ResponderResult<ResponseReceipt> {
        let owner = &request.owner;

        let mut event = parse_body(&request.body)?;
        require_str(&event, "encrypted")?;

        let response_type = self.validator.response_type(&request.response_type)?;
        RESPONSES_RECEIVED
            .with_label_values(&[response_type.as_str()])
            .inc();

        // Nothing can be recorded without the sender's key, so load it before
        // any handler side effect
        let sender = self.configs.load(owner, &mut event).await?;
        let key = ResponsePublicKey::from_url64(&sender.resp_key_public)
            .map_err(|e| ResponderError::Config(format!("unusable resp_key_public: {}", e)))?;

        let pending = PendingRecord {
            owner,
            response_type,
            key: &key,
            event: &event,
            ip: request.meta.source_ip.as_deref(),
        };

        let planned = match self.handle_event(&pending, &sender).await {
            Ok(planned) => planned,
            Err(err) => {
                if self.config.record_policy == RecordPolicy::IncludeFailures {
                    if let Err(record_err) = self.write_record(&pending, Some(err.kind())).await {
                        warn!(error = %record_err, "Failed response could not be recorded");
                    }
                }
                return Err(err);
            }
        };

        let record_id = self.write_record(&pending, None).await?;
        let notification = self.deliver(planned, &sender, &request.meta).await;

        Ok(ResponseReceipt {
            record_id,
            notification,
        })
    }

    /// Validate, authorize, run the handler and plan the notification.
    async fn handle_event(
        &self,
        pending: &PendingRecord<'_>,
        sender: &SenderConfig,
    ) -> ResponderResult<PlannedNotification> {
        let event = self.validator.validate(pending.response_type, pending.event)?;
        let dispatch = dispatch(&event, sender).map_err(ResponderError::Denied)?;

        match &dispatch.action {
            HandlerAction::RecordOnly => {}
            HandlerAction::AdvanceReadCounter(copy_id) => {
                let outcome = advance_read_counter(&*self.store, pending.owner, copy_id).await?;
                debug!(?outcome, "Read handled");
            }
            HandlerAction::DeleteCopy(copy_id) => {
                delete_copy(&*self.store, pending.owner, copy_id).await?;
            }
        }

        if !dispatch.notifies {
            return Ok(PlannedNotification::Suppressed(SkipReason::NotNotifiable));
        }
        Ok(self.plan_notification(pending.owner, sender, &event).await)
    }

    async fn plan_notification(
        &self,
        owner: &Owner,
        sender: &SenderConfig,
        event: &ResponseEvent,
    ) -> PlannedNotification {
        let notification = match decide(sender, event) {
            PolicyDecision::Skip(reason) => return PlannedNotification::Suppressed(reason),
            PolicyDecision::Send(notification) => notification,
            PolicyDecision::Summarize(rule) => {
                let counts = match self.count_responses(owner).await {
                    Ok(counts) => counts,
                    Err(err) => {
                        return PlannedNotification::Failed(ResponderError::Notification(
                            format!("counting stored responses: {}", err),
                        ))
                    }
                };
                match rule.compose(counts) {
                    Ok(notification) => notification,
                    Err(reason) => return PlannedNotification::Suppressed(reason),
                }
            }
        };
        PlannedNotification::Deliver(notification.tagged(&self.config.deployment.subject_tag(owner)))
    }

    /// Stored replies (incl. resend requests) and reactions for `owner`.
    async fn count_responses(&self, owner: &Owner) -> Result<ResponseCounts, StoreError> {
        let reply_prefix = owner.responses_prefix(ResponseType::Reply);
        let resend_prefix = owner.responses_prefix(ResponseType::Resend);
        let reaction_prefix = owner.responses_prefix(ResponseType::Reaction);

        let (replies, resends, reactions) = tokio::try_join!(
            self.store.count_prefix(Bucket::Responses, &reply_prefix),
            self.store.count_prefix(Bucket::Responses, &resend_prefix),
            self.store.count_prefix(Bucket::Responses, &reaction_prefix),
        )?;

        Ok(ResponseCounts {
            replies: replies + resends,
            reactions,
        })
    }

    async fn write_record(
        &self,
        pending: &PendingRecord<'_>,
        error: Option<&str>,
    ) -> ResponderResult<ResponseId> {
        let id = ResponseId::generate(pending.owner, pending.response_type, self.time.now_secs());
        let sealed = RecordPayload {
            event: pending.event,
            ip: pending.ip,
            error,
        }
        .seal(pending.key)?;

        self.store
            .put_object(Bucket::Responses, id.as_str(), sealed)
            .await?;
        RECORDS_WRITTEN
            .with_label_values(&[pending.response_type.as_str()])
            .inc();
        debug!(record_id = %id, failed = error.is_some(), "Response record written");
        Ok(id)
    }

    async fn deliver(
        &self,
        planned: PlannedNotification,
        sender: &SenderConfig,
        meta: &RequestMeta,
    ) -> NotificationOutcome {
        let outcome = match planned {
            PlannedNotification::Suppressed(reason) => {
                debug!(%reason, "No notification");
                NotificationOutcome::Suppressed
            }
            PlannedNotification::Failed(err) => self.notification_failed(err, meta).await,
            PlannedNotification::Deliver(notification) if self.config.is_development() => {
                info!(subject = %notification.subject, "Notification not delivered in development");
                NotificationOutcome::Skipped
            }
            PlannedNotification::Deliver(notification) => {
                let delivered = match self.recipient(sender) {
                    Ok(recipient) => self.transport.deliver(&notification, &recipient).await,
                    Err(err) => Err(err),
                };
                match delivered {
                    Ok(()) => {
                        debug!(subject = %notification.subject, "Notification sent");
                        NotificationOutcome::Sent
                    }
                    Err(err) => self.notification_failed(err.into(), meta).await,
                }
            }
        };
        NOTIFICATIONS.with_label_values(&[outcome.as_str()]).inc();
        outcome
    }

    fn recipient(&self, sender: &SenderConfig) -> Result<Recipient, NotifyError> {
        match &self.config.deployment {
            DeploymentMode::SelfHosted { .. } => Ok(Recipient::Topic),
            DeploymentMode::Hosted { .. } => sender
                .email
                .clone()
                .map(Recipient::Email)
                .ok_or(NotifyError::MissingRecipient),
        }
    }

    async fn notification_failed(
        &self,
        err: ResponderError,
        meta: &RequestMeta,
    ) -> NotificationOutcome {
        warn!(error = %err, "Notification failed; response still accepted");
        self.report(&err, meta).await;
        NotificationOutcome::Failed
    }

    /// Send a failure to error telemetry (not in development).
    async fn report(&self, err: &ResponderError, meta: &RequestMeta) {
        if self.config.is_development() {
            return;
        }
        self.reporter
            .report(ErrorReport {
                kind: err.kind().to_string(),
                message: err.to_string(),
                source_ip: meta.source_ip.clone(),
                user_agent: meta.user_agent.clone(),
            })
            .await;
    }
}

fn parse_body(body: &[u8]) -> Result<RawEvent, ValidationError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ValidationError::MalformedBody),
    }
}

#[async_trait]
impl<S, N, T> ResponderApi for ResponderService<S, N, T>
where
    S: ObjectStore + 'static,
    N: NotificationTransport + 'static,
    T: TimeSource + 'static,
{
    async fn handle_response(&self, request: ResponseRequest) -> ResponderResult<ResponseReceipt> {
        self.handle(request).await
    }

    async fn invite_image(&self, owner: &Owner, query: &ImageQuery) -> InviteImage {
        self.images.invite_image(owner, query).await
    }
}
