//! # HTTP Notification Transports
//!
//! Notifications leave the responder as JSON posted to a relay endpoint:
//! a topic publisher for self-hosted deployments, an email sender for
//! hosted ones.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use response_ingest::{
    render_email, Notification, NotificationTransport, NotifyError, Recipient,
};
use serde::Serialize;
use tracing::debug;

use crate::config::NotifierConfig;

/// Sender address of hosted notification emails.
pub const EMAIL_FROM: &str = "Stello <response@stello.news>";

/// Shared HTTP plumbing of both transports.
#[derive(Debug, Clone)]
struct Relay {
    client: Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl Relay {
    fn new(endpoint: String, config: &NotifierConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifyError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            auth_token: config.auth_token.clone(),
        })
    }

    fn request(&self) -> RequestBuilder {
        let request = self.client.post(&self.endpoint);
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn post<T: Serialize + Sync>(&self, payload: &T) -> Result<(), NotifyError> {
        let response = self
            .request()
            .json(payload)
            .send()
            .await
            .map_err(|e| NotifyError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.is_server_error() {
            Err(NotifyError::Unavailable(format!("relay returned {}", status)))
        } else {
            Err(NotifyError::Rejected(format!("relay returned {}", status)))
        }
    }
}

#[derive(Serialize)]
struct TopicMessage<'a> {
    subject: &'a str,
    message: &'a str,
}

/// Publishes to the deployment's notification topic.
#[derive(Debug, Clone)]
pub struct TopicTransport {
    relay: Relay,
}

impl TopicTransport {
    pub fn new(endpoint: impl Into<String>, config: &NotifierConfig) -> Result<Self, NotifyError> {
        Ok(Self {
            relay: Relay::new(endpoint.into(), config)?,
        })
    }
}

#[async_trait]
impl NotificationTransport for TopicTransport {
    async fn deliver(
        &self,
        notification: &Notification,
        recipient: &Recipient,
    ) -> Result<(), NotifyError> {
        if *recipient != Recipient::Topic {
            return Err(NotifyError::Rejected(
                "topic transport cannot address individual senders".into(),
            ));
        }

        self.relay
            .post(&TopicMessage {
                subject: &notification.subject,
                message: &notification.message,
            })
            .await?;
        debug!("Published notification to topic");
        Ok(())
    }
}

#[derive(Serialize)]
struct EmailMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: String,
}

/// Emails the sender through a relay.
#[derive(Debug, Clone)]
pub struct EmailTransport {
    relay: Relay,
}

impl EmailTransport {
    pub fn new(endpoint: impl Into<String>, config: &NotifierConfig) -> Result<Self, NotifyError> {
        Ok(Self {
            relay: Relay::new(endpoint.into(), config)?,
        })
    }
}

#[async_trait]
impl NotificationTransport for EmailTransport {
    async fn deliver(
        &self,
        notification: &Notification,
        recipient: &Recipient,
    ) -> Result<(), NotifyError> {
        let Recipient::Email(to) = recipient else {
            return Err(NotifyError::MissingRecipient);
        };

        self.relay
            .post(&EmailMessage {
                from: EMAIL_FROM,
                to,
                subject: &notification.subject,
                text: &notification.message,
                html: render_email(&notification.subject, &notification.message),
            })
            .await?;
        debug!("Sent notification email");
        Ok(())
    }
}

/// The transport a deployment runs with.
#[derive(Debug, Clone)]
pub enum HttpNotifier {
    Topic(TopicTransport),
    Email(EmailTransport),
    /// No relay configured (development only)
    Disabled,
}

impl HttpNotifier {
    /// Topic relay for self-hosted deployments, email relay for hosted ones.
    pub fn for_deployment(hosted: bool, config: &NotifierConfig) -> Result<Self, NotifyError> {
        match (&config.endpoint, hosted) {
            (None, _) => Ok(Self::Disabled),
            (Some(endpoint), true) => Ok(Self::Email(EmailTransport::new(endpoint, config)?)),
            (Some(endpoint), false) => Ok(Self::Topic(TopicTransport::new(endpoint, config)?)),
        }
    }
}

#[async_trait]
impl NotificationTransport for HttpNotifier {
    async fn deliver(
        &self,
        notification: &Notification,
        recipient: &Recipient,
    ) -> Result<(), NotifyError> {
        match self {
            Self::Topic(transport) => transport.deliver(notification, recipient).await,
            Self::Email(transport) => transport.deliver(notification, recipient).await,
            Self::Disabled => Err(NotifyError::Unavailable("no relay configured".into())),
        }
    }
}
