//! # HTTP Flows
//!
//! Requests enter through the gateway router and land in a real filesystem
//! store, exercising origin resolution, metadata extraction, the ingest
//! pipeline and the runtime's store adapter together.

#[cfg(test)]
mod tests {
    use axum::http::{header, StatusCode};
    use response_gateway::GatewayConfig;
    use response_ingest::{
        Bucket, DeploymentMode, Environment, IngestConfig, ObjectStore, Recipient,
        IMAGE_CONTENT_TYPE,
    };
    use serde_json::json;
    use shared_crypto::{bytes_to_url64, SymmetricKey};
    use shared_types::{CopyId, NotifyMode, Owner, ResponseType, SenderConfig, TagSet};

    use crate::fixtures::{body_bytes, get, post, sender, Stack, SELF_ORIGIN};

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9];

    fn self_hosted() -> IngestConfig {
        IngestConfig::new(DeploymentMode::self_hosted_s3("my-msgs", "us-west-2"))
    }

    // =========================================================================
    // REQUEST METADATA
    // =========================================================================

    #[tokio::test]
    async fn test_forwarded_client_ip_recorded_when_trusted() {
        let gateway = GatewayConfig {
            trust_forwarded_for: true,
            ..Default::default()
        };
        let stack = Stack::new(self_hosted(), gateway, &Owner::self_hosted(), &sender()).await;

        let mut request = post(
            SELF_ORIGIN,
            "reply",
            &json!({"encrypted": "opaque", "content": "Thanks!"}),
        );
        request.headers_mut().insert(
            "x-forwarded-for",
            "192.0.2.1, 203.0.113.7".parse().unwrap(),
        );
        let response = stack.request(request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let records = stack
            .records(&Owner::self_hosted(), ResponseType::Reply)
            .await;
        assert_eq!(
            records,
            vec![json!({
                "event": {"encrypted": "opaque", "content": "Thanks!"},
                "ip": "203.0.113.7"
            })]
        );
    }

    #[tokio::test]
    async fn test_forwarded_header_ignored_by_default() {
        let stack = Stack::new(
            self_hosted(),
            GatewayConfig::default(),
            &Owner::self_hosted(),
            &sender(),
        )
        .await;

        let mut request = post(SELF_ORIGIN, "subscription", &json!({
            "encrypted": "opaque",
            "subscribed": false
        }));
        request
            .headers_mut()
            .insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
        assert_eq!(stack.request(request).await.status(), StatusCode::OK);

        // oneshot has no peer address, so no ip at all
        let records = stack
            .records(&Owner::self_hosted(), ResponseType::Subscription)
            .await;
        assert_eq!(records.len(), 1);
        assert!(records[0]["ip"].is_null());
    }

    // =========================================================================
    // READ COUNTER AND INVITE IMAGES
    // =========================================================================

    #[tokio::test]
    async fn test_limited_copy_expires_with_its_image() {
        let stack = Stack::new(
            self_hosted(),
            GatewayConfig::default(),
            &Owner::self_hosted(),
            &sender(),
        )
        .await;
        let owner = Owner::self_hosted();
        let copy = CopyId::new("copy_id", "copy-7").unwrap();
        let key = SymmetricKey::generate();

        stack
            .store
            .put_object(Bucket::Messages, &owner.copy_key(&copy), b"copy".to_vec())
            .await
            .unwrap();
        let mut tags = TagSet::new();
        tags.insert("stello-reads".into(), "0".into());
        tags.insert("stello-max-reads".into(), "2".into());
        stack
            .store
            .put_tags(Bucket::Messages, &owner.copy_key(&copy), tags)
            .await
            .unwrap();
        stack
            .store
            .put_object(
                Bucket::Messages,
                &owner.invite_image_key(&copy),
                key.seal(JPEG).unwrap(),
            )
            .await
            .unwrap();

        let image_uri = format!(
            "/inviter/image?image=copy-7&k={}",
            bytes_to_url64(key.as_bytes())
        );
        let response = stack.request(get(SELF_ORIGIN, &image_uri)).await;
        assert_eq!(response.headers()[header::CONTENT_TYPE], IMAGE_CONTENT_TYPE);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        assert_eq!(body_bytes(response).await, JPEG);

        let read = json!({"encrypted": "e", "copy_id": "copy-7", "has_max_reads": true});

        let response = stack.respond(SELF_ORIGIN, "read", &read).await;
        assert_eq!(response.status(), StatusCode::OK);
        let tags = stack
            .store
            .get_tags(Bucket::Messages, &owner.copy_key(&copy))
            .await
            .unwrap();
        assert_eq!(tags["stello-reads"], "1");

        let response = stack.respond(SELF_ORIGIN, "read", &read).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(stack
            .store
            .get_object(Bucket::Messages, &owner.copy_key(&copy))
            .await
            .unwrap_err()
            .is_not_found());

        // Image is gone too, so the placeholder is served
        let response = stack.request(get(SELF_ORIGIN, &image_uri)).await;
        assert_ne!(body_bytes(response).await, JPEG);

        // Reads after expiry still succeed and are still recorded
        let response = stack.respond(SELF_ORIGIN, "read", &read).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            stack.records(&owner, ResponseType::Read).await.len(),
            3
        );
    }

    #[tokio::test]
    async fn test_image_with_wrong_key_is_placeholder() {
        let stack = Stack::empty(self_hosted(), GatewayConfig::default());
        let owner = Owner::self_hosted();
        let copy = CopyId::new("image", "copy-8").unwrap();
        stack
            .store
            .put_object(
                Bucket::Messages,
                &owner.invite_image_key(&copy),
                SymmetricKey::generate().seal(JPEG).unwrap(),
            )
            .await
            .unwrap();

        let uri = format!(
            "/inviter/copy?copy=copy-8&k={}",
            bytes_to_url64(SymmetricKey::generate().as_bytes())
        );
        // Wrong path entirely: generic failure
        let response = stack.request(get(SELF_ORIGIN, &uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let uri = uri.replace("/inviter/copy", "/inviter/image");
        let response = stack.request(get(SELF_ORIGIN, &uri)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_bytes(response).await;
        assert_ne!(body, JPEG);
        assert_eq!(&body[..2], &[0xFF, 0xD8]);
    }

    // =========================================================================
    // DEPLOYMENT MODES
    // =========================================================================

    #[tokio::test]
    async fn test_hosted_reply_emails_owner() {
        let alice = Owner::new("alice").unwrap();
        let ingest = IngestConfig::new(DeploymentMode::Hosted {
            domains: vec!["stello.news".into()],
        });
        let stack = Stack::new(ingest, GatewayConfig::default(), &alice, &sender()).await;

        let response = stack
            .respond(
                "https://alice.stello.news",
                "reply",
                &json!({"encrypted": "e", "content": "See you Sunday"}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://alice.stello.news"
        );

        let delivered = stack.transport.delivered();
        assert_eq!(delivered.len(), 1);
        let (notification, recipient) = &delivered[0];
        assert_eq!(recipient, &Recipient::Email("sender@example.com".into()));
        assert_eq!(notification.subject, "Stello: New reply (alice)");
        assert!(notification.message.starts_with("See you Sunday"));
        assert_eq!(stack.records(&alice, ResponseType::Reply).await.len(), 1);

        // Another sender's subdomain cannot see alice's config
        let response = stack
            .respond(
                "https://bob.stello.news",
                "reply",
                &json!({"encrypted": "e", "content": "hi"}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stack.transport.delivered().len(), 1);
    }

    #[tokio::test]
    async fn test_summary_counts_from_filesystem() {
        let config = SenderConfig {
            notify_include_contents: false,
            ..sender()
        };
        let stack = Stack::new(
            self_hosted(),
            GatewayConfig::default(),
            &Owner::self_hosted(),
            &config,
        )
        .await;

        stack
            .respond(SELF_ORIGIN, "reply", &json!({"encrypted": "e", "content": "a"}))
            .await;
        stack
            .respond(SELF_ORIGIN, "reaction", &json!({"encrypted": "e", "content": "like"}))
            .await;

        let subjects: Vec<String> = stack
            .transport
            .delivered()
            .into_iter()
            .map(|(n, _)| n.subject)
            .collect();
        assert_eq!(
            subjects,
            vec![
                "Stello: 1 new reply (my-msgs)".to_string(),
                "Stello: 1 new reply and 1 new reaction (my-msgs)".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_first_new_reply_only_once() {
        let config = SenderConfig {
            notify_mode: NotifyMode::FirstNewReply,
            ..sender()
        };
        let stack = Stack::new(
            self_hosted(),
            GatewayConfig::default(),
            &Owner::self_hosted(),
            &config,
        )
        .await;

        for content in ["one", "two", "three"] {
            let response = stack
                .respond(SELF_ORIGIN, "reply", &json!({"encrypted": "e", "content": content}))
                .await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(stack.transport.delivered().len(), 1);
        assert_eq!(
            stack
                .records(&Owner::self_hosted(), ResponseType::Reply)
                .await
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn test_denial_is_silent_and_unreported() {
        let config = SenderConfig {
            allow_reactions: false,
            ..sender()
        };
        let stack = Stack::new(
            self_hosted(),
            GatewayConfig::default(),
            &Owner::self_hosted(),
            &config,
        )
        .await;

        let response = stack
            .respond(SELF_ORIGIN, "reaction", &json!({"encrypted": "e", "content": "like"}))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_bytes(response).await.is_empty());
        assert!(stack
            .records(&Owner::self_hosted(), ResponseType::Reaction)
            .await
            .is_empty());
        assert!(stack.reporter.reports().is_empty());
        assert!(stack.transport.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_missing_sender_config_is_reported() {
        let stack = Stack::empty(self_hosted(), GatewayConfig::default());
        let mut request = post(SELF_ORIGIN, "reply", &json!({"encrypted": "e", "content": "x"}));
        request
            .headers_mut()
            .insert(header::USER_AGENT, "Mozilla/5.0 (X11)".parse().unwrap());

        let response = stack.request(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let reports = stack.reporter.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].kind, "config");
        assert_eq!(reports[0].user_agent.as_deref(), Some("Mozilla/5.0 (X11)"));
        // Payload never reaches the report
        assert!(!reports[0].message.contains("\"x\""));
    }

    #[tokio::test]
    async fn test_development_accepts_any_origin_without_delivery() {
        let ingest = self_hosted().with_environment(Environment::Development);
        let stack = Stack::new(
            ingest,
            GatewayConfig::default(),
            &Owner::self_hosted(),
            &sender(),
        )
        .await;

        let response = stack
            .respond(
                "http://localhost:8000",
                "resend",
                &json!({"encrypted": "e", "content": "please resend"}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(stack.transport.delivered().is_empty());
        assert_eq!(
            stack
                .records(&Owner::self_hosted(), ResponseType::Resend)
                .await
                .len(),
            1
        );
    }
}
