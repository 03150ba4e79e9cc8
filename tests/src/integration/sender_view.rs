//! # Sender View
//!
//! What a sender finds in their responses bucket afterwards, across the
//! config encryption, record policy and legacy type settings.

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use response_gateway::GatewayConfig;
    use response_ingest::{
        Bucket, ConfigEncryption, DeploymentMode, IngestConfig, ObjectStore, RecordPolicy,
    };
    use serde_json::json;
    use shared_crypto::{bytes_to_url64, SymmetricKey};
    use shared_types::{CopyId, Owner, ResponseType, SenderConfig};

    use crate::fixtures::{sender, Stack, SELF_ORIGIN};

    fn self_hosted() -> IngestConfig {
        IngestConfig::new(DeploymentMode::self_hosted_s3("my-msgs", "us-west-2"))
    }

    #[tokio::test]
    async fn test_encrypted_config_secret_never_stored() {
        let ingest = self_hosted().with_config_encryption(ConfigEncryption::Encrypted);
        let stack = Stack::empty(ingest, GatewayConfig::default());
        let owner = Owner::self_hosted();
        let secret = SymmetricKey::generate();
        stack
            .store
            .put_object(
                Bucket::Responses,
                &owner.config_key(),
                secret.seal(&serde_json::to_vec(&sender()).unwrap()).unwrap(),
            )
            .await
            .unwrap();

        let response = stack
            .respond(
                SELF_ORIGIN,
                "address",
                &json!({
                    "encrypted": "new address",
                    "config_secret": bytes_to_url64(secret.as_bytes()),
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let records = stack.records(&owner, ResponseType::Address).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["event"], json!({"encrypted": "new address"}));

        let wrong = SymmetricKey::generate();
        let response = stack
            .respond(
                SELF_ORIGIN,
                "address",
                &json!({
                    "encrypted": "x",
                    "config_secret": bytes_to_url64(wrong.as_bytes()),
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stack.records(&owner, ResponseType::Address).await.len(), 1);
        let reports = stack.reporter.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].kind, "crypto");
    }

    #[tokio::test]
    async fn test_failures_recorded_under_declared_type() {
        let ingest = self_hosted().with_record_policy(RecordPolicy::IncludeFailures);
        let config = SenderConfig {
            allow_replies: false,
            ..sender()
        };
        let stack = Stack::new(ingest, GatewayConfig::default(), &Owner::self_hosted(), &config)
            .await;

        let response = stack
            .respond(SELF_ORIGIN, "reply", &json!({"encrypted": "e", "content": "hi"}))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let records = stack.records(&Owner::self_hosted(), ResponseType::Reply).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["error"], "denied");
        assert_eq!(records[0]["event"]["content"], "hi");

        // Nothing is known about an unknown type, so nothing is recorded
        let response = stack
            .respond(SELF_ORIGIN, "bogus", &json!({"encrypted": "e"}))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(std::fs::read_dir(stack.dir.path().join("responses/responses/_user/bogus")).is_err());
    }

    #[tokio::test]
    async fn test_successful_records_carry_no_error() {
        let stack = Stack::new(
            self_hosted().with_record_policy(RecordPolicy::IncludeFailures),
            GatewayConfig::default(),
            &Owner::self_hosted(),
            &sender(),
        )
        .await;

        stack
            .respond(SELF_ORIGIN, "reaction", &json!({"encrypted": "e", "content": null}))
            .await;
        let records = stack
            .records(&Owner::self_hosted(), ResponseType::Reaction)
            .await;
        assert_eq!(records.len(), 1);
        assert!(records[0].get("error").is_none());
        assert!(records[0]["event"]["content"].is_null());
    }

    #[tokio::test]
    async fn test_legacy_delete_needs_flag_and_permission() {
        let owner = Owner::self_hosted();
        let copy = CopyId::new("copy_id", "old-copy").unwrap();
        let delete = json!({"encrypted": "e", "copy_id": "old-copy"});

        // Retired type without the flag
        let stack = Stack::new(
            self_hosted(),
            GatewayConfig::default(),
            &owner,
            &SenderConfig {
                allow_delete: true,
                ..sender()
            },
        )
        .await;
        stack
            .store
            .put_object(Bucket::Messages, &owner.copy_key(&copy), vec![1])
            .await
            .unwrap();
        let response = stack.respond(SELF_ORIGIN, "delete", &delete).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(stack
            .store
            .get_object(Bucket::Messages, &owner.copy_key(&copy))
            .await
            .is_ok());

        // Flag on, but the sender does not allow it
        let stack = Stack::new(
            self_hosted().with_legacy_types(true),
            GatewayConfig::default(),
            &owner,
            &sender(),
        )
        .await;
        stack
            .store
            .put_object(Bucket::Messages, &owner.copy_key(&copy), vec![1])
            .await
            .unwrap();
        let response = stack.respond(SELF_ORIGIN, "delete", &delete).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Flag on and allowed
        let stack = Stack::new(
            self_hosted().with_legacy_types(true),
            GatewayConfig::default(),
            &owner,
            &SenderConfig {
                allow_delete: true,
                ..sender()
            },
        )
        .await;
        stack
            .store
            .put_object(Bucket::Messages, &owner.copy_key(&copy), vec![1])
            .await
            .unwrap();
        let response = stack.respond(SELF_ORIGIN, "delete", &delete).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(stack
            .store
            .get_object(Bucket::Messages, &owner.copy_key(&copy))
            .await
            .unwrap_err()
            .is_not_found());
        assert_eq!(stack.records(&owner, ResponseType::Delete).await.len(), 1);
    }
}
