//! Transport credentials: sealed at rest, opened on demand, fail closed on tampering

mod common;

use async_trait::async_trait;
use common::{setup, setup_with_group, transport_request};
use mailroom::{ErrorCode, SendEmailError, SendEmailRequest};
use mailroom_core::domain::TransportCredentials;
use mailroom_core::error::BoxError;
use mailroom_core::port::{MailSender, OutboundEmail, TemplateRenderer};
use std::sync::Mutex;

/// Replaces `{{key}}` with the string value of `params[key]`
struct PlaceholderRenderer;

impl PlaceholderRenderer {
    fn render(body: &str, params: &serde_json::Value) -> Result<String, BoxError> {
        let mut out = body.to_string();
        if let Some(map) = params.as_object() {
            for (key, value) in map {
                let value = value.as_str().ok_or_else(|| format!("param {key} is not a string"))?;
                out = out.replace(&format!("{{{{{key}}}}}"), value);
            }
        }
        Ok(out)
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    fn render_text(&self, body: &str, params: &serde_json::Value) -> Result<String, BoxError> {
        Self::render(body, params)
    }

    fn render_html(&self, body: &str, params: &serde_json::Value) -> Result<String, BoxError> {
        Self::render(body, params)
    }
}

#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<(TransportCredentials, OutboundEmail)>>,
    fail: bool,
}

#[async_trait]
impl MailSender for RecordingSender {
    async fn send(
        &self,
        credentials: &TransportCredentials,
        email: &OutboundEmail,
    ) -> Result<(), BoxError> {
        if self.fail {
            return Err("connection refused".into());
        }
        self.sent
            .lock()
            .unwrap()
            .push((credentials.clone(), email.clone()));
        Ok(())
    }
}

fn send_request() -> SendEmailRequest {
    SendEmailRequest {
        project_id: "p1".into(),
        template_id: "welcome".into(),
        transport_id: "smtp1".into(),
        subject: "Welcome".into(),
        to: vec!["ada@example.com".into()],
        params: serde_json::json!({ "name": "Ada" }),
    }
}

#[tokio::test]
async fn test_password_is_sealed_at_rest() {
    let env = setup_with_group().await;
    let service = env.mailroom.service();

    let transport = service
        .create_transport(transport_request("p1", "hunter2"))
        .await
        .unwrap();
    assert_ne!(transport.encrypted_password, "hunter2");
    assert!(transport.encrypted_password.len() > 24);
    assert!(transport.encrypted_password.chars().all(|c| c.is_ascii_hexdigit()));

    let stored = service.get_transport("smtp1", "p1").await.unwrap();
    assert_eq!(stored.encrypted_password, transport.encrypted_password);

    let creds = service.transport_credentials("smtp1", "p1").await.unwrap();
    assert_eq!(creds.password, "hunter2");
    assert_eq!(creds.host, "smtp.example.com");
    assert_eq!(creds.email_reply_to, vec!["support@example.com"]);
}

#[tokio::test]
async fn test_empty_password_round_trips() {
    let env = setup_with_group().await;
    let service = env.mailroom.service();

    let transport = service.create_transport(transport_request("p1", "")).await.unwrap();
    // Nonce plus the 16-byte tag, nothing else
    assert_eq!(transport.encrypted_password.len(), 24 + 32);
    let creds = service.transport_credentials("smtp1", "p1").await.unwrap();
    assert_eq!(creds.password, "");
}

#[tokio::test]
async fn test_tampered_password_fails_closed() {
    let env = setup_with_group().await;
    let service = env.mailroom.service();
    let transport = service
        .create_transport(transport_request("p1", "hunter2"))
        .await
        .unwrap();

    // Flip one bit in the last ciphertext character
    let mut tampered = transport.encrypted_password.clone();
    let last = tampered.pop().unwrap();
    let flipped = char::from_digit(last.to_digit(16).unwrap() ^ 1, 16).unwrap();
    tampered.push(flipped);

    sqlx::query("UPDATE smtp_transports SET encrypted_password = ?1 WHERE smtp_transport_id = 'smtp1'")
        .bind(&tampered)
        .execute(env.mailroom.store().pools().writer())
        .await
        .unwrap();

    let err = service.transport_credentials("smtp1", "p1").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AuthenticationFailure);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_other_key_cannot_open_password() {
    let env = setup_with_group().await;
    env.mailroom
        .service()
        .create_transport(transport_request("p1", "hunter2"))
        .await
        .unwrap();
    let config = common::config_for(&env.dir);
    env.mailroom.close().await;

    let mut other = config.clone();
    other.encryption_key = "ffeeddccbbaa99887766554433221100".into();
    let reopened = mailroom::Mailroom::open(&other).await.unwrap();

    let err = reopened
        .service()
        .transport_credentials("smtp1", "p1")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AuthenticationFailure);
    reopened.close().await;
}

#[tokio::test]
async fn test_send_email_renders_and_delivers() {
    let env = setup_with_group().await;
    let service = env.mailroom.service();
    service
        .create_transport(transport_request("p1", "hunter2"))
        .await
        .unwrap();
    service
        .set_template("p1", "g1", "welcome", "Hi {{name}}", "<p>Hi {{name}}</p>")
        .await
        .unwrap();

    let sender = RecordingSender::default();
    service
        .send_email(&PlaceholderRenderer, &sender, send_request())
        .await
        .unwrap();

    let sent = sender.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (creds, email) = &sent[0];
    assert_eq!(creds.password, "hunter2");
    assert_eq!(email.text, "Hi Ada");
    assert_eq!(email.html, "<p>Hi Ada</p>");
    assert_eq!(email.to, vec!["ada@example.com"]);
}

#[tokio::test]
async fn test_send_email_error_classes() {
    let env = setup_with_group().await;
    let service = env.mailroom.service();

    // No template yet
    let err = service
        .send_email(&PlaceholderRenderer, &RecordingSender::default(), send_request())
        .await
        .unwrap_err();
    assert!(matches!(err, SendEmailError::Store(ref e) if e.code() == ErrorCode::TemplateNotFound));

    service
        .set_template("p1", "g1", "welcome", "Hi {{name}}", "<p>Hi</p>")
        .await
        .unwrap();

    // No transport yet
    let err = service
        .send_email(&PlaceholderRenderer, &RecordingSender::default(), send_request())
        .await
        .unwrap_err();
    assert!(matches!(err, SendEmailError::Store(ref e) if e.code() == ErrorCode::TransportNotFound));

    service
        .create_transport(transport_request("p1", "hunter2"))
        .await
        .unwrap();

    let mut bad_params = send_request();
    bad_params.params = serde_json::json!({ "name": 42 });
    let err = service
        .send_email(&PlaceholderRenderer, &RecordingSender::default(), bad_params)
        .await
        .unwrap_err();
    assert!(matches!(err, SendEmailError::Render(_)));

    let failing = RecordingSender {
        fail: true,
        ..Default::default()
    };
    let err = service
        .send_email(&PlaceholderRenderer, &failing, send_request())
        .await
        .unwrap_err();
    assert!(matches!(err, SendEmailError::Delivery(_)));
}

#[tokio::test]
async fn test_unknown_project_transport_lookup() {
    let env = setup().await;
    let err = env
        .mailroom
        .service()
        .transport_credentials("smtp1", "ghost")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ProjectNotFound);
}
