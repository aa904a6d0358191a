// Send Email Use Case

use super::MailerService;
use crate::error::{BoxError, StoreError};
use crate::port::{MailSender, OutboundEmail, TemplateRenderer};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Send request; `params` feeds the template renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub project_id: String,
    pub template_id: String,
    pub transport_id: String,
    pub subject: String,
    pub to: Vec<String>,

    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum SendEmailError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("template rendering failed: {0}")]
    Render(#[source] BoxError),

    #[error("delivery failed: {0}")]
    Delivery(#[source] BoxError),
}

pub(super) async fn execute(
    service: &MailerService,
    renderer: &dyn TemplateRenderer,
    sender: &dyn MailSender,
    req: SendEmailRequest,
) -> Result<(), SendEmailError> {
    let template = service.get_template(&req.project_id, &req.template_id).await?;

    let text = renderer
        .render_text(&template.text, &req.params)
        .map_err(SendEmailError::Render)?;
    let html = renderer
        .render_html(&template.html, &req.params)
        .map_err(SendEmailError::Render)?;

    let credentials = service
        .transport_credentials(&req.transport_id, &req.project_id)
        .await?;

    let email = OutboundEmail {
        subject: req.subject,
        text,
        html,
        to: req.to,
    };
    sender
        .send(&credentials, &email)
        .await
        .map_err(SendEmailError::Delivery)?;

    info!(
        project_id = %req.project_id,
        template_id = %req.template_id,
        transport_id = %req.transport_id,
        recipients = email.to.len(),
        "Email handed to transport"
    );
    Ok(())
}
