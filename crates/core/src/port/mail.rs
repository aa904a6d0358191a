// Downstream collaborator ports: template expansion and mail delivery.
// Implementations live outside this workspace.

use crate::domain::TransportCredentials;
use crate::error::BoxError;
use async_trait::async_trait;

/// Fully rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
    pub to: Vec<String>,
}

/// Expands stored template bodies with caller-supplied parameters
pub trait TemplateRenderer: Send + Sync {
    fn render_text(&self, body: &str, params: &serde_json::Value) -> Result<String, BoxError>;

    fn render_html(&self, body: &str, params: &serde_json::Value) -> Result<String, BoxError>;
}

/// Delivers a rendered message through a transport
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(
        &self,
        credentials: &TransportCredentials,
        email: &OutboundEmail,
    ) -> Result<(), BoxError>;
}
