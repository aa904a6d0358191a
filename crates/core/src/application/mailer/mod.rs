// Mailer Service - Use cases over projects, transports, groups and templates

pub mod send_email;
mod template_files;

pub use send_email::{SendEmailError, SendEmailRequest};

use crate::application::template_versioner;
use crate::domain::{
    Group, NewGroup, NewProject, NewTemplate, NewTransport, Project, Template, Transport,
    TransportCredentials,
};
use crate::error::Result;
use crate::port::{
    MailSender, Repository, SecretCipher, TemplateRenderer, TimeProvider, TransactionalRepository,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Transport creation request carrying the plaintext password
#[derive(Clone, Deserialize)]
pub struct NewTransportRequest {
    pub transport_id: String,
    pub project_id: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub email_from: String,
    pub email_from_name: String,
    #[serde(default)]
    pub email_reply_to: Vec<String>,
}

impl std::fmt::Debug for NewTransportRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewTransportRequest")
            .field("transport_id", &self.transport_id)
            .field("project_id", &self.project_id)
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email_from", &self.email_from)
            .field("email_from_name", &self.email_from_name)
            .field("email_reply_to", &self.email_reply_to)
            .finish()
    }
}

/// Mailer Service
///
/// Owns the cipher: passwords are sealed before a transport reaches the
/// repository and opened only when credentials are requested.
pub struct MailerService {
    store: Arc<dyn Repository>,
    tx_store: Arc<dyn TransactionalRepository>,
    cipher: Arc<dyn SecretCipher>,
    time_provider: Arc<dyn TimeProvider>,
}

impl MailerService {
    pub fn new(
        store: Arc<dyn Repository>,
        tx_store: Arc<dyn TransactionalRepository>,
        cipher: Arc<dyn SecretCipher>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            store,
            tx_store,
            cipher,
            time_provider,
        }
    }

    //
    // projects
    //

    pub async fn create_project(
        &self,
        project_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Project> {
        let project = self
            .store
            .insert_project(&NewProject::new(project_id, name, description))
            .await?;
        info!(project_id = %project.project_id, "Project created");
        Ok(project)
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Project> {
        self.store.get_project(project_id).await
    }

    //
    // transports
    //

    /// Seal the password, then insert the transport under its project
    pub async fn create_transport(&self, req: NewTransportRequest) -> Result<Transport> {
        let encrypted_password = self.cipher.encrypt_to_text(&req.password)?;

        let transport = self
            .store
            .insert_transport(&NewTransport {
                transport_id: req.transport_id,
                project_id: req.project_id,
                name: req.name,
                host: req.host,
                port: req.port,
                username: req.username,
                encrypted_password,
                email_from: req.email_from,
                email_from_name: req.email_from_name,
                email_reply_to: req.email_reply_to,
            })
            .await?;

        info!(
            project_id = %transport.project_id,
            transport_id = %transport.transport_id,
            host = %transport.host,
            "Transport created"
        );
        Ok(transport)
    }

    /// Stored transport record, password still sealed
    pub async fn get_transport(&self, transport_id: &str, project_id: &str) -> Result<Transport> {
        self.store.get_transport(transport_id, project_id).await
    }

    /// Transport with its password opened; fails closed on tampering
    pub async fn transport_credentials(
        &self,
        transport_id: &str,
        project_id: &str,
    ) -> Result<TransportCredentials> {
        let transport = self.store.get_transport(transport_id, project_id).await?;
        let password = self.cipher.decrypt_from_text(&transport.encrypted_password)?;
        debug!(project_id, transport_id, "Transport credentials opened");

        Ok(TransportCredentials {
            host: transport.host,
            port: transport.port,
            username: transport.username,
            password,
            email_from: transport.email_from,
            email_from_name: transport.email_from_name,
            email_reply_to: transport.email_reply_to,
        })
    }

    //
    // groups
    //

    pub async fn create_group(&self, group_id: &str, project_id: &str, name: &str) -> Result<Group> {
        let group = self
            .store
            .insert_group(&NewGroup::new(group_id, project_id, name))
            .await?;
        info!(project_id = %group.project_id, group_id = %group.group_id, "Group created");
        Ok(group)
    }

    pub async fn get_group(&self, project_id: &str, group_id: &str) -> Result<Group> {
        self.store.get_group(project_id, group_id).await
    }

    //
    // templates
    //

    /// Compute digests of both bodies and run the versioned upsert
    pub async fn set_template(
        &self,
        project_id: &str,
        group_id: &str,
        template_id: &str,
        text: &str,
        html: &str,
    ) -> Result<Template> {
        let params = NewTemplate::from_bodies(project_id, group_id, template_id, text, html);
        self.set_template_with_digests(params).await
    }

    /// Join each file list in order into one body, then upsert as `set_template`
    pub async fn set_template_from_files<P>(
        &self,
        project_id: &str,
        group_id: &str,
        template_id: &str,
        text_paths: &[P],
        html_paths: &[P],
    ) -> Result<Template>
    where
        P: AsRef<Path> + Sync,
    {
        let text = template_files::read_joined("text", text_paths).await?;
        let html = template_files::read_joined("html", html_paths).await?;
        debug!(
            project_id,
            template_id,
            text_files = text_paths.len(),
            html_files = html_paths.len(),
            "Template bodies read from files"
        );

        self.set_template(project_id, group_id, template_id, &text, &html)
            .await
    }

    /// Versioned upsert with caller-supplied digests
    pub async fn set_template_with_digests(&self, params: NewTemplate) -> Result<Template> {
        template_versioner::execute(
            self.tx_store.as_ref(),
            Arc::clone(&self.time_provider),
            params,
        )
        .await
    }

    pub async fn get_template(&self, project_id: &str, template_id: &str) -> Result<Template> {
        self.store.get_template(project_id, template_id).await
    }

    //
    // delivery
    //

    /// Render a stored template and hand it to a mail sender
    pub async fn send_email(
        &self,
        renderer: &dyn TemplateRenderer,
        sender: &dyn MailSender,
        req: SendEmailRequest,
    ) -> std::result::Result<(), SendEmailError> {
        send_email::execute(self, renderer, sender, req).await
    }
}
