// Transaction port for atomic operations

use crate::domain::{
    ContentDigest, Datetime, Group, NewGroup, NewProject, NewTemplate, NewTransport, Project,
    Template, TemplateProbe, Transport,
};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Repository able to open serializable units of work
#[async_trait]
pub trait TransactionalRepository: Send + Sync {
    /// Begin a new transaction on the write handle
    async fn begin_transaction(&self) -> Result<Box<dyn RepositoryTransaction>>;
}

/// Transaction-scoped repository view.
///
/// Dropping the view without committing rolls the transaction back.
#[async_trait]
pub trait RepositoryTransaction: Transaction {
    async fn insert_project(&mut self, params: &NewProject) -> Result<Project>;

    async fn get_project(&mut self, project_id: &str) -> Result<Project>;

    async fn insert_transport(&mut self, params: &NewTransport) -> Result<Transport>;

    async fn get_transport(&mut self, transport_id: &str, project_id: &str) -> Result<Transport>;

    async fn insert_group(&mut self, params: &NewGroup) -> Result<Group>;

    async fn get_group(&mut self, project_id: &str, group_id: &str) -> Result<Group>;

    async fn insert_template(&mut self, params: &NewTemplate) -> Result<Template>;

    async fn get_template(&mut self, project_id: &str, template_id: &str) -> Result<Template>;

    /// Resolve project existence, group existence, template existence and
    /// stored-vs-supplied digest equality in a single query
    async fn probe_template(
        &mut self,
        project_id: &str,
        group_id: &str,
        template_id: &str,
        text_digest: &ContentDigest,
        html_digest: &ContentDigest,
    ) -> Result<TemplateProbe>;

    /// Rewrite body, digest and group columns of an existing template
    async fn update_template(
        &mut self,
        params: &NewTemplate,
        modified_at: Datetime,
    ) -> Result<Template>;
}
