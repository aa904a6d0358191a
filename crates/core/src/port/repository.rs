// Repository Ports (Interfaces)
//
// Every implementation translates storage failures into `StoreError` at this
// boundary. Get operations below a parent report the parent first:
// ProjectNotFound before {Transport,Group,Template}NotFound.

use crate::domain::{Group, NewGroup, NewProject, NewTemplate, NewTransport, Project, Template, Transport};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a project; an identifier collision yields ProjectAlreadyExists
    async fn insert_project(&self, params: &NewProject) -> Result<Project>;

    async fn get_project(&self, project_id: &str) -> Result<Project>;
}

#[async_trait]
pub trait TransportRepository: Send + Sync {
    /// Insert derived from the parent project row; no project means ProjectNotFound
    async fn insert_transport(&self, params: &NewTransport) -> Result<Transport>;

    async fn get_transport(&self, transport_id: &str, project_id: &str) -> Result<Transport>;
}

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn insert_group(&self, params: &NewGroup) -> Result<Group>;

    async fn get_group(&self, project_id: &str, group_id: &str) -> Result<Group>;
}

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Plain insert, the primitive beneath the template versioner
    async fn insert_template(&self, params: &NewTemplate) -> Result<Template>;

    /// Templates are unique within a project, so the group is not part of the key
    async fn get_template(&self, project_id: &str, template_id: &str) -> Result<Template>;
}

/// Full repository surface for the four entities
pub trait Repository:
    ProjectRepository + TransportRepository + GroupRepository + TemplateRepository
{
}

impl<T> Repository for T where
    T: ProjectRepository + TransportRepository + GroupRepository + TemplateRepository
{
}
