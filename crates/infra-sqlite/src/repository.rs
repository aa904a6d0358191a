// SQLite Repository Implementation
//
// Reads go to the read handle, writes to the single-connection write handle.

use crate::error::map_sqlx_error;
use crate::queries;
use crate::{SqliteStoreTransaction, StorePools};
use async_trait::async_trait;
use mailroom_core::domain::{
    Group, NewGroup, NewProject, NewTemplate, NewTransport, Project, Template, Transport,
};
use mailroom_core::error::{Result, StoreError};
use mailroom_core::port::{
    GroupRepository, ProjectRepository, RepositoryTransaction, TemplateRepository, TimeProvider,
    TransactionalRepository, TransportRepository,
};
use sqlx::pool::PoolConnection;
use sqlx::Sqlite;
use std::sync::Arc;
use tracing::debug;

pub struct SqliteStore {
    pools: StorePools,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteStore {
    pub fn new(pools: StorePools, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pools,
            time_provider,
        }
    }

    pub fn pools(&self) -> &StorePools {
        &self.pools
    }

    async fn write_conn(&self) -> Result<PoolConnection<Sqlite>> {
        self.pools.writer().acquire().await.map_err(map_sqlx_error)
    }

    async fn read_conn(&self) -> Result<PoolConnection<Sqlite>> {
        self.pools.reader().acquire().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl ProjectRepository for SqliteStore {
    async fn insert_project(&self, params: &NewProject) -> Result<Project> {
        debug!(project_id = %params.project_id, "Inserting project");
        let mut conn = self.write_conn().await?;
        queries::insert_project(&mut conn, params, self.time_provider.now()).await
    }

    async fn get_project(&self, project_id: &str) -> Result<Project> {
        debug!(project_id, "Fetching project");
        let mut conn = self.read_conn().await?;
        queries::get_project(&mut conn, project_id).await
    }
}

#[async_trait]
impl TransportRepository for SqliteStore {
    async fn insert_transport(&self, params: &NewTransport) -> Result<Transport> {
        debug!(
            project_id = %params.project_id,
            transport_id = %params.transport_id,
            "Inserting transport"
        );
        let mut conn = self.write_conn().await?;
        queries::insert_transport(&mut conn, params, self.time_provider.now()).await
    }

    async fn get_transport(&self, transport_id: &str, project_id: &str) -> Result<Transport> {
        debug!(project_id, transport_id, "Fetching transport");
        let mut conn = self.read_conn().await?;
        queries::get_transport(&mut conn, transport_id, project_id)
            .await?
            .into_result(|| StoreError::ProjectNotFound(None), || StoreError::TransportNotFound)
    }
}

#[async_trait]
impl GroupRepository for SqliteStore {
    async fn insert_group(&self, params: &NewGroup) -> Result<Group> {
        debug!(project_id = %params.project_id, group_id = %params.group_id, "Inserting group");
        let mut conn = self.write_conn().await?;
        queries::insert_group(&mut conn, params, self.time_provider.now()).await
    }

    async fn get_group(&self, project_id: &str, group_id: &str) -> Result<Group> {
        debug!(project_id, group_id, "Fetching group");
        let mut conn = self.read_conn().await?;
        queries::get_group(&mut conn, project_id, group_id)
            .await?
            .into_result(
                || StoreError::ProjectNotFound(None),
                || StoreError::GroupNotFound(None),
            )
    }
}

#[async_trait]
impl TemplateRepository for SqliteStore {
    async fn insert_template(&self, params: &NewTemplate) -> Result<Template> {
        debug!(
            project_id = %params.project_id,
            template_id = %params.template_id,
            "Inserting template"
        );
        let mut conn = self.write_conn().await?;
        queries::insert_template(&mut conn, params, self.time_provider.now()).await
    }

    async fn get_template(&self, project_id: &str, template_id: &str) -> Result<Template> {
        debug!(project_id, template_id, "Fetching template");
        let mut conn = self.read_conn().await?;
        queries::get_template(&mut conn, project_id, template_id)
            .await?
            .into_result(|| StoreError::ProjectNotFound(None), || StoreError::TemplateNotFound)
    }
}

#[async_trait]
impl TransactionalRepository for SqliteStore {
    async fn begin_transaction(&self) -> Result<Box<dyn RepositoryTransaction>> {
        let tx = self.pools.writer().begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteStoreTransaction::new(
            tx,
            Arc::clone(&self.time_provider),
        )))
    }
}
