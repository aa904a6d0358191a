// SQLite Transaction Implementation
//
// Wraps an sqlx transaction on the write handle. If the value is dropped
// without commit (caller cancellation, deadline expiry) sqlx rolls it back.

use crate::error::map_sqlx_error;
use crate::queries;
use async_trait::async_trait;
use mailroom_core::domain::{
    ContentDigest, Datetime, Group, NewGroup, NewProject, NewTemplate, NewTransport, Project,
    Template, TemplateProbe, Transport,
};
use mailroom_core::error::{Result, StoreError};
use mailroom_core::port::{RepositoryTransaction, TimeProvider, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use std::sync::Arc;
use tracing::debug;

pub struct SqliteStoreTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
    time_provider: Arc<dyn TimeProvider>,
}

impl<'a> SqliteStoreTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self { tx, time_provider }
    }
}

#[async_trait]
impl Transaction for SqliteStoreTransaction<'_> {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl RepositoryTransaction for SqliteStoreTransaction<'_> {
    async fn insert_project(&mut self, params: &NewProject) -> Result<Project> {
        debug!(project_id = %params.project_id, "tx: insert project");
        let now = self.time_provider.now();
        queries::insert_project(&mut *self.tx, params, now).await
    }

    async fn get_project(&mut self, project_id: &str) -> Result<Project> {
        queries::get_project(&mut *self.tx, project_id).await
    }

    async fn insert_transport(&mut self, params: &NewTransport) -> Result<Transport> {
        debug!(
            project_id = %params.project_id,
            transport_id = %params.transport_id,
            "tx: insert transport"
        );
        let now = self.time_provider.now();
        queries::insert_transport(&mut *self.tx, params, now).await
    }

    async fn get_transport(&mut self, transport_id: &str, project_id: &str) -> Result<Transport> {
        queries::get_transport(&mut *self.tx, transport_id, project_id)
            .await?
            .into_result(|| StoreError::ProjectNotFound(None), || StoreError::TransportNotFound)
    }

    async fn insert_group(&mut self, params: &NewGroup) -> Result<Group> {
        debug!(project_id = %params.project_id, group_id = %params.group_id, "tx: insert group");
        let now = self.time_provider.now();
        queries::insert_group(&mut *self.tx, params, now).await
    }

    async fn get_group(&mut self, project_id: &str, group_id: &str) -> Result<Group> {
        queries::get_group(&mut *self.tx, project_id, group_id)
            .await?
            .into_result(
                || StoreError::ProjectNotFound(None),
                || StoreError::GroupNotFound(None),
            )
    }

    async fn insert_template(&mut self, params: &NewTemplate) -> Result<Template> {
        debug!(
            project_id = %params.project_id,
            template_id = %params.template_id,
            "tx: insert template"
        );
        let now = self.time_provider.now();
        queries::insert_template(&mut *self.tx, params, now).await
    }

    async fn get_template(&mut self, project_id: &str, template_id: &str) -> Result<Template> {
        queries::get_template(&mut *self.tx, project_id, template_id)
            .await?
            .into_result(|| StoreError::ProjectNotFound(None), || StoreError::TemplateNotFound)
    }

    async fn probe_template(
        &mut self,
        project_id: &str,
        group_id: &str,
        template_id: &str,
        text_digest: &ContentDigest,
        html_digest: &ContentDigest,
    ) -> Result<TemplateProbe> {
        queries::probe_template(
            &mut *self.tx,
            project_id,
            group_id,
            template_id,
            text_digest,
            html_digest,
        )
        .await
    }

    async fn update_template(
        &mut self,
        params: &NewTemplate,
        modified_at: Datetime,
    ) -> Result<Template> {
        debug!(
            project_id = %params.project_id,
            template_id = %params.template_id,
            %modified_at,
            "tx: update template"
        );
        queries::update_template(&mut *self.tx, params, modified_at).await
    }
}
