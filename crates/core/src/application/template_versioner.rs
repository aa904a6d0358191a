// Template Versioner Use Case
//
// Idempotent create-or-update-if-changed for templates, run as one atomic
// unit of work so the digest check and the conditional write cannot be
// interleaved by another writer.

use crate::application::coordinator::run_atomic;
use crate::domain::{NewTemplate, Template, TemplateProbe};
use crate::error::{Result, StoreError};
use crate::port::{RepositoryTransaction, TimeProvider, TransactionalRepository};
use std::sync::Arc;
use tracing::{debug, info};

/// Execute the set-template use case
///
/// # Arguments
///
/// * `repo` - Transactional repository (write handle)
/// * `clock` - Time provider used for ModifiedAt on update
/// * `params` - Template content with caller-computed digests
///
/// # Outcomes
///
/// * absent → inserted, `created_at == modified_at`
/// * present with equal digests (and group) → returned as-is, nothing rewritten
/// * present with a differing digest or group → updated, `modified_at` advances
pub async fn execute(
    repo: &dyn TransactionalRepository,
    clock: Arc<dyn TimeProvider>,
    params: NewTemplate,
) -> Result<Template> {
    run_atomic(repo, move |tx| {
        Box::pin(async move { write_version(tx, clock.as_ref(), params).await })
    })
    .await
}

async fn write_version(
    tx: &mut dyn RepositoryTransaction,
    clock: &dyn TimeProvider,
    params: NewTemplate,
) -> Result<Template> {
    let probe = tx
        .probe_template(
            &params.project_id,
            &params.group_id,
            &params.template_id,
            &params.text_digest,
            &params.html_digest,
        )
        .await?;

    let (group_exists, stored) = match probe {
        TemplateProbe::ProjectMissing => return Err(StoreError::ProjectNotFound(None)),
        TemplateProbe::Resolved {
            group_exists,
            stored,
        } => (group_exists, stored),
    };

    let Some(stored) = stored else {
        if !group_exists {
            return Err(StoreError::GroupNotFound(None));
        }
        let template = tx.insert_template(&params).await?;
        info!(
            project_id = %template.project_id,
            template_id = %template.template_id,
            "Template created"
        );
        return Ok(template);
    };

    let same_group = stored.group_id == params.group_id;
    if same_group && stored.digests_match() {
        debug!(
            project_id = %params.project_id,
            template_id = %params.template_id,
            "Template unchanged"
        );
        return Ok(params.into_template(stored.created_at, stored.modified_at));
    }

    if !group_exists {
        return Err(StoreError::GroupNotFound(None));
    }

    // ModifiedAt must strictly advance even if the clock has not
    let now = clock.now();
    let modified_at = if now > stored.modified_at {
        now
    } else {
        stored.modified_at.next_tick()
    };

    let template = tx.update_template(&params, modified_at).await?;
    info!(
        project_id = %template.project_id,
        template_id = %template.template_id,
        text_changed = !stored.text_digest_matches,
        html_changed = !stored.html_digest_matches,
        moved = !same_group,
        "Template updated"
    );
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ContentDigest, Datetime, Group, NewGroup, NewProject, NewTransport, Project,
        StoredVersion, Transport,
    };
    use crate::error::ErrorCode;
    use crate::port::{ManualClock, Transaction};
    use async_trait::async_trait;

    /// Answers the probe from a script and records every write
    struct ScriptedTx {
        probe: TemplateProbe,
        writes: Vec<String>,
    }

    impl ScriptedTx {
        fn new(probe: TemplateProbe) -> Self {
            Self {
                probe,
                writes: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl Transaction for ScriptedTx {
        async fn commit(self: Box<Self>) -> Result<()> {
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    fn unused<T>() -> Result<T> {
        Err(StoreError::InvalidConfig("not used by the versioner".into()))
    }

    #[async_trait]
    impl RepositoryTransaction for ScriptedTx {
        async fn insert_project(&mut self, _params: &NewProject) -> Result<Project> {
            unused()
        }

        async fn get_project(&mut self, _project_id: &str) -> Result<Project> {
            unused()
        }

        async fn insert_transport(&mut self, _params: &NewTransport) -> Result<Transport> {
            unused()
        }

        async fn get_transport(&mut self, _t: &str, _p: &str) -> Result<Transport> {
            unused()
        }

        async fn insert_group(&mut self, _params: &NewGroup) -> Result<Group> {
            unused()
        }

        async fn get_group(&mut self, _p: &str, _g: &str) -> Result<Group> {
            unused()
        }

        async fn insert_template(&mut self, params: &NewTemplate) -> Result<Template> {
            self.writes.push("insert".to_string());
            let now = Datetime::epoch();
            Ok(params.clone().into_template(now, now))
        }

        async fn get_template(&mut self, _p: &str, _t: &str) -> Result<Template> {
            unused()
        }

        async fn probe_template(
            &mut self,
            _p: &str,
            _g: &str,
            _t: &str,
            _text: &ContentDigest,
            _html: &ContentDigest,
        ) -> Result<TemplateProbe> {
            Ok(self.probe.clone())
        }

        async fn update_template(&mut self, params: &NewTemplate, at: Datetime) -> Result<Template> {
            self.writes.push(format!("update@{at}"));
            Ok(params.clone().into_template(Datetime::epoch(), at))
        }
    }

    fn stored(group_id: &str, text_matches: bool, modified_at: Datetime) -> StoredVersion {
        StoredVersion {
            group_id: group_id.to_string(),
            text_digest_matches: text_matches,
            html_digest_matches: true,
            created_at: Datetime::epoch(),
            modified_at,
        }
    }

    fn params() -> NewTemplate {
        NewTemplate::from_bodies("p1", "g1", "t1", "A", "<a>")
    }

    #[tokio::test]
    async fn test_missing_project() {
        let mut tx = ScriptedTx::new(TemplateProbe::ProjectMissing);
        let clock = ManualClock::new(Datetime::epoch());

        let err = write_version(&mut tx, &clock, params()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProjectNotFound);
        assert!(tx.writes.is_empty());
    }

    #[tokio::test]
    async fn test_new_template_needs_group() {
        let mut tx = ScriptedTx::new(TemplateProbe::Resolved {
            group_exists: false,
            stored: None,
        });
        let clock = ManualClock::new(Datetime::epoch());

        let err = write_version(&mut tx, &clock, params()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::GroupNotFound);
        assert!(tx.writes.is_empty());
    }

    #[tokio::test]
    async fn test_new_template_is_inserted() {
        let mut tx = ScriptedTx::new(TemplateProbe::Resolved {
            group_exists: true,
            stored: None,
        });
        let clock = ManualClock::new(Datetime::epoch());

        write_version(&mut tx, &clock, params()).await.unwrap();
        assert_eq!(tx.writes, vec!["insert"]);
    }

    #[tokio::test]
    async fn test_matching_digests_write_nothing() {
        let last = Datetime::epoch().next_tick();
        let mut tx = ScriptedTx::new(TemplateProbe::Resolved {
            group_exists: true,
            stored: Some(stored("g1", true, last)),
        });
        let clock = ManualClock::new(Datetime::now());

        let template = write_version(&mut tx, &clock, params()).await.unwrap();
        assert!(tx.writes.is_empty());
        assert_eq!(template.modified_at, last);
        assert_eq!(template.text, "A");
    }

    #[tokio::test]
    async fn test_changed_digest_updates_past_stored_time() {
        // Clock lags behind the stored value
        let last = Datetime::now();
        let mut tx = ScriptedTx::new(TemplateProbe::Resolved {
            group_exists: true,
            stored: Some(stored("g1", false, last)),
        });
        let clock = ManualClock::new(Datetime::epoch());

        let template = write_version(&mut tx, &clock, params()).await.unwrap();
        assert_eq!(template.modified_at, last.next_tick());
        assert_eq!(tx.writes, vec![format!("update@{}", last.next_tick())]);
    }

    #[tokio::test]
    async fn test_group_change_is_an_update() {
        let mut tx = ScriptedTx::new(TemplateProbe::Resolved {
            group_exists: true,
            stored: Some(stored("g0", true, Datetime::epoch())),
        });
        let clock = ManualClock::new(Datetime::now());

        let template = write_version(&mut tx, &clock, params()).await.unwrap();
        assert_eq!(template.group_id, "g1");
        assert_eq!(tx.writes.len(), 1);
    }
}
