// SQLite row representations
//
// Child rows read through an outer join from `projects` carry placeholder values
// when the child is absent. Absence is read from the explicit `child_exists`
// column, never from the placeholders, since '' is a legal identifier.

use mailroom_core::domain::{
    ContentDigest, Datetime, Group, Lookup, Project, StoredVersion, Template, TemplateProbe,
    Transport,
};
use mailroom_core::error::{Result, StoreError};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProjectRow {
    project_id: String,
    project_name: String,
    description: String,
    created_at: String,
}

impl ProjectRow {
    pub(crate) fn into_project(self) -> Result<Project> {
        Ok(Project {
            project_id: self.project_id,
            name: self.project_name,
            description: self.description,
            created_at: Datetime::parse(&self.created_at)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TransportRow {
    smtp_transport_id: String,
    project_id: String,
    transport_name: String,
    host: String,
    port: i64,
    username: String,
    encrypted_password: String,
    email_from: String,
    email_from_name: String,
    email_reply_to: String, // JSON array
    created_at: String,
    modified_at: String,
}

impl TransportRow {
    pub(crate) fn into_transport(self) -> Result<Transport> {
        let port = u16::try_from(self.port).map_err(|e| {
            StoreError::storage(format!("stored port {} out of range", self.port), e)
        })?;

        Ok(Transport {
            transport_id: self.smtp_transport_id,
            project_id: self.project_id,
            name: self.transport_name,
            host: self.host,
            port,
            username: self.username,
            encrypted_password: self.encrypted_password,
            email_from: self.email_from,
            email_from_name: self.email_from_name,
            email_reply_to: decode_reply_to(&self.email_reply_to)?,
            created_at: Datetime::parse(&self.created_at)?,
            modified_at: Datetime::parse(&self.modified_at)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct GroupRow {
    group_id: String,
    project_id: String,
    group_name: String,
    created_at: String,
    modified_at: String,
}

impl GroupRow {
    pub(crate) fn into_group(self) -> Result<Group> {
        Ok(Group {
            group_id: self.group_id,
            project_id: self.project_id,
            name: self.group_name,
            created_at: Datetime::parse(&self.created_at)?,
            modified_at: Datetime::parse(&self.modified_at)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TemplateRow {
    template_id: String,
    group_id: String,
    project_id: String,
    txt: String,
    txt_digest: String,
    html: String,
    html_digest: String,
    created_at: String,
    modified_at: String,
}

impl TemplateRow {
    pub(crate) fn into_template(self) -> Result<Template> {
        Ok(Template {
            template_id: self.template_id,
            group_id: self.group_id,
            project_id: self.project_id,
            text: self.txt,
            text_digest: ContentDigest::from_hex(self.txt_digest),
            html: self.html,
            html_digest: ContentDigest::from_hex(self.html_digest),
            created_at: Datetime::parse(&self.created_at)?,
            modified_at: Datetime::parse(&self.modified_at)?,
        })
    }
}

/// A child row read through an outer join, tagged with whether the child matched
#[derive(Debug)]
pub(crate) struct Joined<R> {
    child_exists: i64,
    row: R,
}

impl<'r, R> sqlx::FromRow<'r, SqliteRow> for Joined<R>
where
    R: sqlx::FromRow<'r, SqliteRow>,
{
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        Ok(Joined {
            child_exists: row.try_get("child_exists")?,
            row: R::from_row(row)?,
        })
    }
}

impl<R> Joined<R> {
    pub(crate) fn into_lookup<T>(
        self,
        convert: impl FnOnce(R) -> Result<T>,
    ) -> Result<Lookup<T>> {
        if self.child_exists == 0 {
            return Ok(Lookup::Missing);
        }
        convert(self.row).map(Lookup::Found)
    }
}

/// One row of the pre-upsert probe
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProbeRow {
    group_exists: i64,
    template_exists: i64,
    group_id: String,
    text_digest_matches: i64,
    html_digest_matches: i64,
    created_at: String,
    modified_at: String,
}

impl ProbeRow {
    pub(crate) fn into_probe(self) -> Result<TemplateProbe> {
        let stored = if self.template_exists == 0 {
            None
        } else {
            Some(StoredVersion {
                group_id: self.group_id,
                text_digest_matches: self.text_digest_matches != 0,
                html_digest_matches: self.html_digest_matches != 0,
                created_at: Datetime::parse(&self.created_at)?,
                modified_at: Datetime::parse(&self.modified_at)?,
            })
        };

        Ok(TemplateProbe::Resolved {
            group_exists: self.group_exists != 0,
            stored,
        })
    }
}

pub(crate) fn encode_reply_to(addresses: &[String]) -> Result<String> {
    serde_json::to_string(addresses)
        .map_err(|e| StoreError::storage("failed to encode reply-to list", e))
}

pub(crate) fn decode_reply_to(column: &str) -> Result<Vec<String>> {
    serde_json::from_str(column)
        .map_err(|e| StoreError::storage(format!("invalid reply-to column {column:?}"), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailroom_core::domain::datetime::EPOCH_SENTINEL;

    fn sentinel_template(project_id: &str) -> TemplateRow {
        TemplateRow {
            template_id: String::new(),
            group_id: String::new(),
            project_id: project_id.to_string(),
            txt: String::new(),
            txt_digest: String::new(),
            html: String::new(),
            html_digest: String::new(),
            created_at: EPOCH_SENTINEL.to_string(),
            modified_at: EPOCH_SENTINEL.to_string(),
        }
    }

    #[test]
    fn test_unmatched_join_is_missing() {
        let joined = Joined {
            child_exists: 0,
            row: sentinel_template("p1"),
        };
        let lookup = joined.into_lookup(TemplateRow::into_template).unwrap();
        assert_eq!(lookup, Lookup::Missing);
    }

    #[test]
    fn test_empty_template_id_is_found_when_matched() {
        let joined = Joined {
            child_exists: 1,
            row: sentinel_template("p1"),
        };
        match joined.into_lookup(TemplateRow::into_template).unwrap() {
            Lookup::Found(template) => {
                assert_eq!(template.template_id, "");
                assert_eq!(template.project_id, "p1");
            }
            other => panic!("expected a found template, got {other:?}"),
        }
    }

    #[test]
    fn test_reply_to_keeps_order() {
        let addresses = vec!["b@example.com".to_string(), "a@example.com".to_string()];
        let column = encode_reply_to(&addresses).unwrap();
        assert_eq!(column, r#"["b@example.com","a@example.com"]"#);
        assert_eq!(decode_reply_to(&column).unwrap(), addresses);
    }

    #[test]
    fn test_out_of_range_port_is_storage_error() {
        let row = TransportRow {
            smtp_transport_id: "t1".into(),
            project_id: "p1".into(),
            transport_name: "main".into(),
            host: "smtp.example.com".into(),
            port: 70_000,
            username: "u".into(),
            encrypted_password: String::new(),
            email_from: "a@example.com".into(),
            email_from_name: "A".into(),
            email_reply_to: "[]".into(),
            created_at: EPOCH_SENTINEL.into(),
            modified_at: EPOCH_SENTINEL.into(),
        };
        let err = row.into_transport().unwrap_err();
        assert!(err.is_retryable());
    }
}
