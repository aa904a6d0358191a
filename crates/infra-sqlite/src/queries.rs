// SQL statements shared by the pool-backed store and the transaction view
//
// Every function runs on a single borrowed connection, so the same code serves
// autocommit calls and calls inside an open transaction.

use crate::error::{constraint_violation, map_sqlx_error, Constraint};
use crate::rows::{
    encode_reply_to, GroupRow, Joined, ProbeRow, ProjectRow, TemplateRow, TransportRow,
};
use mailroom_core::domain::datetime::EPOCH_SENTINEL;
use mailroom_core::domain::{
    ContentDigest, Datetime, Group, Lookup, NewGroup, NewProject, NewTemplate, NewTransport,
    Project, Template, TemplateProbe, Transport,
};
use mailroom_core::error::{Result, StoreError};
use sqlx::SqliteConnection;

const TRANSPORT_COLUMNS: &str = "smtp_transport_id, project_id, transport_name, host, port, \
     username, encrypted_password, email_from, email_from_name, email_reply_to, \
     created_at, modified_at";

const TEMPLATE_COLUMNS: &str =
    "template_id, group_id, project_id, txt, txt_digest, html, html_digest, created_at, modified_at";

//
// projects
//

pub(crate) async fn insert_project(
    conn: &mut SqliteConnection,
    params: &NewProject,
    now: Datetime,
) -> Result<Project> {
    let row: ProjectRow = sqlx::query_as(
        r#"
        INSERT INTO projects (project_id, project_name, description, created_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING project_id, project_name, description, created_at
        "#,
    )
    .bind(&params.project_id)
    .bind(&params.name)
    .bind(&params.description)
    .bind(now.to_db_string())
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match constraint_violation(&e) {
        Some(Constraint::Unique) => StoreError::ProjectAlreadyExists(Some(e.into())),
        _ => map_sqlx_error(e),
    })?;

    row.into_project()
}

pub(crate) async fn get_project(conn: &mut SqliteConnection, project_id: &str) -> Result<Project> {
    let row: Option<ProjectRow> = sqlx::query_as(
        "SELECT project_id, project_name, description, created_at FROM projects WHERE project_id = ?1",
    )
    .bind(project_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    row.ok_or(StoreError::ProjectNotFound(None))?.into_project()
}

async fn project_exists(conn: &mut SqliteConnection, project_id: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE project_id = ?1")
        .bind(project_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    Ok(count > 0)
}

//
// transports
//

/// Insert derived from the parent row: no project, no row, no RETURNING output
pub(crate) async fn insert_transport(
    conn: &mut SqliteConnection,
    params: &NewTransport,
    now: Datetime,
) -> Result<Transport> {
    let sql = format!(
        r#"
        INSERT INTO smtp_transports ({TRANSPORT_COLUMNS})
        SELECT ?1, p.project_id, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10
        FROM projects p
        WHERE p.project_id = ?11
        RETURNING {TRANSPORT_COLUMNS}
        "#
    );

    let row: Option<TransportRow> = sqlx::query_as(&sql)
        .bind(&params.transport_id)
        .bind(&params.name)
        .bind(&params.host)
        .bind(i64::from(params.port))
        .bind(&params.username)
        .bind(&params.encrypted_password)
        .bind(&params.email_from)
        .bind(&params.email_from_name)
        .bind(encode_reply_to(&params.email_reply_to)?)
        .bind(now.to_db_string())
        .bind(&params.project_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| match constraint_violation(&e) {
            Some(Constraint::Unique) => StoreError::TransportAlreadyExists(Some(e.into())),
            Some(Constraint::ForeignKey) => StoreError::ProjectNotFound(Some(e.into())),
            None => map_sqlx_error(e),
        })?;

    row.ok_or(StoreError::ProjectNotFound(None))?.into_transport()
}

pub(crate) async fn get_transport(
    conn: &mut SqliteConnection,
    transport_id: &str,
    project_id: &str,
) -> Result<Lookup<Transport>> {
    let row: Option<Joined<TransportRow>> = sqlx::query_as(
        r#"
        SELECT
            (t.smtp_transport_id IS NOT NULL) AS child_exists,
            coalesce(t.smtp_transport_id, '') AS smtp_transport_id,
            p.project_id AS project_id,
            coalesce(t.transport_name, '') AS transport_name,
            coalesce(t.host, '') AS host,
            coalesce(t.port, 0) AS port,
            coalesce(t.username, '') AS username,
            coalesce(t.encrypted_password, '') AS encrypted_password,
            coalesce(t.email_from, '') AS email_from,
            coalesce(t.email_from_name, '') AS email_from_name,
            coalesce(t.email_reply_to, '[]') AS email_reply_to,
            coalesce(t.created_at, ?3) AS created_at,
            coalesce(t.modified_at, ?3) AS modified_at
        FROM projects p
        LEFT OUTER JOIN smtp_transports t
            ON t.project_id = p.project_id AND t.smtp_transport_id = ?2
        WHERE p.project_id = ?1
        "#,
    )
    .bind(project_id)
    .bind(transport_id)
    .bind(EPOCH_SENTINEL)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    match row {
        None => Ok(Lookup::ParentMissing),
        Some(row) => row.into_lookup(TransportRow::into_transport),
    }
}

//
// groups
//

pub(crate) async fn insert_group(
    conn: &mut SqliteConnection,
    params: &NewGroup,
    now: Datetime,
) -> Result<Group> {
    let row: GroupRow = sqlx::query_as(
        r#"
        INSERT INTO template_groups (group_id, project_id, group_name, created_at, modified_at)
        VALUES (?1, ?2, ?3, ?4, ?4)
        RETURNING group_id, project_id, group_name, created_at, modified_at
        "#,
    )
    .bind(&params.group_id)
    .bind(&params.project_id)
    .bind(&params.name)
    .bind(now.to_db_string())
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match constraint_violation(&e) {
        Some(Constraint::ForeignKey) => StoreError::ProjectNotFound(Some(e.into())),
        Some(Constraint::Unique) => StoreError::GroupAlreadyExists(Some(e.into())),
        None => map_sqlx_error(e),
    })?;

    row.into_group()
}

pub(crate) async fn get_group(
    conn: &mut SqliteConnection,
    project_id: &str,
    group_id: &str,
) -> Result<Lookup<Group>> {
    let row: Option<Joined<GroupRow>> = sqlx::query_as(
        r#"
        SELECT
            (g.group_id IS NOT NULL) AS child_exists,
            coalesce(g.group_id, '') AS group_id,
            p.project_id AS project_id,
            coalesce(g.group_name, '') AS group_name,
            coalesce(g.created_at, ?3) AS created_at,
            coalesce(g.modified_at, ?3) AS modified_at
        FROM projects p
        LEFT OUTER JOIN template_groups g
            ON g.project_id = p.project_id AND g.group_id = ?2
        WHERE p.project_id = ?1
        "#,
    )
    .bind(project_id)
    .bind(group_id)
    .bind(EPOCH_SENTINEL)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    match row {
        None => Ok(Lookup::ParentMissing),
        Some(row) => row.into_lookup(GroupRow::into_group),
    }
}

//
// templates
//

pub(crate) async fn insert_template(
    conn: &mut SqliteConnection,
    params: &NewTemplate,
    now: Datetime,
) -> Result<Template> {
    let sql = format!(
        r#"
        INSERT INTO templates ({TEMPLATE_COLUMNS})
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
        RETURNING {TEMPLATE_COLUMNS}
        "#
    );

    let result = sqlx::query_as::<_, TemplateRow>(&sql)
        .bind(&params.template_id)
        .bind(&params.group_id)
        .bind(&params.project_id)
        .bind(&params.text)
        .bind(params.text_digest.as_str())
        .bind(&params.html)
        .bind(params.html_digest.as_str())
        .bind(now.to_db_string())
        .fetch_one(&mut *conn)
        .await;

    let row = match result {
        Ok(row) => row,
        Err(e) => {
            return Err(match constraint_violation(&e) {
                Some(Constraint::Unique) => StoreError::TemplateAlreadyExists(Some(e.into())),
                // The composite key does not say which parent is absent
                Some(Constraint::ForeignKey) => {
                    if project_exists(conn, &params.project_id).await? {
                        StoreError::GroupNotFound(Some(e.into()))
                    } else {
                        StoreError::ProjectNotFound(Some(e.into()))
                    }
                }
                None => map_sqlx_error(e),
            })
        }
    };

    row.into_template()
}

pub(crate) async fn get_template(
    conn: &mut SqliteConnection,
    project_id: &str,
    template_id: &str,
) -> Result<Lookup<Template>> {
    let row: Option<Joined<TemplateRow>> = sqlx::query_as(
        r#"
        SELECT
            (t.template_id IS NOT NULL) AS child_exists,
            coalesce(t.template_id, '') AS template_id,
            coalesce(t.group_id, '') AS group_id,
            p.project_id AS project_id,
            coalesce(t.txt, '') AS txt,
            coalesce(t.txt_digest, '') AS txt_digest,
            coalesce(t.html, '') AS html,
            coalesce(t.html_digest, '') AS html_digest,
            coalesce(t.created_at, ?3) AS created_at,
            coalesce(t.modified_at, ?3) AS modified_at
        FROM projects p
        LEFT OUTER JOIN templates t
            ON t.project_id = p.project_id AND t.template_id = ?2
        WHERE p.project_id = ?1
        "#,
    )
    .bind(project_id)
    .bind(template_id)
    .bind(EPOCH_SENTINEL)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    match row {
        None => Ok(Lookup::ParentMissing),
        Some(row) => row.into_lookup(TemplateRow::into_template),
    }
}

/// Project, group and template existence plus digest equality in one round trip
pub(crate) async fn probe_template(
    conn: &mut SqliteConnection,
    project_id: &str,
    group_id: &str,
    template_id: &str,
    text_digest: &ContentDigest,
    html_digest: &ContentDigest,
) -> Result<TemplateProbe> {
    let row: Option<ProbeRow> = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM template_groups g
                WHERE g.project_id = p.project_id AND g.group_id = ?2) AS group_exists,
            (t.template_id IS NOT NULL) AS template_exists,
            coalesce(t.group_id, '') AS group_id,
            coalesce(t.txt_digest = ?4, 0) AS text_digest_matches,
            coalesce(t.html_digest = ?5, 0) AS html_digest_matches,
            coalesce(t.created_at, ?6) AS created_at,
            coalesce(t.modified_at, ?6) AS modified_at
        FROM projects p
        LEFT OUTER JOIN templates t
            ON t.project_id = p.project_id AND t.template_id = ?3
        WHERE p.project_id = ?1
        "#,
    )
    .bind(project_id)
    .bind(group_id)
    .bind(template_id)
    .bind(text_digest.as_str())
    .bind(html_digest.as_str())
    .bind(EPOCH_SENTINEL)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    match row {
        None => Ok(TemplateProbe::ProjectMissing),
        Some(row) => row.into_probe(),
    }
}

pub(crate) async fn update_template(
    conn: &mut SqliteConnection,
    params: &NewTemplate,
    modified_at: Datetime,
) -> Result<Template> {
    let sql = format!(
        r#"
        UPDATE templates
        SET group_id = ?1, txt = ?2, txt_digest = ?3, html = ?4, html_digest = ?5, modified_at = ?6
        WHERE project_id = ?7 AND template_id = ?8
        RETURNING {TEMPLATE_COLUMNS}
        "#
    );

    let row: Option<TemplateRow> = sqlx::query_as(&sql)
        .bind(&params.group_id)
        .bind(&params.text)
        .bind(params.text_digest.as_str())
        .bind(&params.html)
        .bind(params.html_digest.as_str())
        .bind(modified_at.to_db_string())
        .bind(&params.project_id)
        .bind(&params.template_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| match constraint_violation(&e) {
            Some(Constraint::ForeignKey) => StoreError::GroupNotFound(Some(e.into())),
            _ => map_sqlx_error(e),
        })?;

    row.ok_or(StoreError::TemplateNotFound)?.into_template()
}
