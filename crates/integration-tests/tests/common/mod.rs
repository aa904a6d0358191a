//! Shared fixtures: a throwaway database file and a manually driven clock

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use mailroom::{MailerConfig, Mailroom, NewTransportRequest};
use mailroom_core::domain::Datetime;
use mailroom_core::port::ManualClock;
use std::sync::Arc;
use tempfile::TempDir;

pub const KEY: &str = "000102030405060708090a0b0c0d0e0f";

pub struct TestEnv {
    pub mailroom: Mailroom,
    pub clock: Arc<ManualClock>,
    // Held so the database file outlives the test
    pub dir: TempDir,
}

pub fn start_time() -> Datetime {
    Datetime::from_utc(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
}

pub fn config_for(dir: &TempDir) -> MailerConfig {
    MailerConfig {
        db_path: dir.path().join("mailer.db"),
        read_pool_size: 16,
        encryption_key: KEY.to_string(),
        ..Default::default()
    }
}

pub async fn setup() -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(start_time()));
    let mailroom = Mailroom::open_with_clock(&config_for(&dir), clock.clone())
        .await
        .unwrap();

    TestEnv {
        mailroom,
        clock,
        dir,
    }
}

/// Project p1 with group g1
pub async fn setup_with_group() -> TestEnv {
    let env = setup().await;
    let service = env.mailroom.service();
    service.create_project("p1", "Project One", "").await.unwrap();
    service.create_group("g1", "p1", "Welcome").await.unwrap();
    env
}

pub fn transport_request(project_id: &str, password: &str) -> NewTransportRequest {
    NewTransportRequest {
        transport_id: "smtp1".into(),
        project_id: project_id.into(),
        name: "Primary".into(),
        host: "smtp.example.com".into(),
        port: 587,
        username: "mailer".into(),
        password: password.into(),
        email_from: "noreply@example.com".into(),
        email_from_name: "Example".into(),
        email_reply_to: vec!["support@example.com".into()],
    }
}

pub async fn count_rows(env: &TestEnv, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(env.mailroom.store().pools().reader())
        .await
        .unwrap()
}
