// Composition Root - Dependency wiring

use mailroom_core::application::MailerService;
use mailroom_core::config::MailerConfig;
use mailroom_core::error::Result;
use mailroom_core::port::{SystemTimeProvider, TimeProvider};
use mailroom_infra_secrets::{CipherMode, CredentialCipher};
use mailroom_infra_sqlite::{open_pools, run_migrations, SqliteStore, StorePools};
use std::sync::Arc;
use tracing::info;

/// The only supported credential cipher
pub const CIPHER_MODE: CipherMode = CipherMode::AesGcmRandomNonce;

/// An opened store with its service
pub struct Mailroom {
    pools: StorePools,
    store: Arc<SqliteStore>,
    service: MailerService,
}

impl Mailroom {
    /// Open with the system clock
    pub async fn open(config: &MailerConfig) -> Result<Self> {
        Self::open_with_clock(config, Arc::new(SystemTimeProvider)).await
    }

    /// Validate the config, open both pools, provision the schema and build the service
    pub async fn open_with_clock(
        config: &MailerConfig,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Result<Self> {
        config.validate()?;

        // Cipher first: a bad key must not leave a database file behind
        let cipher = Arc::new(CredentialCipher::new(
            CIPHER_MODE,
            &config.encryption_key_bytes()?,
        )?);

        info!(db_path = %config.db_path.display(), "Initializing database...");
        let pools = open_pools(&config.store_config()).await?;
        if let Err(e) = run_migrations(pools.writer()).await {
            pools.close().await;
            return Err(e);
        }

        let store = Arc::new(SqliteStore::new(pools.clone(), Arc::clone(&time_provider)));
        let service = MailerService::new(store.clone(), store.clone(), cipher, time_provider);

        info!("Mailroom v{} ready", mailroom_core::VERSION);
        Ok(Self {
            pools,
            store,
            service,
        })
    }

    pub fn service(&self) -> &MailerService {
        &self.service
    }

    /// Repository access below the service layer
    pub fn store(&self) -> Arc<SqliteStore> {
        Arc::clone(&self.store)
    }

    /// Release both database handles
    pub async fn close(self) {
        self.pools.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailroom_core::error::ErrorCode;

    fn config(dir: &tempfile::TempDir, key: &str) -> MailerConfig {
        MailerConfig {
            db_path: dir.path().join("mailer.db"),
            encryption_key: key.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_open_provisions_schema() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir, "000102030405060708090a0b0c0d0e0f");

        let mailroom = Mailroom::open(&cfg).await.unwrap();
        let project = mailroom.service().create_project("p1", "One", "").await.unwrap();
        assert_eq!(project.project_id, "p1");
        mailroom.close().await;

        // Reopen: migrations are skipped and data survives
        let mailroom = Mailroom::open(&cfg).await.unwrap();
        assert!(mailroom.service().get_project("p1").await.is_ok());
        mailroom.close().await;
    }

    #[tokio::test]
    async fn test_bad_key_fails_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir, "0001");

        let err = Mailroom::open(&cfg).await.err().unwrap();
        assert_eq!(err.code(), ErrorCode::EncryptionConfigInvalid);
        assert!(!dir.path().join("mailer.db").exists());
    }
}
