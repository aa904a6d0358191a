// Port Layer - Interfaces for external dependencies

pub mod cipher;
pub mod mail; // Downstream collaborators (interfaces only)
pub mod repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use cipher::SecretCipher;
pub use mail::{MailSender, OutboundEmail, TemplateRenderer};
pub use repository::{
    GroupRepository, ProjectRepository, Repository, TemplateRepository, TransportRepository,
};
pub use time_provider::{ManualClock, SystemTimeProvider, TimeProvider};
pub use transaction::{RepositoryTransaction, Transaction, TransactionalRepository};
