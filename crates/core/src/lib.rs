// Mailroom Core - Domain Logic & Ports
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use config::{MailerConfig, StoreConfig};
pub use error::{ErrorCode, Result, StoreError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
