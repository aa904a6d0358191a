//! Mailroom - embedded store for projects, mail transports, template groups
//! and versioned templates, with encrypted transport credentials.
//!
//! [`Mailroom::open`] wires the SQLite store, the credential cipher and the
//! [`MailerService`] from one validated [`MailerConfig`].

mod app;
pub mod logging;

pub use app::{Mailroom, CIPHER_MODE};
pub use logging::{init_logging, init_logging_with_file, LogFormat};

pub use mailroom_core::application::{
    with_deadline, MailerService, NewTransportRequest, SendEmailError, SendEmailRequest,
};
pub use mailroom_core::{ErrorCode, MailerConfig, Result, StoreConfig, StoreError};
