// Application Layer - Use Cases and Business Logic

pub mod cancellation;
pub mod coordinator;
pub mod mailer;
pub mod template_versioner;

// Re-exports
pub use cancellation::{cancel_channel, with_cancellation, with_deadline, CancelSender, CancelToken};
pub use coordinator::run_atomic;
pub use mailer::{MailerService, NewTransportRequest, SendEmailError, SendEmailRequest};
