// Transport Domain Model

use super::Datetime;
use serde::{Deserialize, Serialize};

/// Outbound mail sending configuration scoped to a project.
///
/// `encrypted_password` is `hex(nonce) || hex(ciphertext)`; the plaintext never
/// reaches this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transport {
    pub transport_id: String,
    pub project_id: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub encrypted_password: String,
    pub email_from: String,
    pub email_from_name: String,
    pub email_reply_to: Vec<String>,
    pub created_at: Datetime,
    pub modified_at: Datetime,
}

/// Insert parameters; the caller encrypts the password beforehand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransport {
    pub transport_id: String,
    pub project_id: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub encrypted_password: String,
    pub email_from: String,
    pub email_from_name: String,
    pub email_reply_to: Vec<String>,
}

/// Decrypted connection details handed to a mail sender
#[derive(Clone, PartialEq, Eq)]
pub struct TransportCredentials {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub email_from: String,
    pub email_from_name: String,
    pub email_reply_to: Vec<String>,
}

impl std::fmt::Debug for TransportCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email_from", &self.email_from)
            .field("email_from_name", &self.email_from_name)
            .field("email_reply_to", &self.email_reply_to)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = TransportCredentials {
            host: "smtp.example.com".into(),
            port: 587,
            username: "mailer".into(),
            password: "hunter2".into(),
            email_from: "noreply@example.com".into(),
            email_from_name: "Example".into(),
            email_reply_to: vec![],
        };

        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
