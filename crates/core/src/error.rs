// Central Error Type for the Store
//
// A closed taxonomy: callers branch on `StoreError::code()`, never on message text.
// Low-level causes stay reachable through `std::error::Error::source`.

use thiserror::Error;

/// Boxed low-level cause kept for diagnostics
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Store-level error type
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("project not found")]
    ProjectNotFound(#[source] Option<BoxError>),

    #[error("project already exists")]
    ProjectAlreadyExists(#[source] Option<BoxError>),

    #[error("transport not found")]
    TransportNotFound,

    #[error("transport already exists")]
    TransportAlreadyExists(#[source] Option<BoxError>),

    #[error("group not found")]
    GroupNotFound(#[source] Option<BoxError>),

    #[error("group already exists")]
    GroupAlreadyExists(#[source] Option<BoxError>),

    #[error("template not found")]
    TemplateNotFound,

    #[error("template already exists")]
    TemplateAlreadyExists(#[source] Option<BoxError>),

    #[error("encryption config invalid: {0}")]
    EncryptionConfigInvalid(String),

    #[error("authentication failure: secret could not be decrypted")]
    AuthenticationFailure,

    #[error("storage unavailable: {message}")]
    StorageUnavailable {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("operation cancelled: {0}")]
    Cancelled(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("template source unreadable: {message}")]
    TemplateSourceUnreadable {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Stable, copyable error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ProjectNotFound,
    ProjectAlreadyExists,
    TransportNotFound,
    TransportAlreadyExists,
    GroupNotFound,
    GroupAlreadyExists,
    TemplateNotFound,
    TemplateAlreadyExists,
    EncryptionConfigInvalid,
    AuthenticationFailure,
    StorageUnavailable,
    Cancelled,
    InvalidConfig,
    TemplateSourceUnreadable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ProjectNotFound => "project_not_found",
            ErrorCode::ProjectAlreadyExists => "project_already_exists",
            ErrorCode::TransportNotFound => "transport_not_found",
            ErrorCode::TransportAlreadyExists => "transport_already_exists",
            ErrorCode::GroupNotFound => "group_not_found",
            ErrorCode::GroupAlreadyExists => "group_already_exists",
            ErrorCode::TemplateNotFound => "template_not_found",
            ErrorCode::TemplateAlreadyExists => "template_already_exists",
            ErrorCode::EncryptionConfigInvalid => "encryption_config_invalid",
            ErrorCode::AuthenticationFailure => "authentication_failure",
            ErrorCode::StorageUnavailable => "storage_unavailable",
            ErrorCode::Cancelled => "cancelled",
            ErrorCode::InvalidConfig => "invalid_config",
            ErrorCode::TemplateSourceUnreadable => "template_source_unreadable",
        }
    }

    /// Only storage-level failures are worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::StorageUnavailable)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::ProjectNotFound(_) => ErrorCode::ProjectNotFound,
            StoreError::ProjectAlreadyExists(_) => ErrorCode::ProjectAlreadyExists,
            StoreError::TransportNotFound => ErrorCode::TransportNotFound,
            StoreError::TransportAlreadyExists(_) => ErrorCode::TransportAlreadyExists,
            StoreError::GroupNotFound(_) => ErrorCode::GroupNotFound,
            StoreError::GroupAlreadyExists(_) => ErrorCode::GroupAlreadyExists,
            StoreError::TemplateNotFound => ErrorCode::TemplateNotFound,
            StoreError::TemplateAlreadyExists(_) => ErrorCode::TemplateAlreadyExists,
            StoreError::EncryptionConfigInvalid(_) => ErrorCode::EncryptionConfigInvalid,
            StoreError::AuthenticationFailure => ErrorCode::AuthenticationFailure,
            StoreError::StorageUnavailable { .. } => ErrorCode::StorageUnavailable,
            StoreError::Cancelled(_) => ErrorCode::Cancelled,
            StoreError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            StoreError::TemplateSourceUnreadable { .. } => ErrorCode::TemplateSourceUnreadable,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }

    /// Storage failure with an attached driver cause
    pub fn storage(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StoreError::StorageUnavailable {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}
