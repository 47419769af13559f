use thiserror::Error;

/// Coarse error category used by the transport layer to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied input that violates a policy
    Validation,
    /// A uniqueness constraint was violated
    Conflict,
    /// The addressed record does not exist
    NotFound,
    /// Credentials or token were rejected
    Unauthenticated,
    /// Caller is authenticated but not allowed to act on the record
    Forbidden,
    /// Storage or infrastructure fault
    Repository,
    /// Hashing, signing or configuration fault
    Internal,
}

/// Core domain errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("{message}")]
    InvalidUsername { message: String },

    #[error("{message}")]
    InvalidPassword { message: String },

    #[error("title is required")]
    TitleRequired,

    #[error("username already taken")]
    UsernameTaken { username: String },

    #[error("film with title '{title}' already exists")]
    DuplicateTitle { title: String },

    /// Raw uniqueness signal raised by a store, translated by the services
    #[error("Duplicate key on '{field}'")]
    DuplicateKey { field: String },

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("film not found")]
    FilmNotFound { id: i64 },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Hashing error: {message}")]
    Hashing { message: String },

    #[error("Token signing error: {message}")]
    TokenSigning { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_username(message: impl Into<String>) -> Self {
        Self::InvalidUsername {
            message: message.into(),
        }
    }

    pub fn invalid_password(message: impl Into<String>) -> Self {
        Self::InvalidPassword {
            message: message.into(),
        }
    }

    pub fn username_taken(username: impl Into<String>) -> Self {
        Self::UsernameTaken {
            username: username.into(),
        }
    }

    pub fn duplicate_title(title: impl Into<String>) -> Self {
        Self::DuplicateTitle {
            title: title.into(),
        }
    }

    pub fn duplicate_key(field: impl Into<String>) -> Self {
        Self::DuplicateKey {
            field: field.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn film_not_found(id: i64) -> Self {
        Self::FilmNotFound { id }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }

    pub fn token_signing(message: impl Into<String>) -> Self {
        Self::TokenSigning {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUsername { .. }
            | Self::InvalidPassword { .. }
            | Self::TitleRequired => ErrorKind::Validation,
            Self::UsernameTaken { .. }
            | Self::DuplicateTitle { .. }
            | Self::DuplicateKey { .. } => ErrorKind::Conflict,
            Self::FilmNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidCredentials => ErrorKind::Unauthenticated,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Storage { .. } => ErrorKind::Repository,
            Self::Hashing { .. }
            | Self::TokenSigning { .. }
            | Self::Configuration { .. }
            | Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Whether the message is safe to show to the caller
    pub fn is_client_facing(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Repository | ErrorKind::Internal)
    }
}
