//! # Error Handling
//!
//! Crate-level error type. Trust resolution failures keep their own
//! [`TrustError`] type and are carried unchanged inside [`Error::Trust`].

mod trust;

pub use trust::{AccessError, TrustError};

/// Custom result type for backend-trust operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for building backend client configurations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Trust material was requested but could not be obtained
    #[error(transparent)]
    Trust(#[from] TrustError),

    /// Invalid settings
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The provider descriptor could not be decoded
    #[error("Invalid provider descriptor: {message}")]
    Descriptor { message: String },

    /// The HTTP transport could not be assembled
    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a new descriptor error
    pub fn descriptor<S: Into<String>>(message: S) -> Self {
        Self::Descriptor { message: message.into() }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Borrow the trust failure, if this error is one.
    pub fn as_trust(&self) -> Option<&TrustError> {
        match self {
            Self::Trust(err) => Some(err),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::config(err.to_string())
    }
}
