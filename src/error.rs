//! Error type shared by every component of the crate.

use sea_orm::DbErr;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Domain failures of the roster service.
///
/// The gateway maps each variant to a fixed HTTP status; the `Display`
/// output of every variant except [`Error::Database`] is what the client sees.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(String),

    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    /// Unknown username or wrong password. Deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authorization header required (Token <token>)")]
    MissingHeader,

    #[error("token missing")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    ExpiredToken,

    #[error("student not found")]
    NotFound,

    /// Accumulating would push a student past the 100 mark ceiling.
    #[error("total marks would exceed 100 ({current} + {adding})")]
    MarksOverflow { current: i32, adding: i32 },

    /// Any failure of the underlying store.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
