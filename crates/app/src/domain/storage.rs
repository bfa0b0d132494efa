//! Storage failure classification shared by the domain services.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};

/// A storage error the services translate into a domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StorageFault {
    /// No row matched.
    NotFound,

    /// A unique constraint fired.
    Duplicate,

    /// A foreign key pointed nowhere.
    DanglingReference,

    /// A `NOT NULL` column received nothing.
    MissingValue,

    /// A check constraint fired, or a stored value did not fit its Rust type.
    Rejected,
}

impl StorageFault {
    /// `None` for connection, pool, protocol and other unexpected failures.
    pub(crate) fn classify(error: &Error) -> Option<Self> {
        match error {
            Error::RowNotFound => return Some(Self::NotFound),
            Error::ColumnDecode { .. } => return Some(Self::Rejected),
            _ => {}
        }

        match error.as_database_error().map(DatabaseError::kind)? {
            ErrorKind::UniqueViolation => Some(Self::Duplicate),
            ErrorKind::ForeignKeyViolation => Some(Self::DanglingReference),
            ErrorKind::NotNullViolation => Some(Self::MissingValue),
            ErrorKind::CheckViolation => Some(Self::Rejected),
            _ => None,
        }
    }
}
