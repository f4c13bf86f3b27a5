use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Email already registered")]
    AlreadyRegistered,

    /// A storage-level uniqueness constraint rejected a write.
    #[error("Conflicting record")]
    Conflict,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    DatabaseError,
    InvalidInput,
    AlreadyRegistered,
    Conflict,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::AlreadyRegistered => "ALREADY_REGISTERED",
            ErrorCode::Conflict => "CONFLICT",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
