//! Error types for Matricula

use thiserror::Error;

/// Result type alias using Matricula's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Matricula error types
#[derive(Error, Debug)]
pub enum Error {
    // Domain errors
    #[error("No result found for this search")]
    NotFound,

    #[error("Invalid data: {}", .0.join(", "))]
    InvalidData(Vec<String>),

    #[error("CEP does not exist")]
    InvalidCep,

    // Lookup errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address lookup failed: {0}")]
    Lookup(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound => "E001",
            Error::InvalidData(_) => "E002",
            Error::InvalidCep => "E003",
            Error::Network(_) => "E100",
            Error::Lookup(_) => "E101",
            Error::Database(_) => "E200",
            Error::Parse(_) => "E201",
            Error::Config(_) => "E300",
            Error::Io(_) => "E900",
            Error::Other(_) => "E999",
        }
    }

    /// Get a suggestion for how to resolve this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Error::InvalidCep => Some("Double-check the CEP digits".to_string()),
            Error::Network(_) => {
                Some("Check your internet connection and try again".to_string())
            }
            Error::Database(_) => {
                Some("Run `matricula doctor` to check database health".to_string())
            }
            Error::Config(_) => {
                Some("Run `matricula config path` to locate the config file".to_string())
            }
            _ => None,
        }
    }
}
