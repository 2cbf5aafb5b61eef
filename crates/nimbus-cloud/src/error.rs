//! Console client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Authentication failed for {0}")]
    AuthenticationFailed(String),

    #[error("Console API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Backend not found: {0}")]
    BackendNotFound(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Machine not found: {machine_id} (backend {backend_id})")]
    MachineNotFound {
        backend_id: String,
        machine_id: String,
    },

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
