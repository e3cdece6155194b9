#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown schema catalog: {0}")]
    UnknownCatalog(String),

    #[error("Invalid schema catalog: {0}")]
    InvalidCatalog(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
