use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Wraps an adapter-specific failure (e.g. a database error) without the
    /// trait layer depending on the adapter's error type.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend(err.to_string())
    }
}
