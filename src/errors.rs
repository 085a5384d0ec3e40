//! Error types for the object pools

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Rejected construction parameters. No pool is created and no callback runs.
    #[error("Invalid pool parameters: {0}")]
    InvalidParameters(&'static str),

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Pool has been closed")]
    Closed,
}

pub type PoolResult<T> = Result<T, PoolError>;
