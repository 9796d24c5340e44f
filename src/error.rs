use thiserror::Error;

use crate::config::ConfigError;
use crate::director::ManagerError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Director(#[from] ManagerError),

    /// Infrastructure output lookup failed
    #[error(transparent)]
    Outputs(anyhow::Error),

    #[error("no lbs found")]
    NoLbs,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
