//! Persisted environment record and its on-disk store

pub mod error;
pub mod state;
pub mod store;


pub use error::{StorageError, StorageResult};
pub use state::{Aws, Bosh, DirectorState, Gcp, Iaas, KeyPair, Lb, Stack, State, STATE_VERSION};
pub use store::{StateStore, STATE_FILE};
