//! # Directrix
//!
//! Stands up and tears down BOSH directors on top of provisioned AWS or GCP
//! infrastructure, keeping the director's state, manifest and credentials in
//! a persisted environment record.
//!
//! ## Usage
//!
//! ```bash
//! directrix [--state-dir DIR] create-director
//! directrix [--state-dir DIR] delete-director
//! directrix [--state-dir DIR] lbs [--json]
//! ```
//!
//! ## Modules
//!
//! - `commands` - CLI-facing orchestration on top of the director manager
//! - `config` - Layered configuration (defaults, YAML file, environment)
//! - `director` - Director lifecycle manager, interpolation inputs and the BOSH CLI executor
//! - `infrastructure` - Stack description and terraform output sources
//! - `storage` - Persisted environment record and its JSON state file
//! - `subprocess` - Process runner abstraction for the external CLIs
//! - `testing` - Recording fakes of the manager's collaborators
pub mod commands;
pub mod config;
pub mod director;
pub mod error;
pub mod infrastructure;
pub mod storage;
pub mod subprocess;

pub mod testing;

pub use error::{Error, Result};
