//! Subprocess abstraction used by the process-backed collaborators
//!
//! Terraform, the AWS CLI and the BOSH CLI are all driven through
//! [`ProcessRunner`], so every collaborator can be exercised against
//! [`MockProcessRunner`] in tests.

pub mod error;
pub mod mock;
pub mod runner;


pub use error::ProcessError;
pub use mock::{MockProcessRunner, MockResponse};
pub use runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};

use std::sync::Arc;

/// Production runner shared by all collaborators
pub fn production_runner() -> Arc<dyn ProcessRunner> {
    Arc::new(TokioProcessRunner)
}
