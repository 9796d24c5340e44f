//! Director lifecycle management
//!
//! [`Manager`] turns a persisted record plus infrastructure outputs into the
//! inputs for rendering and deploying a BOSH director, then folds the results
//! back into a new record:
//!
//! 1. pick the output source for the record's infrastructure kind
//! 2. assemble an [`InterpolateInput`] from the record and the outputs
//! 3. interpolate the manifest, create the environment
//! 4. return a copy of the record with the director sub-record replaced
//!
//! The rendering and deployment themselves are behind [`Executor`];
//! [`BoshCliExecutor`] drives the `bosh` CLI.

pub mod bosh_cli;
pub mod executor;
pub mod input;
pub mod manager;
pub mod variables;


pub use bosh_cli::BoshCliExecutor;
pub use executor::{
    CreateEnvInput, CreateEnvOutput, DeleteEnvInput, Executor, InterpolateOutput,
};
pub use input::{
    interpolate_input, AwsInput, GcpInput, InfrastructureInput, InfrastructureOutputs,
    InterpolateInput,
};
pub use manager::{Manager, ManagerError};
pub use variables::{DirectorCredentials, DIRECTOR_USERNAME};
