//! Command implementations behind the CLI

pub mod director;
pub mod lbs;

pub use director::{create_director, delete_director};
pub use lbs::{lbs, LbReport};

use std::sync::Arc;

use crate::config::DirectrixConfig;
use crate::director::{BoshCliExecutor, Manager};
use crate::infrastructure::{AwsStackManager, TerraformCli};
use crate::storage::State;
use crate::subprocess::ProcessRunner;

/// Terraform output provider configured from `config`
pub fn terraform(config: &DirectrixConfig, runner: Arc<dyn ProcessRunner>) -> TerraformCli {
    TerraformCli::new(runner, config.terraform_path.clone()).with_timeout(config.command_timeout())
}

/// Director manager wired to the real CLIs
///
/// The stack manager authenticates with the AWS credentials recorded in `state`.
pub fn build_manager(
    config: &DirectrixConfig,
    state: &State,
    runner: Arc<dyn ProcessRunner>,
) -> Manager {
    let timeout = config.command_timeout();

    let executor = BoshCliExecutor::new(
        Arc::clone(&runner),
        config.bosh_path.clone(),
        config.bosh_deployment_dir.clone(),
    )
    .with_timeout(timeout);
    let stacks = AwsStackManager::new(
        Arc::clone(&runner),
        config.aws_path.clone(),
        state.aws.clone(),
    )
    .with_timeout(timeout);

    Manager::new(
        Arc::new(executor),
        Arc::new(terraform(config, runner)),
        Arc::new(stacks),
    )
}
