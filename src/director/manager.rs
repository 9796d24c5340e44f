use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::executor::{CreateEnvInput, DeleteEnvInput, Executor};
use super::input::{interpolate_input, InfrastructureOutputs};
use super::variables::{self, DirectorCredentials};
use crate::infrastructure::{StackManager, TerraformOutputProvider};
use crate::storage::{Bosh, Iaas, State};

/// Failure of a director lifecycle operation
///
/// Collaborator failures are transparent: the message is exactly the one the
/// collaborator produced, the variant only records which step failed.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("no valid infrastructure kind provided")]
    InvalidIaas,

    #[error(transparent)]
    Outputs(anyhow::Error),

    #[error(transparent)]
    Interpolate(anyhow::Error),

    #[error(transparent)]
    Variables(#[from] serde_yaml::Error),

    #[error(transparent)]
    CreateEnv(anyhow::Error),

    #[error(transparent)]
    DeleteEnv(anyhow::Error),
}

/// Creates and deletes the director of an environment
#[derive(Clone)]
pub struct Manager {
    executor: Arc<dyn Executor>,
    terraform: Arc<dyn TerraformOutputProvider>,
    stacks: Arc<dyn StackManager>,
}

impl Manager {
    pub fn new(
        executor: Arc<dyn Executor>,
        terraform: Arc<dyn TerraformOutputProvider>,
        stacks: Arc<dyn StackManager>,
    ) -> Self {
        Self {
            executor,
            terraform,
            stacks,
        }
    }

    /// Deploy (or update) the director described by `state`.
    ///
    /// Returns a copy of `state` whose director sub-record holds the new
    /// director state, manifest, variables and credentials. On failure no
    /// record is produced and the caller keeps the one it has.
    pub async fn create(&self, state: &State) -> Result<State, ManagerError> {
        let iaas = state.iaas_kind().ok_or(ManagerError::InvalidIaas)?;

        let outputs = self
            .infrastructure_outputs(iaas, state)
            .await
            .map_err(ManagerError::Outputs)?;

        let input = interpolate_input(state, &outputs);
        let director_name = input.director_name.clone();

        info!("Generating manifest for director {}", director_name);
        let interpolated = self
            .executor
            .interpolate(input)
            .await
            .map_err(ManagerError::Interpolate)?;

        let variables = variables::to_yaml(&interpolated.variables)?;
        let credentials = DirectorCredentials::from_variables(&interpolated.variables);

        info!("Creating director {}", director_name);
        let created = self
            .executor
            .create_env(CreateEnvInput {
                manifest: interpolated.manifest.clone(),
                state: state.bosh.state.clone(),
                variables: variables.clone(),
            })
            .await
            .map_err(ManagerError::CreateEnv)?;

        info!("Director {} created", director_name);
        Ok(state.with_bosh(Bosh {
            director_name,
            director_username: credentials.username,
            director_password: credentials.password,
            director_address: outputs.director_address(),
            director_ssl_ca: credentials.ssl_ca,
            director_ssl_certificate: credentials.ssl_certificate,
            director_ssl_private_key: credentials.ssl_private_key,
            state: created.state,
            variables,
            manifest: interpolated.manifest,
        }))
    }

    /// Tear down the director recorded in `state`.
    ///
    /// Driven purely by the persisted director sub-record; clearing it
    /// afterwards is left to the caller.
    pub async fn delete(&self, state: &State) -> Result<(), ManagerError> {
        info!("Deleting director {}", state.bosh.director_name);
        self.executor
            .delete_env(DeleteEnvInput {
                manifest: state.bosh.manifest.clone(),
                state: state.bosh.state.clone(),
                variables: state.bosh.variables.clone(),
            })
            .await
            .map_err(ManagerError::DeleteEnv)
    }

    async fn infrastructure_outputs(
        &self,
        iaas: Iaas,
        state: &State,
    ) -> anyhow::Result<InfrastructureOutputs> {
        match iaas {
            Iaas::Gcp => {
                debug!("Reading terraform outputs");
                let outputs = self.terraform.get(&state.tf_state, &state.lb.lb_type).await?;
                Ok(InfrastructureOutputs::Gcp(outputs))
            }
            Iaas::Aws => {
                debug!("Describing stack {}", state.stack.name);
                let stack = self.stacks.describe(&state.stack.name).await?;
                Ok(InfrastructureOutputs::Aws(stack))
            }
        }
    }
}
