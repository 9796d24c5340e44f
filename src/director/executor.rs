//! Contract of the tool that renders and deploys the director

use async_trait::async_trait;

use super::input::InterpolateInput;
use crate::storage::DirectorState;

/// Rendered manifest and the variables (credentials, certificates) it references
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterpolateOutput {
    pub manifest: String,
    pub variables: serde_yaml::Mapping,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateEnvInput {
    pub manifest: String,
    pub state: DirectorState,
    pub variables: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateEnvOutput {
    pub state: DirectorState,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteEnvInput {
    pub manifest: String,
    pub state: DirectorState,
    pub variables: String,
}

#[async_trait]
pub trait Executor: Send + Sync {
    async fn interpolate(&self, input: InterpolateInput) -> anyhow::Result<InterpolateOutput>;
    async fn create_env(&self, input: CreateEnvInput) -> anyhow::Result<CreateEnvOutput>;
    async fn delete_env(&self, input: DeleteEnvInput) -> anyhow::Result<()>;
}
