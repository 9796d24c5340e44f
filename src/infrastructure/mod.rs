//! Infrastructure output sources
//!
//! Two interchangeable sources answer "what did provisioning produce?":
//!
//! - [`StackManager`] describes a CloudFormation stack by name (AWS)
//! - [`TerraformOutputProvider`] reads outputs from an opaque terraform state (GCP)
//!
//! The director manager picks one per record based on its infrastructure kind.

pub mod cloudformation;
pub mod terraform;

pub use cloudformation::AwsStackManager;
pub use terraform::TerraformCli;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outputs of a described CloudFormation stack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackDescription {
    pub name: String,
    pub status: String,
    pub outputs: HashMap<String, String>,
}

impl StackDescription {
    /// Output value by key, empty when the stack does not export it.
    pub fn output(&self, key: &str) -> String {
        self.outputs.get(key).cloned().unwrap_or_default()
    }
}

#[async_trait]
pub trait StackManager: Send + Sync {
    async fn describe(&self, stack_name: &str) -> anyhow::Result<StackDescription>;
}

/// Raw terraform outputs keyed by output name
pub type OutputMap = HashMap<String, serde_json::Value>;

/// Terraform outputs the director needs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerraformOutputs {
    pub network_name: String,
    pub subnetwork_name: String,
    pub bosh_tag: String,
    pub internal_tag: String,
    pub external_ip: String,
    pub director_address: String,
}

impl TerraformOutputs {
    /// Pick the director outputs out of a raw output map; missing keys stay empty.
    pub fn from_outputs(outputs: &OutputMap) -> Self {
        let string = |key: &str| {
            outputs
                .get(key)
                .and_then(|value| value.as_str())
                .unwrap_or_default()
                .to_string()
        };

        Self {
            network_name: string("network_name"),
            subnetwork_name: string("subnetwork_name"),
            bosh_tag: string("bosh_open_tag_name"),
            internal_tag: string("internal_tag_name"),
            external_ip: string("external_ip"),
            director_address: string("director_address"),
        }
    }
}

#[async_trait]
pub trait TerraformOutputProvider: Send + Sync {
    /// All outputs recorded in `tf_state`.
    async fn get_outputs(&self, tf_state: &str) -> anyhow::Result<OutputMap>;

    /// Director outputs for an environment fronted by `lb_type` load balancers.
    async fn get(&self, tf_state: &str, lb_type: &str) -> anyhow::Result<TerraformOutputs> {
        tracing::debug!("Reading director outputs (lb type {:?})", lb_type);
        let outputs = self.get_outputs(tf_state).await?;
        Ok(TerraformOutputs::from_outputs(&outputs))
    }
}
