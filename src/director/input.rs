//! Interpolation input assembly
//!
//! Maps a persisted record plus the matching infrastructure outputs onto the
//! descriptor handed to [`Executor::interpolate`](super::Executor::interpolate).
//! Everything here is pure: the same record and outputs always produce the
//! same descriptor.

use serde::Serialize;

use crate::infrastructure::{StackDescription, TerraformOutputs};
use crate::storage::{DirectorState, Iaas, State};

/// CloudFormation output keys read for AWS directors
pub mod stack_outputs {
    pub const SUBNET_AZ: &str = "BOSHSubnetAZ";
    pub const ACCESS_KEY: &str = "BOSHUserAccessKey";
    pub const SECRET_ACCESS_KEY: &str = "BOSHUserSecretAccessKey";
    pub const SECURITY_GROUP: &str = "BOSHSecurityGroup";
    pub const SUBNET: &str = "BOSHSubnet";
    pub const ELASTIC_IP: &str = "BOSHEIP";
    pub const DIRECTOR_URL: &str = "BOSHURL";
}

/// Outputs fetched from whichever source matches the record's infrastructure
#[derive(Debug, Clone, PartialEq)]
pub enum InfrastructureOutputs {
    Gcp(TerraformOutputs),
    Aws(StackDescription),
}

impl InfrastructureOutputs {
    /// Address the director will be reachable at.
    pub fn director_address(&self) -> String {
        match self {
            InfrastructureOutputs::Gcp(outputs) => outputs.director_address.clone(),
            InfrastructureOutputs::Aws(stack) => stack.output(stack_outputs::DIRECTOR_URL),
        }
    }
}

/// Descriptor for rendering the director manifest
///
/// The serialized form is the vars file handed to the interpolation tool, so
/// the prior director state, prior variables and private key are left out of
/// it; executors pass those separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpolateInput {
    pub director_name: String,
    #[serde(skip)]
    pub private_key: String,
    #[serde(skip)]
    pub bosh_state: DirectorState,
    #[serde(skip)]
    pub variables: String,
    #[serde(flatten)]
    pub infrastructure: InfrastructureInput,
}

impl InterpolateInput {
    pub fn iaas(&self) -> Iaas {
        self.infrastructure.iaas()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "iaas", rename_all = "lowercase")]
pub enum InfrastructureInput {
    Gcp(GcpInput),
    Aws(AwsInput),
}

impl InfrastructureInput {
    pub fn iaas(&self) -> Iaas {
        match self {
            InfrastructureInput::Gcp(_) => Iaas::Gcp,
            InfrastructureInput::Aws(_) => Iaas::Aws,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GcpInput {
    pub zone: String,
    pub network: String,
    pub subnetwork: String,
    pub tags: Vec<String>,
    pub project_id: String,
    pub external_ip: String,
    #[serde(rename = "gcp_credentials_json")]
    pub credentials_json: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AwsInput {
    pub az: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub default_key_name: String,
    pub default_security_groups: Vec<String>,
    pub subnet_id: String,
    pub external_ip: String,
}

/// Build the interpolation descriptor for `state` from its infrastructure outputs.
pub fn interpolate_input(state: &State, outputs: &InfrastructureOutputs) -> InterpolateInput {
    let infrastructure = match outputs {
        InfrastructureOutputs::Gcp(outputs) => InfrastructureInput::Gcp(gcp_input(state, outputs)),
        InfrastructureOutputs::Aws(stack) => InfrastructureInput::Aws(aws_input(state, stack)),
    };

    InterpolateInput {
        director_name: state.director_name(),
        private_key: state.key_pair.private_key.clone(),
        bosh_state: state.bosh.state.clone(),
        variables: state.bosh.variables.clone(),
        infrastructure,
    }
}

fn gcp_input(state: &State, outputs: &TerraformOutputs) -> GcpInput {
    GcpInput {
        zone: state.gcp.zone.clone(),
        network: outputs.network_name.clone(),
        subnetwork: outputs.subnetwork_name.clone(),
        tags: vec![outputs.bosh_tag.clone(), outputs.internal_tag.clone()],
        project_id: state.gcp.project_id.clone(),
        external_ip: outputs.external_ip.clone(),
        credentials_json: state.gcp.service_account_key.clone(),
    }
}

fn aws_input(state: &State, stack: &StackDescription) -> AwsInput {
    AwsInput {
        az: stack.output(stack_outputs::SUBNET_AZ),
        access_key_id: stack.output(stack_outputs::ACCESS_KEY),
        secret_access_key: stack.output(stack_outputs::SECRET_ACCESS_KEY),
        region: state.aws.region.clone(),
        default_key_name: state.key_pair.name.clone(),
        default_security_groups: vec![stack.output(stack_outputs::SECURITY_GROUP)],
        subnet_id: stack.output(stack_outputs::SUBNET),
        external_ip: stack.output(stack_outputs::ELASTIC_IP),
    }
}
