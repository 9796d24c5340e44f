//! Persisted environment record
//!
//! `State` is the durable representation of one deployed environment. It is
//! written as JSON by [`StateStore`](super::StateStore) and passed by value
//! through the director manager, which never mutates it in place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque director state owned by the BOSH CLI.
///
/// Round-tripped across create/delete cycles without interpretation.
pub type DirectorState = serde_json::Map<String, serde_json::Value>;

/// Current persisted record version
pub const STATE_VERSION: u32 = 3;

/// Infrastructure backend an environment is deployed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Iaas {
    Aws,
    Gcp,
}

impl Iaas {
    pub fn as_str(&self) -> &'static str {
        match self {
            Iaas::Aws => "aws",
            Iaas::Gcp => "gcp",
        }
    }
}

impl fmt::Display for Iaas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported infrastructure kind: {0:?}")]
pub struct UnknownIaas(pub String);

impl FromStr for Iaas {
    type Err = UnknownIaas;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aws" => Ok(Iaas::Aws),
            "gcp" => Ok(Iaas::Gcp),
            other => Err(UnknownIaas(other.to_string())),
        }
    }
}

/// Persisted environment record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct State {
    pub version: u32,
    /// Kept as the raw persisted string; parsed with [`State::iaas_kind`].
    pub iaas: String,
    #[serde(rename = "envID")]
    pub env_id: String,
    pub key_pair: KeyPair,
    pub aws: Aws,
    pub gcp: Gcp,
    pub stack: Stack,
    pub bosh: Bosh,
    pub tf_state: String,
    pub lb: Lb,
}

impl State {
    /// Parse the persisted infrastructure kind, `None` when empty or unknown.
    pub fn iaas_kind(&self) -> Option<Iaas> {
        self.iaas.parse().ok()
    }

    /// Copy of this record with the director sub-record replaced.
    pub fn with_bosh(&self, bosh: Bosh) -> State {
        State {
            bosh,
            ..self.clone()
        }
    }

    /// Name the director of this environment is deployed under.
    pub fn director_name(&self) -> String {
        format!("bosh-{}", self.env_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyPair {
    pub name: String,
    pub private_key: String,
    pub public_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Aws {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Gcp {
    pub service_account_key: String,
    #[serde(rename = "projectID")]
    pub project_id: String,
    pub zone: String,
    pub region: String,
}

/// CloudFormation stack backing an AWS environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stack {
    pub name: String,
    pub lb_type: String,
    pub certificate_name: String,
    #[serde(rename = "bhAZ")]
    pub bosh_az: String,
}

/// Load balancer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lb {
    #[serde(rename = "type")]
    pub lb_type: String,
    pub cert: String,
    pub key: String,
    pub chain: String,
    pub domain: String,
}

/// Director sub-record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bosh {
    pub director_name: String,
    pub director_username: String,
    pub director_password: String,
    pub director_address: String,
    #[serde(rename = "directorSSLCA")]
    pub director_ssl_ca: String,
    #[serde(rename = "directorSSLCertificate")]
    pub director_ssl_certificate: String,
    #[serde(rename = "directorSSLPrivateKey")]
    pub director_ssl_private_key: String,
    pub state: DirectorState,
    pub variables: String,
    pub manifest: String,
}

impl Bosh {
    pub fn is_empty(&self) -> bool {
        *self == Bosh::default()
    }
}
