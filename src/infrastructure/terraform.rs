//! Terraform-backed output provider

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::{OutputMap, TerraformOutputProvider};
use crate::subprocess::{ProcessCommand, ProcessRunner};

const STATE_FILE: &str = "terraform.tfstate";

#[derive(Debug, Deserialize)]
struct RawOutput {
    value: serde_json::Value,
}

/// Reads outputs by running `terraform output -json` against a state blob
pub struct TerraformCli {
    runner: Arc<dyn ProcessRunner>,
    terraform_path: String,
    timeout: Option<Duration>,
}

impl TerraformCli {
    pub fn new(runner: Arc<dyn ProcessRunner>, terraform_path: impl Into<String>) -> Self {
        Self {
            runner,
            terraform_path: terraform_path.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn parse_outputs(stdout: &str) -> Result<OutputMap> {
        let raw: HashMap<String, RawOutput> =
            serde_json::from_str(stdout).context("Failed to parse terraform outputs")?;
        Ok(raw.into_iter().map(|(k, v)| (k, v.value)).collect())
    }
}

#[async_trait]
impl TerraformOutputProvider for TerraformCli {
    async fn get_outputs(&self, tf_state: &str) -> Result<OutputMap> {
        if tf_state.trim().is_empty() {
            bail!("terraform state is empty");
        }

        let work_dir = tempfile::tempdir().context("Failed to create terraform work directory")?;
        let state_path = work_dir.path().join(STATE_FILE);
        std::fs::write(&state_path, tf_state).context("Failed to write terraform state")?;

        let command = ProcessCommand::new(&self.terraform_path)
            .args(["output", "-json"])
            .arg(format!("-state={}", state_path.display()))
            .current_dir(work_dir.path())
            .timeout(self.timeout);

        let output = self
            .runner
            .run(command.clone())
            .await?
            .ensure_success(&command)?;

        let outputs = Self::parse_outputs(&output.stdout)?;
        tracing::debug!("Read {} terraform outputs", outputs.len());
        Ok(outputs)
    }
}
