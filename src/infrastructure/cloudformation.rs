//! CloudFormation-backed stack manager

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::{StackDescription, StackManager};
use crate::storage::Aws;
use crate::subprocess::{ProcessCommand, ProcessRunner};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStacksResponse {
    #[serde(default)]
    stacks: Vec<RawStack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawStack {
    stack_name: String,
    #[serde(default)]
    stack_status: String,
    #[serde(default)]
    outputs: Vec<RawOutput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawOutput {
    output_key: String,
    #[serde(default)]
    output_value: String,
}

/// Describes stacks with `aws cloudformation describe-stacks`
pub struct AwsStackManager {
    runner: Arc<dyn ProcessRunner>,
    aws_path: String,
    credentials: Aws,
    timeout: Option<Duration>,
}

impl AwsStackManager {
    pub fn new(runner: Arc<dyn ProcessRunner>, aws_path: impl Into<String>, credentials: Aws) -> Self {
        Self {
            runner,
            aws_path: aws_path.into(),
            credentials,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn parse_stack(stack_name: &str, stdout: &str) -> Result<StackDescription> {
        let response: DescribeStacksResponse =
            serde_json::from_str(stdout).context("Failed to parse stack description")?;

        let Some(stack) = response.stacks.into_iter().next() else {
            bail!("stack not found: {stack_name}");
        };

        Ok(StackDescription {
            name: stack.stack_name,
            status: stack.stack_status,
            outputs: stack
                .outputs
                .into_iter()
                .map(|output| (output.output_key, output.output_value))
                .collect(),
        })
    }
}

#[async_trait]
impl StackManager for AwsStackManager {
    async fn describe(&self, stack_name: &str) -> Result<StackDescription> {
        // Unset fields fall back to the caller's own AWS configuration
        let command = ProcessCommand::new(&self.aws_path)
            .args(["cloudformation", "describe-stacks", "--stack-name"])
            .arg(stack_name)
            .args(["--output", "json"])
            .env_if_set("AWS_ACCESS_KEY_ID", &self.credentials.access_key_id)
            .env_if_set("AWS_SECRET_ACCESS_KEY", &self.credentials.secret_access_key)
            .env_if_set("AWS_DEFAULT_REGION", &self.credentials.region)
            .timeout(self.timeout);

        let output = self.runner.run(command.clone()).await?;
        if !output.status.success() && output.stderr.contains("does not exist") {
            bail!("stack not found: {stack_name}");
        }
        let output = output.ensure_success(&command)?;

        let stack = Self::parse_stack(stack_name, &output.stdout)?;
        tracing::debug!(
            "Described stack {} ({}) with {} outputs",
            stack.name,
            stack.status,
            stack.outputs.len()
        );
        Ok(stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subprocess::MockProcessRunner;

    const DESCRIBE_JSON: &str = r#"{
        "Stacks": [{
            "StackName": "some-stack",
            "StackStatus": "CREATE_COMPLETE",
            "Outputs": [
                {"OutputKey": "BOSHSubnetAZ", "OutputValue": "some-bosh-subnet-az"},
                {"OutputKey": "BOSHURL", "OutputValue": "some-bosh-url"}
            ]
        }]
    }"#;

    fn credentials() -> Aws {
        Aws {
            access_key_id: "some-access-key-id".to_string(),
            secret_access_key: "some-secret-access-key".to_string(),
            region: "some-region".to_string(),
        }
    }

    #[tokio::test]
    async fn test_describe_flattens_outputs() {
        let mock = MockProcessRunner::new();
        mock.expect("aws")
            .with_args(|args| {
                args == [
                    "cloudformation",
                    "describe-stacks",
                    "--stack-name",
                    "some-stack",
                    "--output",
                    "json",
                ]
            })
            .stdout(DESCRIBE_JSON)
            .finish();

        let manager = AwsStackManager::new(Arc::new(mock.clone()), "aws", credentials());
        let stack = manager.describe("some-stack").await.unwrap();

        assert_eq!(stack.name, "some-stack");
        assert_eq!(stack.status, "CREATE_COMPLETE");
        assert_eq!(stack.output("BOSHSubnetAZ"), "some-bosh-subnet-az");
        assert_eq!(stack.output("BOSHURL"), "some-bosh-url");
    }

    #[tokio::test]
    async fn test_describe_passes_credentials_through_env() {
        let mock = MockProcessRunner::new();
        mock.expect("aws")
            .stdout(DESCRIBE_JSON)
            .finish();

        let manager = AwsStackManager::new(Arc::new(mock.clone()), "aws", credentials());
        manager.describe("some-stack").await.unwrap();

        let history = mock.calls();
        let env = &history[0].env;
        assert_eq!(env["AWS_ACCESS_KEY_ID"], "some-access-key-id");
        assert_eq!(env["AWS_SECRET_ACCESS_KEY"], "some-secret-access-key");
        assert_eq!(env["AWS_DEFAULT_REGION"], "some-region");
    }

    #[tokio::test]
    async fn test_describe_leaves_unset_credentials_to_the_environment() {
        let mock = MockProcessRunner::new();
        mock.expect("aws")
            .stdout(DESCRIBE_JSON)
            .finish();

        let manager = AwsStackManager::new(Arc::new(mock.clone()), "aws", Aws::default());
        manager.describe("some-stack").await.unwrap();

        assert!(mock.calls()[0].env.is_empty());
    }

    #[tokio::test]
    async fn test_missing_stack() {
        let mock = MockProcessRunner::new();
        mock.expect("aws")
            .fails(
                254,
                "An error occurred (ValidationError): Stack with id some-stack does not exist",
            )
            .finish();

        let manager = AwsStackManager::new(Arc::new(mock.clone()), "aws", credentials());
        let err = manager.describe("some-stack").await.unwrap_err();

        assert_eq!(err.to_string(), "stack not found: some-stack");
    }

    #[tokio::test]
    async fn test_empty_stack_list() {
        let mock = MockProcessRunner::new();
        mock.expect("aws")
            .stdout(r#"{"Stacks": []}"#)
            .finish();

        let manager = AwsStackManager::new(Arc::new(mock.clone()), "aws", credentials());
        let err = manager.describe("some-stack").await.unwrap_err();

        assert_eq!(err.to_string(), "stack not found: some-stack");
    }

    #[tokio::test]
    async fn test_other_failures_carry_stderr() {
        let mock = MockProcessRunner::new();
        mock.expect("aws")
            .fails(255, "Unable to locate credentials")
            .finish();

        let manager = AwsStackManager::new(Arc::new(mock.clone()), "aws", credentials());
        let err = manager.describe("some-stack").await.unwrap_err();

        assert!(err.to_string().contains("Unable to locate credentials"));
    }
}
