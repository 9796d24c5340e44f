//! [`Executor`] backed by the `bosh` CLI
//!
//! Every call works in its own temporary directory: inputs are written as
//! files, the CLI runs against them, and anything it writes back (rendered
//! variables, director state) is read before the directory is dropped.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use super::executor::{
    CreateEnvInput, CreateEnvOutput, DeleteEnvInput, Executor, InterpolateOutput,
};
use super::input::InterpolateInput;
use super::variables;
use crate::storage::DirectorState;
use crate::subprocess::{ProcessCommand, ProcessRunner};

const MANIFEST_FILE: &str = "manifest.yml";
const STATE_FILE: &str = "state.json";
const VARS_STORE_FILE: &str = "variables.yml";
const VARS_FILE: &str = "director-vars.yml";
const PRIVATE_KEY_FILE: &str = "private_key";

pub struct BoshCliExecutor {
    runner: Arc<dyn ProcessRunner>,
    bosh_path: String,
    deployment_dir: PathBuf,
    timeout: Option<Duration>,
}

/// Files handed to `bosh create-env` / `bosh delete-env`
struct EnvFiles {
    dir: TempDir,
    manifest: PathBuf,
    state: PathBuf,
    vars_store: PathBuf,
}

impl EnvFiles {
    fn write(manifest: &str, state: &DirectorState, variables: &str) -> Result<Self> {
        let dir = work_dir()?;
        let files = Self {
            manifest: dir.path().join(MANIFEST_FILE),
            state: dir.path().join(STATE_FILE),
            vars_store: dir.path().join(VARS_STORE_FILE),
            dir,
        };

        write_file(&files.manifest, manifest)?;
        if !state.is_empty() {
            let json = serde_json::to_string(state).context("Failed to serialize director state")?;
            write_file(&files.state, &json)?;
        }
        if !variables.is_empty() {
            write_file(&files.vars_store, variables)?;
        }

        Ok(files)
    }

    fn args(&self, subcommand: &str) -> Vec<String> {
        vec![
            subcommand.to_string(),
            self.manifest.display().to_string(),
            "--state".to_string(),
            self.state.display().to_string(),
            "--vars-store".to_string(),
            self.vars_store.display().to_string(),
        ]
    }
}

impl BoshCliExecutor {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        bosh_path: impl Into<String>,
        deployment_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            bosh_path: bosh_path.into(),
            deployment_dir: deployment_dir.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base manifest followed by the ops files for `input`'s infrastructure.
    fn manifest_args(&self, input: &InterpolateInput) -> Vec<String> {
        let ops_files = [
            self.deployment_dir.join(input.iaas().as_str()).join("cpi.yml"),
            self.deployment_dir.join("external-ip-not-recommended.yml"),
        ];

        let mut args = vec![self.deployment_dir.join("bosh.yml").display().to_string()];
        for ops_file in ops_files {
            args.push("-o".to_string());
            args.push(ops_file.display().to_string());
        }
        args
    }

    async fn run_bosh(&self, args: Vec<String>, dir: &Path) -> Result<String> {
        let command = ProcessCommand::new(&self.bosh_path)
            .args(args)
            .current_dir(dir)
            .timeout(self.timeout);

        let output = self
            .runner
            .run(command.clone())
            .await?
            .ensure_success(&command)?;
        Ok(output.stdout)
    }
}

#[async_trait]
impl Executor for BoshCliExecutor {
    async fn interpolate(&self, input: InterpolateInput) -> Result<InterpolateOutput> {
        let dir = work_dir()?;
        let vars_file = dir.path().join(VARS_FILE);
        let vars_store = dir.path().join(VARS_STORE_FILE);

        let vars = serde_yaml::to_string(&input).context("Failed to serialize director vars")?;
        write_file(&vars_file, &vars)?;
        if !input.variables.is_empty() {
            write_file(&vars_store, &input.variables)?;
        }

        let mut args = vec!["interpolate".to_string()];
        args.extend(self.manifest_args(&input));
        args.extend([
            "--vars-store".to_string(),
            vars_store.display().to_string(),
            "--vars-file".to_string(),
            vars_file.display().to_string(),
        ]);
        if !input.private_key.is_empty() {
            let key_file = dir.path().join(PRIVATE_KEY_FILE);
            write_file(&key_file, &input.private_key)?;
            args.push("--var-file".to_string());
            args.push(format!("private_key={}", key_file.display()));
        }

        let manifest = self.run_bosh(args, dir.path()).await?;
        let variables = variables::from_yaml(&read_optional(&vars_store)?)
            .context("Failed to parse interpolated variables")?;

        Ok(InterpolateOutput {
            manifest,
            variables,
        })
    }

    async fn create_env(&self, input: CreateEnvInput) -> Result<CreateEnvOutput> {
        let files = EnvFiles::write(&input.manifest, &input.state, &input.variables)?;
        self.run_bosh(files.args("create-env"), files.dir.path())
            .await?;

        let json = read_optional(&files.state)?;
        let state = if json.trim().is_empty() {
            DirectorState::new()
        } else {
            serde_json::from_str(&json).context("Failed to parse director state")?
        };

        Ok(CreateEnvOutput { state })
    }

    async fn delete_env(&self, input: DeleteEnvInput) -> Result<()> {
        let files = EnvFiles::write(&input.manifest, &input.state, &input.variables)?;
        self.run_bosh(files.args("delete-env"), files.dir.path())
            .await?;
        Ok(())
    }
}

fn work_dir() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("directrix-bosh")
        .tempdir()
        .context("Failed to create bosh work directory")
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn read_optional(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::director::input::{GcpInput, InfrastructureInput};
    use crate::subprocess::MockProcessRunner;
    use serde_json::json;

    fn flag_value(command: &ProcessCommand, flag: &str) -> PathBuf {
        let index = command.args.iter().position(|arg| arg == flag).unwrap();
        PathBuf::from(&command.args[index + 1])
    }

    fn executor(mock: &MockProcessRunner) -> BoshCliExecutor {
        BoshCliExecutor::new(Arc::new(mock.clone()), "bosh", "/opt/bosh-deployment")
    }

    fn gcp_input() -> InterpolateInput {
        InterpolateInput {
            director_name: "bosh-some-env-id".to_string(),
            private_key: "some-private-key".to_string(),
            bosh_state: DirectorState::new(),
            variables: "admin_password: previous-password\n".to_string(),
            infrastructure: InfrastructureInput::Gcp(GcpInput {
                zone: "some-zone".to_string(),
                network: "some-network".to_string(),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn test_interpolate_renders_with_iaas_ops_files() {
        let mock = MockProcessRunner::new();
        mock.expect("bosh")
            .with_args(|args| args.first().map(String::as_str) == Some("interpolate"))
            .runs(|command| {
                let vars_file = flag_value(command, "--vars-file");
                let vars = std::fs::read_to_string(vars_file).unwrap();
                assert!(vars.contains("director_name: bosh-some-env-id"));
                assert!(vars.contains("iaas: gcp"));
                assert!(!vars.contains("some-private-key"));

                let vars_store = flag_value(command, "--vars-store");
                assert_eq!(
                    std::fs::read_to_string(&vars_store).unwrap(),
                    "admin_password: previous-password\n"
                );
                std::fs::write(
                    vars_store,
                    "admin_password: previous-password\ndirector_ssl:\n  ca: some-ca\n",
                )
                .unwrap();
            })
            .stdout("name: bosh\n")
            .finish();

        let output = executor(&mock).interpolate(gcp_input()).await.unwrap();

        assert_eq!(output.manifest, "name: bosh\n");
        assert_eq!(
            variables::DirectorCredentials::from_variables(&output.variables).ssl_ca,
            "some-ca"
        );

        let args = &mock.calls()[0].args;
        assert_eq!(args[1], "/opt/bosh-deployment/bosh.yml");
        assert_eq!(args[2..4], ["-o", "/opt/bosh-deployment/gcp/cpi.yml"]);
        assert_eq!(
            args[4..6],
            ["-o", "/opt/bosh-deployment/external-ip-not-recommended.yml"]
        );
        assert!(args.iter().any(|arg| arg.starts_with("private_key=")));
    }

    #[tokio::test]
    async fn test_interpolate_failure_carries_bosh_output() {
        let mock = MockProcessRunner::new();
        mock.expect("bosh")
            .fails(1, "Expected to find variables: zone")
            .finish();

        let err = executor(&mock).interpolate(gcp_input()).await.unwrap_err();

        assert!(err.to_string().contains("Expected to find variables: zone"));
    }

    #[tokio::test]
    async fn test_create_env_returns_new_director_state() {
        let mut prior = DirectorState::new();
        prior.insert("some-key".to_string(), json!("some-value"));

        let mock = MockProcessRunner::new();
        mock.expect("bosh")
            .with_args(|args| args.first().map(String::as_str) == Some("create-env"))
            .runs(|command| {
                let manifest = PathBuf::from(&command.args[1]);
                assert_eq!(std::fs::read_to_string(manifest).unwrap(), "some-manifest");

                let state_file = flag_value(command, "--state");
                let prior: serde_json::Value =
                    serde_json::from_str(&std::fs::read_to_string(&state_file).unwrap()).unwrap();
                assert_eq!(prior, json!({"some-key": "some-value"}));
                std::fs::write(state_file, r#"{"current_vm_cid": "vm-1234"}"#).unwrap();
            })
            .finish();

        let output = executor(&mock)
            .create_env(CreateEnvInput {
                manifest: "some-manifest".to_string(),
                state: prior,
                variables: "admin_password: secret\n".to_string(),
            })
            .await
            .unwrap();

        let mut expected = DirectorState::new();
        expected.insert("current_vm_cid".to_string(), json!("vm-1234"));
        assert_eq!(output.state, expected);
    }

    #[tokio::test]
    async fn test_create_env_failure() {
        let mock = MockProcessRunner::new();
        mock.expect("bosh")
            .fails(1, "Creating VM: quota exceeded")
            .finish();

        let err = executor(&mock)
            .create_env(CreateEnvInput::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_delete_env_runs_against_persisted_files() {
        let mock = MockProcessRunner::new();
        mock.expect("bosh")
            .with_args(|args| args.first().map(String::as_str) == Some("delete-env"))
            .runs(|command| {
                let vars_store = flag_value(command, "--vars-store");
                assert_eq!(
                    std::fs::read_to_string(vars_store).unwrap(),
                    "admin_password: secret\n"
                );
            })
            .once()
            .finish();

        executor(&mock)
            .delete_env(DeleteEnvInput {
                manifest: "some-manifest".to_string(),
                state: DirectorState::new(),
                variables: "admin_password: secret\n".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(mock.call_count("bosh"), 1);
    }
}
