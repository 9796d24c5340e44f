use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::director::{
    CreateEnvInput, CreateEnvOutput, DeleteEnvInput, Executor, InterpolateInput,
    InterpolateOutput,
};
use crate::infrastructure::{
    OutputMap, StackDescription, StackManager, TerraformOutputProvider, TerraformOutputs,
};

#[derive(Default)]
struct ExecutorInner {
    interpolate_output: InterpolateOutput,
    create_env_output: CreateEnvOutput,
    interpolate_error: Option<String>,
    create_env_error: Option<String>,
    delete_env_error: Option<String>,
    interpolate_calls: Vec<InterpolateInput>,
    create_env_calls: Vec<CreateEnvInput>,
    delete_env_calls: Vec<DeleteEnvInput>,
}

#[derive(Clone, Default)]
pub struct FakeExecutor {
    inner: Arc<Mutex<ExecutorInner>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_interpolate_output(&self, output: InterpolateOutput) {
        self.inner.lock().unwrap().interpolate_output = output;
    }

    pub fn set_create_env_output(&self, output: CreateEnvOutput) {
        self.inner.lock().unwrap().create_env_output = output;
    }

    pub fn fail_interpolate(&self, message: &str) {
        self.inner.lock().unwrap().interpolate_error = Some(message.to_string());
    }

    pub fn fail_create_env(&self, message: &str) {
        self.inner.lock().unwrap().create_env_error = Some(message.to_string());
    }

    pub fn fail_delete_env(&self, message: &str) {
        self.inner.lock().unwrap().delete_env_error = Some(message.to_string());
    }

    pub fn interpolate_calls(&self) -> Vec<InterpolateInput> {
        self.inner.lock().unwrap().interpolate_calls.clone()
    }

    pub fn create_env_calls(&self) -> Vec<CreateEnvInput> {
        self.inner.lock().unwrap().create_env_calls.clone()
    }

    pub fn delete_env_calls(&self) -> Vec<DeleteEnvInput> {
        self.inner.lock().unwrap().delete_env_calls.clone()
    }
}

#[async_trait]
impl Executor for FakeExecutor {
    async fn interpolate(&self, input: InterpolateInput) -> Result<InterpolateOutput> {
        let mut inner = self.inner.lock().unwrap();
        inner.interpolate_calls.push(input);
        match &inner.interpolate_error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(inner.interpolate_output.clone()),
        }
    }

    async fn create_env(&self, input: CreateEnvInput) -> Result<CreateEnvOutput> {
        let mut inner = self.inner.lock().unwrap();
        inner.create_env_calls.push(input);
        match &inner.create_env_error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(inner.create_env_output.clone()),
        }
    }

    async fn delete_env(&self, input: DeleteEnvInput) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.delete_env_calls.push(input);
        match &inner.delete_env_error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
struct TerraformInner {
    outputs: TerraformOutputs,
    raw_outputs: OutputMap,
    error: Option<String>,
    get_calls: Vec<(String, String)>,
    get_outputs_calls: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeTerraformOutputProvider {
    inner: Arc<Mutex<TerraformInner>>,
}

impl FakeTerraformOutputProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outputs(&self, outputs: TerraformOutputs) {
        self.inner.lock().unwrap().outputs = outputs;
    }

    pub fn set_raw_outputs(&self, outputs: OutputMap) {
        self.inner.lock().unwrap().raw_outputs = outputs;
    }

    pub fn fail(&self, message: &str) {
        self.inner.lock().unwrap().error = Some(message.to_string());
    }

    /// `(tf_state, lb_type)` pairs passed to `get`
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().get_calls.clone()
    }

    pub fn get_outputs_calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().get_outputs_calls.clone()
    }
}

#[async_trait]
impl TerraformOutputProvider for FakeTerraformOutputProvider {
    async fn get_outputs(&self, tf_state: &str) -> Result<OutputMap> {
        let mut inner = self.inner.lock().unwrap();
        inner.get_outputs_calls.push(tf_state.to_string());
        match &inner.error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(inner.raw_outputs.clone()),
        }
    }

    async fn get(&self, tf_state: &str, lb_type: &str) -> Result<TerraformOutputs> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .get_calls
            .push((tf_state.to_string(), lb_type.to_string()));
        match &inner.error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(inner.outputs.clone()),
        }
    }
}

#[derive(Default)]
struct StackInner {
    stack: StackDescription,
    error: Option<String>,
    describe_calls: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeStackManager {
    inner: Arc<Mutex<StackInner>>,
}

impl FakeStackManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stack(&self, stack: StackDescription) {
        self.inner.lock().unwrap().stack = stack;
    }

    pub fn fail(&self, message: &str) {
        self.inner.lock().unwrap().error = Some(message.to_string());
    }

    pub fn describe_calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().describe_calls.clone()
    }
}

#[async_trait]
impl StackManager for FakeStackManager {
    async fn describe(&self, stack_name: &str) -> Result<StackDescription> {
        let mut inner = self.inner.lock().unwrap();
        inner.describe_calls.push(stack_name.to_string());
        match &inner.error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(inner.stack.clone()),
        }
    }
}
