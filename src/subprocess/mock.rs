//! Scripted [`ProcessRunner`] for the CLI wrapper tests
//!
//! Responses are registered per program and matched in registration order.
//! A call nothing matches fails with [`ProcessError::Unexpected`] carrying the
//! full command line, so a wrapper building the wrong arguments shows up in
//! the test failure.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

type ArgsMatcher = Box<dyn Fn(&[String]) -> bool + Send + Sync>;
type SideEffect = Box<dyn Fn(&ProcessCommand) + Send + Sync>;

struct Response {
    program: String,
    matcher: Option<ArgsMatcher>,
    side_effect: Option<SideEffect>,
    status: ExitStatus,
    stdout: String,
    stderr: String,
    remaining: Option<usize>,
}

impl Response {
    fn matches(&self, command: &ProcessCommand) -> bool {
        self.program == command.program
            && self.remaining != Some(0)
            && self
                .matcher
                .as_ref()
                .map_or(true, |matcher| matcher(&command.args))
    }
}

#[derive(Clone, Default)]
pub struct MockProcessRunner {
    responses: Arc<Mutex<Vec<Response>>>,
    calls: Arc<Mutex<Vec<ProcessCommand>>>,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start scripting the response to `program`; call [`MockResponse::finish`] to register it.
    pub fn expect(&self, program: &str) -> MockResponse {
        MockResponse {
            runner: self.clone(),
            response: Response {
                program: program.to_string(),
                matcher: None,
                side_effect: None,
                status: ExitStatus::Success,
                stdout: String::new(),
                stderr: String::new(),
                remaining: None,
            },
        }
    }

    /// Every command run so far, matched or not
    pub fn calls(&self) -> Vec<ProcessCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, program: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|command| command.program == program)
            .count()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        self.calls.lock().unwrap().push(command.clone());

        let mut responses = self.responses.lock().unwrap();
        let Some(response) = responses.iter_mut().find(|r| r.matches(&command)) else {
            return Err(ProcessError::Unexpected(command.display()));
        };

        if let Some(remaining) = response.remaining.as_mut() {
            *remaining -= 1;
        }
        if let Some(side_effect) = &response.side_effect {
            side_effect(&command);
        }

        Ok(ProcessOutput {
            status: response.status.clone(),
            stdout: response.stdout.clone(),
            stderr: response.stderr.clone(),
            duration: Duration::from_millis(1),
        })
    }
}

/// Builder for one scripted response
pub struct MockResponse {
    runner: MockProcessRunner,
    response: Response,
}

impl MockResponse {
    pub fn with_args<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.response.matcher = Some(Box::new(matcher));
        self
    }

    /// Run `effect` on each matching call, e.g. to write the files the real CLI would.
    pub fn runs<F>(mut self, effect: F) -> Self
    where
        F: Fn(&ProcessCommand) + Send + Sync + 'static,
    {
        self.response.side_effect = Some(Box::new(effect));
        self
    }

    pub fn stdout(mut self, stdout: &str) -> Self {
        self.response.stdout = stdout.to_string();
        self
    }

    /// Exit with `code` and `stderr`, the way the CLIs report failures.
    pub fn fails(mut self, code: i32, stderr: &str) -> Self {
        self.response.status = ExitStatus::Error(code);
        self.response.stderr = stderr.to_string();
        self
    }

    /// Answer a single call; later calls fall through to other responses.
    pub fn once(mut self) -> Self {
        self.response.remaining = Some(1);
        self
    }

    pub fn finish(self) {
        self.runner.responses.lock().unwrap().push(self.response);
    }
}
