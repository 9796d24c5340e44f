//! Recording fakes of the director manager's collaborators
//!
//! Each fake is cheaply cloneable; clones share recorded calls and configured
//! responses, so a test keeps one handle and gives another to the manager.

mod fakes;

pub use fakes::{FakeExecutor, FakeStackManager, FakeTerraformOutputProvider};
