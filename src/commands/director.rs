//! Create and delete the director of the environment in a state directory

use tracing::{info, warn};

use crate::director::Manager;
use crate::error::Result;
use crate::storage::{Bosh, State, StateStore};

/// Create or update the director and persist the resulting record.
///
/// The store is only written once the manager succeeds.
pub async fn create_director(manager: &Manager, store: &StateStore, state: &State) -> Result<State> {
    let updated = manager.create(state).await?;
    store.save(&updated)?;
    info!("Saved director {} to {}", updated.bosh.director_name, store.path().display());
    Ok(updated)
}

/// Delete the director and clear it from the persisted record.
///
/// Returns `false` when the record holds no director to delete.
pub async fn delete_director(manager: &Manager, store: &StateStore, state: &State) -> Result<bool> {
    if state.bosh.is_empty() {
        warn!("No director recorded in {}", store.path().display());
        return Ok(false);
    }

    manager.delete(state).await?;
    store.save(&state.with_bosh(Bosh::default()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::director::{CreateEnvOutput, InterpolateOutput, ManagerError};
    use crate::error::Error;
    use crate::infrastructure::TerraformOutputs;
    use crate::storage::{DirectorState, Lb};
    use crate::testing::{FakeExecutor, FakeStackManager, FakeTerraformOutputProvider};
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn manager(executor: &FakeExecutor) -> Manager {
        let terraform = FakeTerraformOutputProvider::new();
        terraform.set_outputs(TerraformOutputs {
            director_address: "https://10.0.0.6:25555".to_string(),
            ..Default::default()
        });
        Manager::new(
            Arc::new(executor.clone()),
            Arc::new(terraform),
            Arc::new(FakeStackManager::new()),
        )
    }

    fn gcp_state() -> State {
        State {
            iaas: "gcp".to_string(),
            env_id: "some-env-id".to_string(),
            tf_state: "some-tf-state".to_string(),
            lb: Lb {
                lb_type: "cf".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_director_persists_updated_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path());
        let executor = FakeExecutor::new();
        executor.set_interpolate_output(InterpolateOutput {
            manifest: "some-manifest".to_string(),
            ..Default::default()
        });
        let mut new_state = DirectorState::new();
        new_state.insert("current_vm_cid".to_string(), json!("vm-1"));
        executor.set_create_env_output(CreateEnvOutput { state: new_state });

        let updated = create_director(&manager(&executor), &store, &gcp_state())
            .await
            .unwrap();

        assert_eq!(updated.bosh.director_name, "bosh-some-env-id");
        assert_eq!(updated.bosh.director_address, "https://10.0.0.6:25555");
        assert_eq!(store.load().unwrap().bosh, updated.bosh);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_store_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path());
        let executor = FakeExecutor::new();
        executor.fail_create_env("failed to create");

        let err = create_director(&manager(&executor), &store, &gcp_state())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Director(ManagerError::CreateEnv(_))));
        assert_eq!(err.to_string(), "failed to create");
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_delete_director_clears_director_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path());
        let executor = FakeExecutor::new();
        let mut state = gcp_state();
        state.bosh = Bosh {
            director_name: "bosh-some-env-id".to_string(),
            manifest: "some-manifest".to_string(),
            ..Default::default()
        };

        let deleted = delete_director(&manager(&executor), &store, &state)
            .await
            .unwrap();

        assert!(deleted);
        assert_eq!(executor.delete_env_calls().len(), 1);
        let saved = store.load().unwrap();
        assert!(saved.bosh.is_empty());
        assert_eq!(saved.tf_state, "some-tf-state");
    }

    #[tokio::test]
    async fn test_delete_without_director_is_a_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path());
        let executor = FakeExecutor::new();

        let deleted = delete_director(&manager(&executor), &store, &gcp_state())
            .await
            .unwrap();

        assert!(!deleted);
        assert!(executor.delete_env_calls().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_director_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path());
        let executor = FakeExecutor::new();
        executor.fail_delete_env("failed to delete");
        let mut state = gcp_state();
        state.bosh.manifest = "some-manifest".to_string();
        store.save(&state).unwrap();

        let err = delete_director(&manager(&executor), &store, &state)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to delete");
        assert_eq!(store.load().unwrap().bosh.manifest, "some-manifest");
    }
}
