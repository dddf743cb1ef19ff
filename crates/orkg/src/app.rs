//! Application context for CLI command execution.
//!
//! [`App`] locates the project, loads its configuration and opens the graph
//! store. Commands borrow the storage from it and call [`App::save`] after
//! mutating.
//!
//! # Example
//!
//! ```no_run
//! use orkg::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     let snapshot = app.storage().export_snapshot().await?;
//!     println!("{} statements", snapshot.statements.len());
//!     Ok(())
//! }
//! ```

use crate::cascade::CascadePlanner;
use crate::commands::init::{CONFIG_FILE_NAME, ORKG_DIR_NAME, OrkgConfig, find_orkg_root};
use crate::error::{ConfigError, Result};
use crate::services::Curators;
use crate::storage::{GraphStorage, create_storage};
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
pub struct App {
    storage: Box<dyn GraphStorage>,
    orkg_dir: PathBuf,
    data_path: Option<PathBuf>,
    config: OrkgConfig,
    planner: CascadePlanner,
    curators: Curators,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("orkg_dir", &self.orkg_dir)
            .field("data_path", &self.data_path)
            .field("config", &self.config)
            .field("storage", &"<dyn GraphStorage>")
            .finish_non_exhaustive()
    }
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Searches up the directory tree to find a `.orkg/` directory,
    /// loads configuration, and opens storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No project is found in the directory tree
    /// - Configuration cannot be loaded
    /// - The graph snapshot cannot be read
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_orkg_root(working_dir).ok_or(ConfigError::NotInitialized)?;

        let orkg_dir = root_dir.join(ORKG_DIR_NAME);
        let config = OrkgConfig::load(&orkg_dir.join(CONFIG_FILE_NAME)).await?;

        let backend = config.storage.to_backend(&root_dir)?;
        let data_path = backend.data_path().map(Path::to_path_buf);
        let storage = create_storage(backend).await?;

        tracing::debug!(root = %root_dir.display(), "Opened orkg project");

        Ok(Self {
            storage,
            orkg_dir,
            data_path,
            planner: config.planner(),
            curators: config.curators(),
            config,
        })
    }

    /// Get a mutable reference to the storage.
    pub fn storage_mut(&mut self) -> &mut dyn GraphStorage {
        self.storage.as_mut()
    }

    /// Get an immutable reference to the storage.
    #[must_use]
    pub fn storage(&self) -> &dyn GraphStorage {
        self.storage.as_ref()
    }

    /// Mutable storage together with the planner and curators, for
    /// services that need all three.
    pub fn parts_mut(&mut self) -> (&mut dyn GraphStorage, &CascadePlanner, &Curators) {
        (self.storage.as_mut(), &self.planner, &self.curators)
    }

    /// Get the path to the `.orkg` directory.
    #[must_use]
    pub fn orkg_dir(&self) -> &Path {
        &self.orkg_dir
    }

    /// Path of the graph snapshot, if the backend persists one.
    #[must_use]
    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &OrkgConfig {
        &self.config
    }

    /// Cascade planner built from the configured owning predicates.
    #[must_use]
    pub fn planner(&self) -> &CascadePlanner {
        &self.planner
    }

    /// Configured curators.
    #[must_use]
    pub fn curators(&self) -> &Curators {
        &self.curators
    }

    /// Save storage state to persistent storage.
    ///
    /// This should be called after any mutating operations.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub async fn save(&self) -> Result<()> {
        self.storage.save().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init;
    use crate::domain::{NewResource, classes};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_app_from_initialized_directory() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path(), false).await.unwrap();

        let app = App::from_directory(temp_dir.path()).await.unwrap();

        assert!(app.orkg_dir().ends_with(".orkg"));
        assert!(app.data_path().unwrap().ends_with("graph.jsonl"));
        assert_eq!(app.config(), &OrkgConfig::new());
    }

    #[tokio::test]
    async fn test_app_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path(), false).await.unwrap();

        let sub_dir = temp_dir.path().join("src").join("lib");
        std::fs::create_dir_all(&sub_dir).unwrap();

        let app = App::from_directory(&sub_dir).await.unwrap();
        assert_eq!(app.orkg_dir(), temp_dir.path().join(".orkg"));
    }

    #[tokio::test]
    async fn test_app_from_uninitialized_directory() {
        let temp_dir = TempDir::new().unwrap();

        let err = App::from_directory(temp_dir.path())
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("Not an orkg project"));
    }

    #[tokio::test]
    async fn test_app_save_persists_changes() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path(), false).await.unwrap();

        let mut app = App::from_directory(temp_dir.path()).await.unwrap();
        let paper = app
            .storage_mut()
            .create_resource(NewResource::new("Saved paper", [classes::PAPER]))
            .await
            .unwrap();
        app.save().await.unwrap();

        let reopened = App::from_directory(temp_dir.path()).await.unwrap();
        assert!(
            reopened
                .storage()
                .find_thing(&paper.id)
                .await
                .unwrap()
                .is_some()
        );
    }
}
