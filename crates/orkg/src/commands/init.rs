//! Implementation of the `init` command and the project configuration.
//!
//! An orkg project is a directory holding `.orkg/` with a `config.yaml` and a
//! JSONL graph snapshot. `init` creates the layout and seeds the snapshot with
//! the well-known predicates and classes every service relies on.

use crate::cascade::CascadePlanner;
use crate::domain::{BenchmarkVocabulary, ContributorId, ThingId, default_owning_predicates};
use crate::error::{ConfigError, Result};
use crate::services::{Curators, ensure_vocabulary};
use crate::storage::{StorageBackend, create_storage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the orkg directory
pub const ORKG_DIR_NAME: &str = ".orkg";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the graph snapshot file
pub const GRAPH_FILE_NAME: &str = "graph.jsonl";

/// Name of the gitignore file within .orkg
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Maximum directory depth to traverse when searching for the project root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Backend persisting the in-memory graph to the data file.
pub const BACKEND_MEMORY: &str = "memory";

/// Backend that never touches the disk.
pub const BACKEND_EPHEMERAL: &str = "ephemeral";

/// Configuration file structure for orkg
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrkgConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Cascade delete configuration
    #[serde(default)]
    pub cascade: CascadeConfig,

    /// Ids the benchmark queries look for
    #[serde(default)]
    pub vocabulary: BenchmarkVocabulary,

    /// Contributors allowed to delete content created by others
    #[serde(default)]
    pub curators: Vec<ContributorId>,
}

/// Storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage backend type ("memory" for in-memory with JSONL persistence)
    pub backend: String,

    /// Path to the data file, relative to the project root
    pub data_file: String,
}

/// Cascade configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CascadeConfig {
    /// Predicates through which a root owns its children
    pub owning_predicates: Vec<ThingId>,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            owning_predicates: default_owning_predicates(),
        }
    }
}

impl StorageConfig {
    /// Resolves the configured backend against the project root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedBackend`] for unknown backend names
    /// and [`ConfigError::Invalid`] for an empty data file.
    pub fn to_backend(&self, root_dir: &Path) -> Result<StorageBackend> {
        match self.backend.as_str() {
            BACKEND_MEMORY => {
                if self.data_file.trim().is_empty() {
                    return Err(
                        ConfigError::Invalid("storage.data_file is empty".to_string()).into(),
                    );
                }
                Ok(StorageBackend::Jsonl(root_dir.join(&self.data_file)))
            }
            BACKEND_EPHEMERAL => Ok(StorageBackend::InMemory),
            other => Err(ConfigError::UnsupportedBackend(other.to_string()).into()),
        }
    }
}

impl OrkgConfig {
    /// Configuration written by `init`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: StorageConfig {
                backend: BACKEND_MEMORY.to_string(),
                data_file: format!("{ORKG_DIR_NAME}/{GRAPH_FILE_NAME}"),
            },
            cascade: CascadeConfig::default(),
            vocabulary: BenchmarkVocabulary::default(),
            curators: Vec::new(),
        }
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file can not be read or is not valid YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file can not be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Invalid(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.cascade.owning_predicates.is_empty() {
            return Err(
                ConfigError::Invalid("cascade.owning_predicates must not be empty".to_string())
                    .into(),
            );
        }
        Ok(())
    }

    /// Cascade planner for the configured owning predicates.
    #[must_use]
    pub fn planner(&self) -> CascadePlanner {
        CascadePlanner::new(self.cascade.owning_predicates.iter().cloned())
    }

    /// The configured curators.
    #[must_use]
    pub fn curators(&self) -> Curators {
        Curators::new(self.curators.iter().cloned())
    }
}

impl Default for OrkgConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the orkg directory
    pub orkg_dir: PathBuf,
    /// Path to the config file
    pub config_file: PathBuf,
    /// Path to the graph snapshot
    pub data_file: PathBuf,
    /// Path to the gitignore file
    pub gitignore_file: PathBuf,
    /// Number of vocabulary things added to the graph
    pub seeded: usize,
}

/// Initialize a new orkg project in the given directory.
///
/// With `force`, an existing project gets a fresh configuration while its
/// graph snapshot is kept; missing vocabulary is added either way.
///
/// # Errors
///
/// Returns an error if:
/// - The `.orkg/` directory already exists and `force` is not set
/// - File system operations fail
pub async fn init(base_dir: &Path, force: bool) -> Result<InitResult> {
    let orkg_dir = base_dir.join(ORKG_DIR_NAME);

    if orkg_dir.exists() && !force {
        return Err(ConfigError::AlreadyInitialized(orkg_dir).into());
    }

    fs::create_dir_all(&orkg_dir).await?;

    let config_file = orkg_dir.join(CONFIG_FILE_NAME);
    let config = OrkgConfig::new();
    config.save(&config_file).await?;

    let data_file = base_dir.join(&config.storage.data_file);
    let mut storage = create_storage(StorageBackend::Jsonl(data_file.clone())).await?;
    let seeded = ensure_vocabulary(storage.as_mut(), &config.vocabulary).await?;
    storage.save().await?;

    let gitignore_file = orkg_dir.join(GITIGNORE_FILE_NAME);
    let gitignore_content = "\
# orkg temporary files; graph.jsonl should be tracked
*.tmp
";
    fs::write(&gitignore_file, gitignore_content).await?;

    tracing::info!(dir = %orkg_dir.display(), seeded, "Initialized orkg project");

    Ok(InitResult {
        orkg_dir,
        config_file,
        data_file,
        gitignore_file,
        seeded,
    })
}

/// Check if a directory has been initialized with orkg.
///
/// Returns `true` if the `.orkg/` directory exists.
#[must_use]
pub fn is_initialized(base_dir: &Path) -> bool {
    base_dir.join(ORKG_DIR_NAME).exists()
}

/// Find the project root by searching up the directory tree.
///
/// Returns the directory containing `.orkg/`, or `None` if none is found
/// before the filesystem root or the maximum traversal depth.
#[must_use]
pub fn find_orkg_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(ORKG_DIR_NAME).exists() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ThingFilter, predicates};
    use crate::error::Error;
    use rstest::rstest;
    use tempfile::TempDir;

    // ========== OrkgConfig Tests ==========

    #[test]
    fn test_config_new() {
        let config = OrkgConfig::new();
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.storage.data_file, ".orkg/graph.jsonl");
        assert_eq!(config.cascade.owning_predicates, default_owning_predicates());
        assert!(config.curators.is_empty());
    }

    #[tokio::test]
    async fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut original = OrkgConfig::new();
        original.curators.push("curator-1".into());
        original.save(&config_path).await.unwrap();

        let loaded = OrkgConfig::load(&config_path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[tokio::test]
    async fn test_config_yaml_format() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        OrkgConfig::new().save(&config_path).await.unwrap();
        let content = tokio::fs::read_to_string(&config_path).await.unwrap();

        assert!(content.contains("backend: memory"));
        assert!(content.contains("data_file: .orkg/graph.jsonl"));
        assert!(content.contains("owning_predicates:"));
        assert!(content.contains("benchmark-predicate: HAS_BENCHMARK"));
    }

    #[tokio::test]
    async fn test_config_sections_default_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        tokio::fs::write(
            &config_path,
            "storage:\n  backend: memory\n  data_file: data.jsonl\n",
        )
        .await
        .unwrap();

        let config = OrkgConfig::load(&config_path).await.unwrap();
        assert_eq!(config.cascade, CascadeConfig::default());
        assert_eq!(config.vocabulary, BenchmarkVocabulary::default());
    }

    #[rstest]
    #[case::not_yaml("storage: [")]
    #[case::missing_storage("curators: []\n")]
    #[case::no_owning_predicates(
        "storage:\n  backend: memory\n  data_file: g.jsonl\ncascade:\n  owning_predicates: []\n"
    )]
    #[tokio::test]
    async fn test_config_load_rejects(#[case] content: &str) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        tokio::fs::write(&config_path, content).await.unwrap();

        let err = OrkgConfig::load(&config_path).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
    }

    // ========== StorageConfig Tests ==========

    #[rstest]
    #[case::memory("memory", true)]
    #[case::ephemeral("ephemeral", true)]
    #[case::postgres("postgres", false)]
    fn test_to_backend(#[case] backend: &str, #[case] supported: bool) {
        let storage = StorageConfig {
            backend: backend.to_string(),
            data_file: ".orkg/graph.jsonl".to_string(),
        };
        let result = storage.to_backend(Path::new("/project"));
        assert_eq!(result.is_ok(), supported);
    }

    #[test]
    fn test_to_backend_resolves_against_root() {
        let backend = OrkgConfig::new()
            .storage
            .to_backend(Path::new("/project"))
            .unwrap();
        assert_eq!(
            backend.data_path(),
            Some(Path::new("/project/.orkg/graph.jsonl"))
        );
    }

    // ========== Init Command Tests ==========

    #[tokio::test]
    async fn test_init_creates_directory_structure() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path(), false).await.unwrap();

        assert!(result.orkg_dir.exists());
        assert!(result.config_file.exists());
        assert!(result.data_file.exists());
        assert!(result.gitignore_file.exists());
    }

    #[tokio::test]
    async fn test_init_seeds_vocabulary() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path(), false).await.unwrap();
        assert!(result.seeded > 0);

        let storage = create_storage(StorageBackend::Jsonl(result.data_file))
            .await
            .unwrap();
        let things = storage.list_things(&ThingFilter::default()).await.unwrap();
        assert_eq!(things.len(), result.seeded);
        assert!(
            storage
                .find_thing(&predicates::HAS_CONTRIBUTION.into())
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_init_fails_if_already_initialized() {
        let temp_dir = TempDir::new().unwrap();

        init(temp_dir.path(), false).await.unwrap();
        let result = init(temp_dir.path(), false).await;

        let err_msg = result.unwrap_err().to_string().to_lowercase();
        assert!(err_msg.contains("already exists"));
    }

    #[tokio::test]
    async fn test_init_force_keeps_graph() {
        let temp_dir = TempDir::new().unwrap();
        let first = init(temp_dir.path(), false).await.unwrap();
        let before = tokio::fs::read_to_string(&first.data_file).await.unwrap();

        let second = init(temp_dir.path(), true).await.unwrap();
        let after = tokio::fs::read_to_string(&second.data_file).await.unwrap();

        assert_eq!(second.seeded, 0);
        assert_eq!(before, after);
    }

    // ========== Utility Function Tests ==========

    #[test]
    fn test_is_initialized() {
        let temp_dir = TempDir::new().unwrap();
        assert!(!is_initialized(temp_dir.path()));

        std::fs::create_dir(temp_dir.path().join(ORKG_DIR_NAME)).unwrap();
        assert!(is_initialized(temp_dir.path()));
    }

    #[test]
    fn test_find_orkg_root_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join(ORKG_DIR_NAME)).unwrap();

        let sub_dir = temp_dir.path().join("sub").join("nested");
        std::fs::create_dir_all(&sub_dir).unwrap();

        assert_eq!(
            find_orkg_root(&sub_dir),
            Some(temp_dir.path().to_path_buf())
        );
        assert_eq!(
            find_orkg_root(temp_dir.path()),
            Some(temp_dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_find_orkg_root_not_found() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_orkg_root(temp_dir.path()).is_none());
    }
}
