//! Storage abstraction for the statement graph.
//!
//! [`GraphStorage`] is the repository seam every service talks to. It is an
//! object-safe async trait, so callers hold a `Box<dyn GraphStorage>` and do
//! not care which backend is behind it:
//!
//! - **In-memory**: things and statements in hash maps, with a `petgraph`
//!   index for traversal and incoming-edge counts
//! - **JSONL**: the in-memory backend loaded from and saved to a snapshot file
//!
//! The store enforces referential integrity only: statements must point at
//! existing things and things in use can not be deleted. Content rules (list
//! statements, ownership, paper structure) live in [`crate::services`].
//!
//! # Example
//!
//! ```no_run
//! use orkg::domain::{NewResource, NewStatement, NewThing, classes, predicates};
//! use orkg::storage::{StorageBackend, create_storage};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut storage = create_storage(StorageBackend::InMemory).await?;
//!
//!     let contribution = NewThing::new("has contribution").with_id(predicates::HAS_CONTRIBUTION);
//!     storage.create_predicate(contribution).await?;
//!     let paper = storage.create_resource(NewResource::new("A paper", [classes::PAPER])).await?;
//!     let part = storage
//!         .create_resource(NewResource::new("Its contribution", [classes::CONTRIBUTION]))
//!         .await?;
//!     storage
//!         .create_statement(NewStatement::new(
//!             paper.id.clone(),
//!             predicates::HAS_CONTRIBUTION,
//!             part.id.clone(),
//!         ))
//!         .await?;
//!
//!     assert_eq!(storage.count_incoming_statements(&part.id).await?, 1);
//!     Ok(())
//! }
//! ```

use crate::domain::{
    BundleConfiguration, Class, GraphSnapshot, Literal, NewResource, NewStatement, NewThing,
    Predicate, Resource, ResourceUpdate, Statement, StatementFilter, StatementId,
    StatementUpdate, Thing, ThingFilter, ThingId,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub mod in_memory;

pub use in_memory::LoadWarning;

/// Repository of things and statements.
///
/// All methods take `&self`/`&mut self` of a single logical transaction; the
/// in-memory backend serializes access internally.
#[async_trait]
pub trait GraphStorage: Send + Sync {
    // ========== Things ==========

    /// Creates a resource. A fixed id must not be taken yet.
    async fn create_resource(&mut self, new: NewResource) -> Result<Resource>;

    /// Creates a literal. `extra` is the datatype.
    async fn create_literal(&mut self, new: NewThing) -> Result<Literal>;

    /// Creates a predicate.
    async fn create_predicate(&mut self, new: NewThing) -> Result<Predicate>;

    /// Creates a class. `extra` is the class IRI.
    async fn create_class(&mut self, new: NewThing) -> Result<Class>;

    /// Looks up any thing by id.
    async fn find_thing(&self, id: &ThingId) -> Result<Option<Thing>>;

    /// Lists things matching `filter`, in id order.
    async fn list_things(&self, filter: &ThingFilter) -> Result<Vec<Thing>>;

    /// Changes a resource's label and/or classes.
    async fn update_resource(&mut self, id: &ThingId, update: ResourceUpdate) -> Result<Resource>;

    /// Deletes a thing that no statement refers to.
    ///
    /// Fails with [`Error::ResourceUsedInStatement`] while any statement uses
    /// the thing as subject, predicate or object.
    async fn delete_thing(&mut self, id: &ThingId) -> Result<()>;

    // ========== Statements ==========

    /// Creates a statement between existing things.
    async fn create_statement(&mut self, new: NewStatement) -> Result<Statement>;

    /// Looks up a statement by id.
    async fn find_statement(&self, id: &StatementId) -> Result<Option<Statement>>;

    /// Finds statements matching `filter`, in id order.
    async fn find_statements(&self, filter: &StatementFilter) -> Result<Vec<Statement>>;

    /// Replaces predicate and/or object of a statement.
    async fn update_statement(
        &mut self,
        id: &StatementId,
        update: StatementUpdate,
    ) -> Result<Statement>;

    /// Deletes statements by id, ignoring unknown ids. Returns how many were removed.
    async fn delete_statements(&mut self, ids: &[StatementId]) -> Result<usize>;

    // ========== Graph Queries ==========

    /// Number of statements whose object is `id`.
    async fn count_incoming_statements(&self, id: &ThingId) -> Result<usize>;

    /// [`count_incoming_statements`](Self::count_incoming_statements) for many ids.
    ///
    /// Every requested id is present in the result; unknown ids count 0.
    async fn count_incoming_statements_batch(
        &self,
        ids: &[ThingId],
    ) -> Result<HashMap<ThingId, usize>>;

    /// Statements of the subgraph below `root`, filtered by `config`.
    ///
    /// Returns an empty list when `root` does not exist.
    async fn fetch_subgraph(
        &self,
        root: &ThingId,
        config: &BundleConfiguration,
    ) -> Result<Vec<Statement>>;

    /// Number of statements below a paper, not descending into other papers,
    /// research problems or research fields.
    async fn count_statements_recursive(&self, root: &ThingId) -> Result<usize>;

    // ========== Batch Operations ==========

    /// Copies out every thing, statement and id counter.
    async fn export_snapshot(&self) -> Result<GraphSnapshot>;

    /// Replaces the whole contents with `snapshot`.
    ///
    /// Duplicates and statements whose endpoints are missing are skipped and
    /// reported, exactly as when loading a snapshot file.
    async fn import_snapshot(&mut self, snapshot: GraphSnapshot) -> Result<Vec<LoadWarning>>;

    // ========== Persistence ==========

    /// Persists the current state. A no-op for purely in-memory storage.
    async fn save(&self) -> Result<()>;

    /// Discards in-memory state and reloads from the backing file.
    async fn reload(&mut self) -> Result<()>;
}

/// Available storage backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral)
    InMemory,

    /// In-memory storage persisted to a JSONL snapshot
    Jsonl(PathBuf),
}

impl StorageBackend {
    /// Returns the data file path for file-based backends.
    #[must_use]
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Jsonl(path) => Some(path),
            StorageBackend::InMemory => None,
        }
    }
}

/// In-memory storage that writes itself to a JSONL file on `save()`.
struct JsonlBackedStorage {
    inner: Box<dyn GraphStorage>,
    path: PathBuf,
}

#[async_trait]
impl GraphStorage for JsonlBackedStorage {
    async fn create_resource(&mut self, new: NewResource) -> Result<Resource> {
        self.inner.create_resource(new).await
    }

    async fn create_literal(&mut self, new: NewThing) -> Result<Literal> {
        self.inner.create_literal(new).await
    }

    async fn create_predicate(&mut self, new: NewThing) -> Result<Predicate> {
        self.inner.create_predicate(new).await
    }

    async fn create_class(&mut self, new: NewThing) -> Result<Class> {
        self.inner.create_class(new).await
    }

    async fn find_thing(&self, id: &ThingId) -> Result<Option<Thing>> {
        self.inner.find_thing(id).await
    }

    async fn list_things(&self, filter: &ThingFilter) -> Result<Vec<Thing>> {
        self.inner.list_things(filter).await
    }

    async fn update_resource(&mut self, id: &ThingId, update: ResourceUpdate) -> Result<Resource> {
        self.inner.update_resource(id, update).await
    }

    async fn delete_thing(&mut self, id: &ThingId) -> Result<()> {
        self.inner.delete_thing(id).await
    }

    async fn create_statement(&mut self, new: NewStatement) -> Result<Statement> {
        self.inner.create_statement(new).await
    }

    async fn find_statement(&self, id: &StatementId) -> Result<Option<Statement>> {
        self.inner.find_statement(id).await
    }

    async fn find_statements(&self, filter: &StatementFilter) -> Result<Vec<Statement>> {
        self.inner.find_statements(filter).await
    }

    async fn update_statement(
        &mut self,
        id: &StatementId,
        update: StatementUpdate,
    ) -> Result<Statement> {
        self.inner.update_statement(id, update).await
    }

    async fn delete_statements(&mut self, ids: &[StatementId]) -> Result<usize> {
        self.inner.delete_statements(ids).await
    }

    async fn count_incoming_statements(&self, id: &ThingId) -> Result<usize> {
        self.inner.count_incoming_statements(id).await
    }

    async fn count_incoming_statements_batch(
        &self,
        ids: &[ThingId],
    ) -> Result<HashMap<ThingId, usize>> {
        self.inner.count_incoming_statements_batch(ids).await
    }

    async fn fetch_subgraph(
        &self,
        root: &ThingId,
        config: &BundleConfiguration,
    ) -> Result<Vec<Statement>> {
        self.inner.fetch_subgraph(root, config).await
    }

    async fn count_statements_recursive(&self, root: &ThingId) -> Result<usize> {
        self.inner.count_statements_recursive(root).await
    }

    async fn export_snapshot(&self) -> Result<GraphSnapshot> {
        self.inner.export_snapshot().await
    }

    async fn import_snapshot(&mut self, snapshot: GraphSnapshot) -> Result<Vec<LoadWarning>> {
        self.inner.import_snapshot(snapshot).await
    }

    async fn save(&self) -> Result<()> {
        in_memory::save_to_jsonl(self.inner.as_ref(), &self.path).await
    }

    async fn reload(&mut self) -> Result<()> {
        self.inner = load_or_empty(&self.path).await?;
        Ok(())
    }
}

async fn load_or_empty(path: &Path) -> Result<Box<dyn GraphStorage>> {
    if !path.exists() {
        return Ok(in_memory::new_in_memory_storage());
    }
    let (storage, warnings) = in_memory::load_from_jsonl(path).await?;
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Graph snapshot load warning");
    }
    Ok(storage)
}

/// Create a storage instance for the given backend.
///
/// A missing JSONL file is treated as an empty graph; it is created on the
/// first `save()`.
///
/// # Errors
///
/// Returns an error if an existing snapshot file cannot be read.
pub async fn create_storage(backend: StorageBackend) -> Result<Box<dyn GraphStorage>> {
    match backend {
        StorageBackend::InMemory => Ok(in_memory::new_in_memory_storage()),
        StorageBackend::Jsonl(path) => {
            let inner = load_or_empty(&path).await?;
            Ok(Box::new(JsonlBackedStorage { inner, path }))
        }
    }
}

/// Fetches a thing that must exist.
///
/// # Errors
///
/// Returns [`Error::ThingNotFound`] when there is no thing with this id.
pub async fn require_thing(storage: &dyn GraphStorage, id: &ThingId) -> Result<Thing> {
    storage
        .find_thing(id)
        .await?
        .ok_or_else(|| Error::ThingNotFound(id.clone()))
}

/// Fetches a resource that must exist.
///
/// # Errors
///
/// Returns [`Error::ResourceNotFound`] when the id is unknown or not a resource.
pub async fn require_resource(storage: &dyn GraphStorage, id: &ThingId) -> Result<Resource> {
    match storage.find_thing(id).await? {
        Some(Thing::Resource(resource)) => Ok(resource),
        _ => Err(Error::ResourceNotFound(id.clone())),
    }
}
