//! In-memory storage backend using `HashMap`s and petgraph.
//!
//! All data is held in RAM. Combined with [`load_from_jsonl`] and
//! [`save_to_jsonl`] it backs the persistent JSONL storage; on its own it is
//! an ephemeral store for tests and one-off sessions.
//!
//! # Architecture
//!
//! - `HashMap<ThingId, Thing>` and `HashMap<StatementId, Statement>` for O(1) lookups
//! - `petgraph::stable_graph::StableDiGraph<ThingId, StatementId>` with one
//!   node per thing and one edge per statement, directed subject -> object
//! - `node_map`/`edge_map` from ids to graph indices. The stable graph keeps
//!   indices valid across removals, so the maps never need rebuilding.
//!
//! Literal objects are ordinary nodes without outgoing edges. Predicates are
//! nodes too, but statements do not connect to them; predicate usage is
//! tracked by a counter instead.
//!
//! # Thread Safety
//!
//! The storage is wrapped in `Arc<tokio::sync::Mutex<InMemoryStorageInner>>`;
//! every trait method holds the lock for its whole duration, which gives each
//! call the isolation of a single transaction.
//!
//! # Performance Characteristics
//!
//! - Create / lookup / delete by id: O(1)
//! - Incoming statement count: O(in-degree)
//! - Statements by subject or object: O(degree log degree) (sorted output)
//! - Subgraph fetch: O(n + e) of the visited subgraph

mod graph;
mod inner;
mod jsonl;
mod trait_impl;

use crate::storage::GraphStorage;
use inner::InMemoryStorageInner;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use jsonl::{LoadWarning, load_from_jsonl, save_to_jsonl};

/// Thread-safe in-memory storage, implementing [`GraphStorage`] in `trait_impl.rs`.
pub(crate) type InMemoryStorage = Arc<Mutex<InMemoryStorageInner>>;

/// Create a new, empty in-memory storage instance.
///
/// # Example
///
/// ```
/// use orkg::storage::in_memory::new_in_memory_storage;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let storage = new_in_memory_storage();
///     let snapshot = storage.export_snapshot().await.unwrap();
///     assert!(snapshot.things.is_empty());
/// }
/// ```
#[must_use]
pub fn new_in_memory_storage() -> Box<dyn GraphStorage> {
    Box::new(Arc::new(Mutex::new(InMemoryStorageInner::new())))
}
