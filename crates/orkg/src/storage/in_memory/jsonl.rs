//! JSONL persistence for in-memory storage.
//!
//! A snapshot file holds one [`GraphRecord`] per line: id counters first,
//! then all things, then all statements. Loading is resilient; anything that
//! can not be restored is skipped and reported as a [`LoadWarning`].
//!
//! [`restore_snapshot`] is shared with `import_snapshot`, so a file load and
//! an in-process import apply the same checks.

use super::inner::InMemoryStorageInner;
use crate::domain::{GraphRecord, GraphSnapshot, StatementId, Thing, ThingId};
use crate::error::Result;
use crate::storage::GraphStorage;
use orkg_jsonl::{Warning as JsonlWarning, read_jsonl_resilient, write_jsonl_atomic_iter};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Non-fatal problems found while loading a snapshot.
///
/// The affected line is skipped; everything else is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The line is not a valid record.
    MalformedJson {
        /// 1-based line number
        line_number: usize,
        /// Parser message
        error: String,
    },

    /// The line was skipped by the JSONL reader (e.g. oversized).
    SkippedLine {
        /// 1-based line number
        line_number: usize,
        /// Reader's reason
        reason: String,
    },

    /// A second thing with an id already loaded. The first one wins.
    DuplicateThing {
        /// The repeated id
        id: ThingId,
    },

    /// A second statement with an id already loaded. The first one wins.
    DuplicateStatement {
        /// The repeated id
        id: StatementId,
    },

    /// A statement refers to a thing that is not in the file.
    DanglingStatement {
        /// The skipped statement
        id: StatementId,
        /// Why it could not be restored
        reason: String,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: malformed record: {error}")
            }
            Self::SkippedLine {
                line_number,
                reason,
            } => write!(f, "line {line_number}: skipped: {reason}"),
            Self::DuplicateThing { id } => write!(f, "duplicate thing {id} ignored"),
            Self::DuplicateStatement { id } => write!(f, "duplicate statement {id} ignored"),
            Self::DanglingStatement { id, reason } => {
                write!(f, "statement {id} skipped: {reason}")
            }
        }
    }
}

impl From<JsonlWarning> for LoadWarning {
    fn from(warning: JsonlWarning) -> Self {
        match warning {
            JsonlWarning::MalformedJson { line_number, error } => {
                Self::MalformedJson { line_number, error }
            }
            JsonlWarning::SkippedLine {
                line_number,
                reason,
            } => Self::SkippedLine {
                line_number,
                reason,
            },
        }
    }
}

/// Load storage from a JSONL snapshot file.
///
/// Things are restored before statements regardless of their order in the
/// file, so a hand-edited file with statements first still loads. All
/// restored ids are registered with the id generator, and saved counters
/// keep ids of deleted things retired.
///
/// # Errors
///
/// Returns an error only if the file can not be read at all.
pub async fn load_from_jsonl(path: &Path) -> Result<(Box<dyn GraphStorage>, Vec<LoadWarning>)> {
    let (records, jsonl_warnings) = read_jsonl_resilient::<GraphRecord, _>(path).await?;
    let mut warnings: Vec<LoadWarning> = jsonl_warnings.into_iter().map(Into::into).collect();

    let inner = restore_snapshot(GraphSnapshot::from_records(records), &mut warnings);

    tracing::info!(
        path = %path.display(),
        things = inner.things.len(),
        statements = inner.statements.len(),
        warnings = warnings.len(),
        "Loaded graph snapshot"
    );

    Ok((Box::new(Arc::new(Mutex::new(inner))), warnings))
}

/// Builds fresh storage contents from `snapshot`, skipping what can not be
/// restored and appending a warning for it.
pub(super) fn restore_snapshot(
    snapshot: GraphSnapshot,
    warnings: &mut Vec<LoadWarning>,
) -> InMemoryStorageInner {
    let mut inner = InMemoryStorageInner::new();
    for (prefix, value) in snapshot.counters {
        inner.id_generator.advance_counter(prefix, value);
    }

    for thing in snapshot.things {
        if inner.things.contains_key(thing.id()) {
            warnings.push(LoadWarning::DuplicateThing {
                id: thing.id().clone(),
            });
            continue;
        }
        inner.insert_thing(thing);
    }

    for statement in snapshot.statements {
        if inner.statements.contains_key(&statement.id) {
            warnings.push(LoadWarning::DuplicateStatement {
                id: statement.id.clone(),
            });
            continue;
        }
        if let Some(Thing::Literal(_)) = inner.things.get(&statement.subject) {
            warnings.push(LoadWarning::DanglingStatement {
                id: statement.id.clone(),
                reason: format!("subject {} is a literal", statement.subject),
            });
            continue;
        }
        let id = statement.id.clone();
        if let Err(e) = inner.insert_statement(statement) {
            warnings.push(LoadWarning::DanglingStatement {
                id,
                reason: e.to_string(),
            });
        }
    }

    inner
}

/// Save storage to a JSONL snapshot file, atomically.
///
/// # Errors
///
/// Returns an error if the snapshot can not be exported or written.
pub async fn save_to_jsonl(storage: &dyn GraphStorage, path: &Path) -> Result<()> {
    let snapshot = storage.export_snapshot().await?;
    let things = snapshot.things.len();
    let statements = snapshot.statements.len();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    write_jsonl_atomic_iter(path, snapshot.into_records()).await?;

    tracing::debug!(path = %path.display(), things, statements, "Saved graph snapshot");
    Ok(())
}
