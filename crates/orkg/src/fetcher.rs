//! Graph Fetcher: the statements reachable from a root, grouped by subject.
//!
//! This is the input format of both the cascade planner and the aggregators.
//! The fetcher only reads; deciding what the statements mean is left to the
//! consumers.

use crate::domain::{BundleConfiguration, Statement, StatementId, ThingId};
use crate::error::Result;
use crate::storage::GraphStorage;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Statements keyed by subject id, each group in statement-id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupedStatements {
    by_subject: BTreeMap<ThingId, Vec<Statement>>,
}

impl GroupedStatements {
    /// Groups `statements` by subject.
    ///
    /// The result does not depend on the order of the input.
    pub fn from_statements<I>(statements: I) -> Self
    where
        I: IntoIterator<Item = Statement>,
    {
        let mut by_subject: BTreeMap<ThingId, Vec<Statement>> = BTreeMap::new();
        for statement in statements {
            by_subject
                .entry(statement.subject.clone())
                .or_default()
                .push(statement);
        }
        for group in by_subject.values_mut() {
            group.sort_by(|a, b| a.id.cmp(&b.id));
            group.dedup_by(|a, b| a.id == b.id);
        }
        Self { by_subject }
    }

    /// Outgoing statements of `subject`; empty if it has none.
    #[must_use]
    pub fn outgoing(&self, subject: &ThingId) -> &[Statement] {
        self.by_subject.get(subject).map_or(&[], Vec::as_slice)
    }

    /// Whether `subject` has at least one statement.
    #[must_use]
    pub fn contains_subject(&self, subject: &ThingId) -> bool {
        self.by_subject.contains_key(subject)
    }

    /// Subjects in id order.
    pub fn subjects(&self) -> impl Iterator<Item = &ThingId> {
        self.by_subject.keys()
    }

    /// All statements, grouped by subject in id order.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.by_subject.values().flatten()
    }

    /// All statement ids.
    #[must_use]
    pub fn statement_ids(&self) -> Vec<StatementId> {
        self.statements().map(|s| s.id.clone()).collect()
    }

    /// Every thing appearing as an object.
    #[must_use]
    pub fn objects(&self) -> Vec<ThingId> {
        let mut objects: Vec<ThingId> = self.statements().map(|s| s.object.clone()).collect();
        objects.sort();
        objects.dedup();
        objects
    }

    /// Total number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_subject.values().map(Vec::len).sum()
    }

    /// Whether there are no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_subject.is_empty()
    }
}

/// Fetches the transitive closure below `root`, filtered by `config`.
///
/// An unknown root yields an empty grouping.
///
/// # Errors
///
/// Propagates storage errors.
pub async fn fetch_closure(
    storage: &dyn GraphStorage,
    root: &ThingId,
    config: &BundleConfiguration,
) -> Result<GroupedStatements> {
    let statements = storage.fetch_subgraph(root, config).await?;
    Ok(GroupedStatements::from_statements(statements))
}

/// Fetches the closure below `root` with the incoming-statement count of
/// every object in it, as needed by the cascade planner.
///
/// # Errors
///
/// Propagates storage errors.
pub async fn fetch_with_incoming_counts(
    storage: &dyn GraphStorage,
    root: &ThingId,
) -> Result<(GroupedStatements, HashMap<ThingId, usize>)> {
    let grouped = fetch_closure(storage, root, &BundleConfiguration::unbounded()).await?;
    let counts = storage
        .count_incoming_statements_batch(&grouped.objects())
        .await?;
    Ok((grouped, counts))
}
