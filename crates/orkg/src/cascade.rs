//! Cascade Planner: what deleting a root removes.
//!
//! Starting at the root, the planner walks statements whose predicate is an
//! *owning* predicate (by default `hasContribution`, `hasAuthors` and
//! `hasListElement`). A resource reached this way belongs to the root only if
//! the linking statement is its sole incoming statement; such resources are
//! deleted together with all of their outgoing statements and explored
//! further. Resources with more incoming statements are shared: only the
//! linking statement goes, the resource and everything below it stays.
//!
//! Planning is a pure function of the grouped statements and the incoming
//! counts, so it can be previewed (`orkg plan-delete`) before anything is
//! removed with [`apply_plan`].

use crate::domain::{StatementId, ThingId, default_owning_predicates};
use crate::error::{Error, Result};
use crate::fetcher::{GroupedStatements, fetch_with_incoming_counts};
use crate::storage::GraphStorage;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Statements and resources to delete for one root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionPlan {
    /// The root the plan was made for
    pub root: ThingId,
    /// Statements to delete, in id order
    pub statements: Vec<StatementId>,
    /// Resources to delete (root included), in id order
    pub resources: Vec<ThingId>,
    /// Resources reached through an owning predicate but kept because
    /// something else refers to them
    pub shared: Vec<ThingId>,
}

impl DeletionPlan {
    fn empty(root: &ThingId) -> Self {
        Self {
            root: root.clone(),
            statements: Vec::new(),
            resources: Vec::new(),
            shared: Vec::new(),
        }
    }

    /// Whether the plan deletes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.resources.is_empty()
    }

    /// Whether `id` is scheduled for deletion.
    #[must_use]
    pub fn deletes_resource(&self, id: &ThingId) -> bool {
        self.resources.binary_search(id).is_ok()
    }
}

/// Plans cascade deletes along a set of owning predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePlanner {
    owning: BTreeSet<ThingId>,
}

impl Default for CascadePlanner {
    fn default() -> Self {
        Self::new(default_owning_predicates())
    }
}

impl CascadePlanner {
    /// A planner following the given owning predicates.
    pub fn new<I>(owning: I) -> Self
    where
        I: IntoIterator<Item = ThingId>,
    {
        Self {
            owning: owning.into_iter().collect(),
        }
    }

    /// This planner, also following `extra` owning predicates.
    #[must_use]
    pub fn with_owning<I>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = ThingId>,
    {
        let mut owning = self.owning.clone();
        owning.extend(extra);
        Self { owning }
    }

    /// Whether `predicate` transfers ownership from subject to object.
    #[must_use]
    pub fn is_owning(&self, predicate: &ThingId) -> bool {
        self.owning.contains(predicate)
    }

    /// Computes the deletion plan for `root`.
    ///
    /// `graph` must contain at least the root's owned subgraph and `incoming`
    /// the incoming-statement count of every object in it; a missing count is
    /// taken as 0. If `root` has no statements in `graph` the plan is empty.
    #[must_use]
    pub fn plan(
        &self,
        root: &ThingId,
        graph: &GroupedStatements,
        incoming: &HashMap<ThingId, usize>,
    ) -> DeletionPlan {
        if !graph.contains_subject(root) {
            tracing::debug!(root = %root, "Root not found, nothing to plan");
            return DeletionPlan::empty(root);
        }

        let mut statements: BTreeSet<StatementId> = BTreeSet::new();
        let mut resources: BTreeSet<ThingId> = BTreeSet::from([root.clone()]);
        let mut shared: BTreeSet<ThingId> = BTreeSet::new();
        let mut queue: VecDeque<&ThingId> = VecDeque::from([root]);

        while let Some(node) = queue.pop_front() {
            for statement in graph.outgoing(node) {
                statements.insert(statement.id.clone());

                if !self.is_owning(&statement.predicate) {
                    continue;
                }
                let child = &statement.object;
                if resources.contains(child) || shared.contains(child) {
                    continue;
                }

                let count = incoming.get(child).copied().unwrap_or(0);
                if count <= 1 {
                    resources.insert(child.clone());
                    queue.push_back(child);
                } else {
                    tracing::debug!(child = %child, incoming = count, "Keeping shared resource");
                    shared.insert(child.clone());
                }
            }
        }

        DeletionPlan {
            root: root.clone(),
            statements: statements.into_iter().collect(),
            resources: resources.into_iter().collect(),
            shared: shared.into_iter().collect(),
        }
    }

    /// Fetches what the planner needs from `storage` and plans `root`.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub async fn plan_from_storage(
        &self,
        storage: &dyn GraphStorage,
        root: &ThingId,
    ) -> Result<DeletionPlan> {
        let (graph, incoming) = fetch_with_incoming_counts(storage, root).await?;
        Ok(self.plan(root, &graph, &incoming))
    }
}

/// Outcome of [`apply_plan`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    /// Number of statements removed
    pub statements_deleted: usize,
    /// Resources removed
    pub resources_deleted: Vec<ThingId>,
    /// Resources left in place because a statement still refers to them
    pub resources_skipped: Vec<ThingId>,
}

/// Deletes the plan's statements, then its resources.
///
/// A resource that is still referenced once its planned statements are gone
/// is skipped with a warning instead of failing the whole delete.
///
/// # Errors
///
/// Propagates storage errors other than a resource still being in use.
pub async fn apply_plan(
    storage: &mut dyn GraphStorage,
    plan: &DeletionPlan,
) -> Result<DeletionReport> {
    let mut report = DeletionReport {
        statements_deleted: storage.delete_statements(&plan.statements).await?,
        ..DeletionReport::default()
    };

    for id in &plan.resources {
        match storage.delete_thing(id).await {
            Ok(()) => report.resources_deleted.push(id.clone()),
            Err(Error::ResourceUsedInStatement(_)) => {
                tracing::warn!(id = %id, "Resource still referenced, not deleted");
                report.resources_skipped.push(id.clone());
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        root = %plan.root,
        statements = report.statements_deleted,
        resources = report.resources_deleted.len(),
        "Applied deletion plan"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Statement, predicates};
    use chrono::Utc;

    fn statement(id: &str, s: &str, p: &str, o: &str) -> Statement {
        Statement {
            id: id.into(),
            subject: s.into(),
            predicate: p.into(),
            object: o.into(),
            index: None,
            created_at: Utc::now(),
            created_by: Default::default(),
            modifiable: true,
        }
    }

    fn counts(pairs: &[(&str, usize)]) -> HashMap<ThingId, usize> {
        pairs.iter().map(|(id, n)| (ThingId::new(*id), *n)).collect()
    }

    fn ids(values: &[&str]) -> Vec<ThingId> {
        values.iter().map(|v| ThingId::new(*v)).collect()
    }

    #[test]
    fn test_unknown_root_is_noop() {
        let graph = GroupedStatements::from_statements(vec![statement("S1", "R1", "P31", "R2")]);
        let plan = CascadePlanner::default().plan(&"R9".into(), &graph, &HashMap::new());
        assert!(plan.is_empty());
        assert_eq!(plan.root, ThingId::new("R9"));
    }

    #[test]
    fn test_exclusive_children_are_deleted_recursively() {
        let graph = GroupedStatements::from_statements(vec![
            statement("S1", "paper", predicates::HAS_CONTRIBUTION, "contrib"),
            statement("S2", "paper", predicates::HAS_AUTHORS, "list"),
            statement("S3", "list", predicates::HAS_LIST_ELEMENT, "author"),
            statement("S4", "contrib", predicates::HAS_RESEARCH_PROBLEM, "problem"),
        ]);
        let incoming = counts(&[("contrib", 1), ("list", 1), ("author", 1), ("problem", 4)]);

        let plan = CascadePlanner::default().plan(&"paper".into(), &graph, &incoming);

        assert_eq!(plan.resources, ids(&["author", "contrib", "list", "paper"]));
        assert_eq!(plan.statements.len(), 4);
        assert!(!plan.deletes_resource(&"problem".into()));
        assert!(plan.shared.is_empty());
    }

    #[test]
    fn test_shared_child_keeps_its_subgraph() {
        let graph = GroupedStatements::from_statements(vec![
            statement("S1", "paper", predicates::HAS_AUTHORS, "list"),
            statement("S2", "list", predicates::HAS_LIST_ELEMENT, "author"),
        ]);
        let incoming = counts(&[("list", 2), ("author", 1)]);

        let plan = CascadePlanner::default().plan(&"paper".into(), &graph, &incoming);

        assert_eq!(plan.resources, ids(&["paper"]));
        assert_eq!(plan.statements, vec![StatementId::new("S1")]);
        assert_eq!(plan.shared, ids(&["list"]));
    }

    #[test]
    fn test_non_owning_predicates_are_not_followed() {
        let graph = GroupedStatements::from_statements(vec![
            statement("S1", "paper", predicates::HAS_RESEARCH_FIELD, "field"),
            statement("S2", "field", predicates::HAS_SUBFIELD, "sub"),
        ]);
        let incoming = counts(&[("field", 1), ("sub", 1)]);

        let plan = CascadePlanner::default().plan(&"paper".into(), &graph, &incoming);

        assert_eq!(plan.resources, ids(&["paper"]));
        assert_eq!(plan.statements, vec![StatementId::new("S1")]);
    }

    #[test]
    fn test_cycles_terminate() {
        let graph = GroupedStatements::from_statements(vec![
            statement("S1", "a", predicates::HAS_LIST_ELEMENT, "b"),
            statement("S2", "b", predicates::HAS_LIST_ELEMENT, "a"),
        ]);
        let incoming = counts(&[("a", 1), ("b", 1)]);

        let plan = CascadePlanner::default().plan(&"a".into(), &graph, &incoming);

        assert_eq!(plan.resources, ids(&["a", "b"]));
        assert_eq!(plan.statements.len(), 2);
    }

    #[test]
    fn test_custom_owning_predicates() {
        let graph = GroupedStatements::from_statements(vec![statement(
            "S1",
            "list",
            predicates::HAS_SECTION,
            "section",
        )]);
        let incoming = counts(&[("section", 1)]);
        let planner = CascadePlanner::new([ThingId::new(predicates::HAS_SECTION)]);

        let plan = planner.plan(&"list".into(), &graph, &incoming);

        assert!(plan.deletes_resource(&"section".into()));
        assert!(!CascadePlanner::default().is_owning(&predicates::HAS_SECTION.into()));
    }

    #[test]
    fn test_section_planner_follows_entries_not_links() {
        let graph = GroupedStatements::from_statements(vec![
            statement("S1", "section", predicates::HAS_ENTRY, "entry"),
            statement("S2", "entry", predicates::HAS_LINK, "paper"),
            statement("S3", "paper", predicates::HAS_CONTRIBUTION, "contrib"),
        ]);
        let incoming = counts(&[("entry", 1), ("paper", 1), ("contrib", 1)]);
        let planner =
            CascadePlanner::default().with_owning(crate::domain::section_owning_predicates());

        let plan = planner.plan(&"section".into(), &graph, &incoming);

        assert_eq!(plan.resources, ids(&["entry", "section"]));
        assert_eq!(plan.statements, vec![StatementId::new("S1"), StatementId::new("S2")]);
        assert!(planner.is_owning(&predicates::HAS_LIST_ELEMENT.into()));
        assert!(!CascadePlanner::default().is_owning(&predicates::HAS_ENTRY.into()));
    }
}
