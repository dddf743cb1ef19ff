//! Subgraph traversal over the petgraph index.
//!
//! Both traversals are breadth-first from a root, following statements from
//! subject to object. Each node is expanded at most once, so cycles terminate
//! and every statement is reported at most once.

use super::inner::InMemoryStorageInner;
use crate::domain::{BundleConfiguration, Statement, StatementId, Thing, ThingId, classes};
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::collections::{HashSet, VecDeque};

/// Classes whose instances are separate content roots; recursive statement
/// counts do not descend into them.
const COUNT_BOUNDARY_CLASSES: [&str; 3] =
    [classes::PAPER, classes::PROBLEM, classes::RESEARCH_FIELD];

fn has_any_class(thing: Option<&Thing>, wanted: &[impl AsRef<str>]) -> bool {
    thing.is_some_and(|t| wanted.iter().any(|c| t.has_class(c.as_ref())))
}

/// Statements of the subgraph below `root`, filtered by `config`, in id order.
pub(super) fn fetch_subgraph_impl(
    inner: &InMemoryStorageInner,
    root: &ThingId,
    config: &BundleConfiguration,
) -> Vec<Statement> {
    let Some(&start) = inner.node_map.get(root) else {
        return Vec::new();
    };

    let mut collected: Vec<&StatementId> = Vec::new();
    let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
    let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::from([(start, 1)]);

    while let Some((node, level)) = queue.pop_front() {
        for edge in inner.graph.edges(node) {
            let target = edge.target();
            let object = inner.things.get(&inner.graph[target]);

            if has_any_class(object, &config.blacklist) {
                continue;
            }
            if !config.whitelist.is_empty()
                && !object.is_some_and(Thing::is_literal)
                && !has_any_class(object, &config.whitelist)
            {
                continue;
            }

            if config.includes_level(level) {
                collected.push(edge.weight());
            }
            if config.descends_past(level) && visited.insert(target) {
                queue.push_back((target, level + 1));
            }
        }
    }

    tracing::debug!(
        root = %root,
        statements = collected.len(),
        visited = visited.len(),
        "Fetched subgraph"
    );
    inner.sorted_statements(collected)
}

/// Number of statements in the subgraph of a paper.
///
/// Statements pointing at papers, problems or fields are counted, but the
/// traversal does not continue into them.
pub(super) fn count_recursive_impl(
    inner: &InMemoryStorageInner,
    root: &ThingId,
) -> usize {
    let Some(&start) = inner.node_map.get(root) else {
        return 0;
    };

    let mut count = 0;
    let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
    let mut queue: VecDeque<NodeIndex> = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        for edge in inner.graph.edges(node) {
            count += 1;
            let target = edge.target();
            let object = inner.things.get(&inner.graph[target]);
            if has_any_class(object, &COUNT_BOUNDARY_CLASSES) {
                continue;
            }
            if visited.insert(target) {
                queue.push_back(target);
            }
        }
    }
    count
}
