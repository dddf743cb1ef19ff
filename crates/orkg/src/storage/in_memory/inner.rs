//! Core in-memory storage data structures.

use crate::domain::{
    Statement, StatementId, Thing, ThingId, ThingKind, validate_thing_id,
};
use crate::error::{Error, Result};
use crate::id_generation::IdGenerator;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use std::collections::HashMap;

/// Inner storage structure (not thread-safe).
///
/// Invariants:
/// - every key of `things` has a node in `node_map`, and vice versa
/// - every key of `statements` has an edge in `edge_map`, and vice versa
/// - every statement's subject, predicate and object are keys of `things`
pub(crate) struct InMemoryStorageInner {
    pub(super) things: HashMap<ThingId, Thing>,

    pub(super) statements: HashMap<StatementId, Statement>,

    /// Nodes are thing ids, edges are statement ids, directed subject -> object.
    pub(super) graph: StableDiGraph<ThingId, StatementId>,

    pub(super) node_map: HashMap<ThingId, NodeIndex>,

    pub(super) edge_map: HashMap<StatementId, EdgeIndex>,

    /// Number of statements using each predicate
    pub(super) predicate_usage: HashMap<ThingId, usize>,

    pub(super) id_generator: IdGenerator,
}

impl InMemoryStorageInner {
    pub(crate) fn new() -> Self {
        Self {
            things: HashMap::new(),
            statements: HashMap::new(),
            graph: StableDiGraph::new(),
            node_map: HashMap::new(),
            edge_map: HashMap::new(),
            predicate_usage: HashMap::new(),
            id_generator: IdGenerator::new(),
        }
    }

    /// Reserves an id for a new thing: the fixed one if free, else a generated one.
    pub(super) fn allocate_thing_id(
        &mut self,
        fixed: Option<ThingId>,
        kind: ThingKind,
    ) -> Result<ThingId> {
        match fixed {
            Some(id) => {
                validate_thing_id(id.as_str()).map_err(Error::Validation)?;
                if self.things.contains_key(&id) {
                    return Err(Error::ThingAlreadyExists(id));
                }
                self.id_generator.register_id(id.as_str());
                Ok(id)
            }
            None => Ok(ThingId::new(self.id_generator.next_id(kind.id_prefix()))),
        }
    }

    pub(super) fn allocate_statement_id(&mut self) -> StatementId {
        StatementId::new(self.id_generator.next_id('S'))
    }

    /// Adds a thing and its graph node. The id must not be present.
    pub(super) fn insert_thing(&mut self, thing: Thing) {
        let id = thing.id().clone();
        let node = self.graph.add_node(id.clone());
        self.node_map.insert(id.clone(), node);
        self.id_generator.register_id(id.as_str());
        self.things.insert(id, thing);
    }

    /// Adds a statement and its graph edge.
    ///
    /// # Errors
    ///
    /// [`Error::ThingNotFound`] if subject or object is unknown, and
    /// [`Error::PredicateNotFound`] if the predicate is unknown or not a predicate.
    pub(super) fn insert_statement(&mut self, statement: Statement) -> Result<()> {
        let subject = *self
            .node_map
            .get(&statement.subject)
            .ok_or_else(|| Error::ThingNotFound(statement.subject.clone()))?;
        let object = *self
            .node_map
            .get(&statement.object)
            .ok_or_else(|| Error::ThingNotFound(statement.object.clone()))?;
        if !matches!(self.things.get(&statement.predicate), Some(Thing::Predicate(_))) {
            return Err(Error::PredicateNotFound(statement.predicate.clone()));
        }

        let edge = self.graph.add_edge(subject, object, statement.id.clone());
        self.edge_map.insert(statement.id.clone(), edge);
        *self
            .predicate_usage
            .entry(statement.predicate.clone())
            .or_insert(0) += 1;
        self.id_generator.register_id(statement.id.as_str());
        self.statements.insert(statement.id.clone(), statement);
        Ok(())
    }

    pub(super) fn remove_statement(&mut self, id: &StatementId) -> Option<Statement> {
        let statement = self.statements.remove(id)?;
        if let Some(edge) = self.edge_map.remove(id) {
            self.graph.remove_edge(edge);
        }
        if let Some(count) = self.predicate_usage.get_mut(&statement.predicate) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.predicate_usage.remove(&statement.predicate);
            }
        }
        self.id_generator.release_id(id.as_str());
        Some(statement)
    }

    /// Whether any statement uses `id` as subject, object or predicate.
    pub(super) fn is_referenced(&self, id: &ThingId) -> bool {
        if self.predicate_usage.contains_key(id) {
            return true;
        }
        self.node_map.get(id).is_some_and(|&node| {
            self.graph
                .neighbors_directed(node, Direction::Incoming)
                .next()
                .is_some()
                || self
                    .graph
                    .neighbors_directed(node, Direction::Outgoing)
                    .next()
                    .is_some()
        })
    }

    pub(super) fn remove_thing(&mut self, id: &ThingId) -> Option<Thing> {
        let thing = self.things.remove(id)?;
        if let Some(node) = self.node_map.remove(id) {
            self.graph.remove_node(node);
        }
        self.id_generator.release_id(id.as_str());
        Some(thing)
    }

    pub(super) fn incoming_count(&self, id: &ThingId) -> usize {
        self.node_map.get(id).map_or(0, |&node| {
            self.graph.edges_directed(node, Direction::Incoming).count()
        })
    }

    /// Clones the statements for the given edge ids, sorted by statement id.
    pub(super) fn sorted_statements<'a, I>(&self, ids: I) -> Vec<Statement>
    where
        I: IntoIterator<Item = &'a StatementId>,
    {
        let mut result: Vec<Statement> = ids
            .into_iter()
            .filter_map(|id| self.statements.get(id).cloned())
            .collect();
        result.sort_by(|a, b| a.id.cmp(&b.id));
        result
    }
}
