//! `GraphStorage` trait implementation for in-memory storage.

use super::InMemoryStorage;
use super::graph::{count_recursive_impl, fetch_subgraph_impl};
use super::jsonl::{LoadWarning, restore_snapshot};
use crate::domain::{
    BundleConfiguration, Class, DEFAULT_LITERAL_DATATYPE, GraphSnapshot, Literal, NewResource,
    NewStatement, NewThing, Predicate, Resource, ResourceUpdate, Statement, StatementFilter,
    StatementId, StatementUpdate, Thing, ThingFilter, ThingId, ThingKind,
};
use crate::error::{Error, Result};
use crate::storage::GraphStorage;
use async_trait::async_trait;
use chrono::Utc;
use petgraph::Direction;
use std::collections::HashMap;

#[async_trait]
impl GraphStorage for InMemoryStorage {
    async fn create_resource(&mut self, new: NewResource) -> Result<Resource> {
        let mut inner = self.lock().await;
        let id = inner.allocate_thing_id(new.id, ThingKind::Resource)?;
        let resource = Resource {
            id,
            label: new.label,
            classes: new.classes,
            created_at: Utc::now(),
            created_by: new.created_by,
            modifiable: new.modifiable,
        };
        inner.insert_thing(Thing::Resource(resource.clone()));
        tracing::debug!(id = %resource.id, "Created resource");
        Ok(resource)
    }

    async fn create_literal(&mut self, new: NewThing) -> Result<Literal> {
        let mut inner = self.lock().await;
        let id = inner.allocate_thing_id(new.id, ThingKind::Literal)?;
        let literal = Literal {
            id,
            label: new.label,
            datatype: new
                .extra
                .unwrap_or_else(|| DEFAULT_LITERAL_DATATYPE.to_string()),
            created_at: Utc::now(),
            created_by: new.created_by,
            modifiable: true,
        };
        inner.insert_thing(Thing::Literal(literal.clone()));
        Ok(literal)
    }

    async fn create_predicate(&mut self, new: NewThing) -> Result<Predicate> {
        let mut inner = self.lock().await;
        let id = inner.allocate_thing_id(new.id, ThingKind::Predicate)?;
        let predicate = Predicate {
            id,
            label: new.label,
            created_at: Utc::now(),
            created_by: new.created_by,
            modifiable: true,
        };
        inner.insert_thing(Thing::Predicate(predicate.clone()));
        Ok(predicate)
    }

    async fn create_class(&mut self, new: NewThing) -> Result<Class> {
        let mut inner = self.lock().await;
        let id = inner.allocate_thing_id(new.id, ThingKind::Class)?;
        let class = Class {
            id,
            label: new.label,
            uri: new.extra,
            created_at: Utc::now(),
            created_by: new.created_by,
            modifiable: true,
        };
        inner.insert_thing(Thing::Class(class.clone()));
        Ok(class)
    }

    async fn find_thing(&self, id: &ThingId) -> Result<Option<Thing>> {
        let inner = self.lock().await;
        Ok(inner.things.get(id).cloned())
    }

    async fn list_things(&self, filter: &ThingFilter) -> Result<Vec<Thing>> {
        let inner = self.lock().await;
        let mut things: Vec<Thing> = inner
            .things
            .values()
            .filter(|thing| filter.matches(thing))
            .cloned()
            .collect();
        things.sort_by(|a, b| a.id().cmp(b.id()));
        if let Some(limit) = filter.limit {
            things.truncate(limit);
        }
        Ok(things)
    }

    async fn update_resource(&mut self, id: &ThingId, update: ResourceUpdate) -> Result<Resource> {
        let mut inner = self.lock().await;
        let Some(Thing::Resource(resource)) = inner.things.get_mut(id) else {
            return Err(Error::ResourceNotFound(id.clone()));
        };
        if let Some(label) = update.label {
            resource.label = label;
        }
        if let Some(classes) = update.classes {
            resource.classes = classes;
        }
        Ok(resource.clone())
    }

    async fn delete_thing(&mut self, id: &ThingId) -> Result<()> {
        let mut inner = self.lock().await;
        if !inner.things.contains_key(id) {
            return Err(Error::ThingNotFound(id.clone()));
        }
        if inner.is_referenced(id) {
            return Err(Error::ResourceUsedInStatement(id.clone()));
        }
        inner.remove_thing(id);
        tracing::debug!(id = %id, "Deleted thing");
        Ok(())
    }

    async fn create_statement(&mut self, new: NewStatement) -> Result<Statement> {
        let mut inner = self.lock().await;
        let id = inner.allocate_statement_id();
        let statement = Statement {
            id: id.clone(),
            subject: new.subject,
            predicate: new.predicate,
            object: new.object,
            index: new.index,
            created_at: Utc::now(),
            created_by: new.created_by,
            modifiable: new.modifiable,
        };
        if let Err(e) = inner.insert_statement(statement.clone()) {
            inner.id_generator.release_id(id.as_str());
            return Err(e);
        }
        Ok(statement)
    }

    async fn find_statement(&self, id: &StatementId) -> Result<Option<Statement>> {
        let inner = self.lock().await;
        Ok(inner.statements.get(id).cloned())
    }

    async fn find_statements(&self, filter: &StatementFilter) -> Result<Vec<Statement>> {
        let inner = self.lock().await;

        // Narrow through the graph index when an endpoint is fixed
        let candidates: Vec<&StatementId> = match (&filter.subject, &filter.object) {
            (Some(subject), _) => match inner.node_map.get(subject) {
                Some(&node) => inner.graph.edges(node).map(|e| e.weight()).collect(),
                None => return Ok(Vec::new()),
            },
            (None, Some(object)) => match inner.node_map.get(object) {
                Some(&node) => inner
                    .graph
                    .edges_directed(node, Direction::Incoming)
                    .map(|e| e.weight())
                    .collect(),
                None => return Ok(Vec::new()),
            },
            (None, None) => inner.statements.keys().collect(),
        };

        let matching: Vec<&StatementId> = candidates
            .into_iter()
            .filter(|id| {
                inner
                    .statements
                    .get(*id)
                    .is_some_and(|statement| filter.matches(statement))
            })
            .collect();
        Ok(inner.sorted_statements(matching))
    }

    async fn update_statement(
        &mut self,
        id: &StatementId,
        update: StatementUpdate,
    ) -> Result<Statement> {
        let mut inner = self.lock().await;
        let Some(mut statement) = inner.remove_statement(id) else {
            return Err(Error::StatementNotFound(id.clone()));
        };
        let original = statement.clone();
        if let Some(predicate) = update.predicate {
            statement.predicate = predicate;
        }
        if let Some(object) = update.object {
            statement.object = object;
        }

        if let Err(e) = inner.insert_statement(statement.clone()) {
            // Restore the untouched statement; its endpoints were valid before
            inner.insert_statement(original)?;
            return Err(e);
        }
        Ok(statement)
    }

    async fn delete_statements(&mut self, ids: &[StatementId]) -> Result<usize> {
        let mut inner = self.lock().await;
        let removed = ids
            .iter()
            .filter(|id| inner.remove_statement(id).is_some())
            .count();
        tracing::debug!(requested = ids.len(), removed, "Deleted statements");
        Ok(removed)
    }

    async fn count_incoming_statements(&self, id: &ThingId) -> Result<usize> {
        let inner = self.lock().await;
        Ok(inner.incoming_count(id))
    }

    async fn count_incoming_statements_batch(
        &self,
        ids: &[ThingId],
    ) -> Result<HashMap<ThingId, usize>> {
        let inner = self.lock().await;
        Ok(ids
            .iter()
            .map(|id| (id.clone(), inner.incoming_count(id)))
            .collect())
    }

    async fn fetch_subgraph(
        &self,
        root: &ThingId,
        config: &BundleConfiguration,
    ) -> Result<Vec<Statement>> {
        let inner = self.lock().await;
        Ok(fetch_subgraph_impl(&inner, root, config))
    }

    async fn count_statements_recursive(&self, root: &ThingId) -> Result<usize> {
        let inner = self.lock().await;
        Ok(count_recursive_impl(&inner, root))
    }

    async fn export_snapshot(&self) -> Result<GraphSnapshot> {
        let inner = self.lock().await;
        let mut things: Vec<Thing> = inner.things.values().cloned().collect();
        things.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(GraphSnapshot {
            things,
            statements: inner.sorted_statements(inner.statements.keys()),
            counters: inner.id_generator.counters(),
        })
    }

    async fn import_snapshot(&mut self, snapshot: GraphSnapshot) -> Result<Vec<LoadWarning>> {
        let mut warnings = Vec::new();
        let restored = restore_snapshot(snapshot, &mut warnings);
        let mut inner = self.lock().await;
        *inner = restored;
        tracing::info!(
            things = inner.things.len(),
            statements = inner.statements.len(),
            warnings = warnings.len(),
            "Imported graph snapshot"
        );
        Ok(warnings)
    }

    async fn save(&self) -> Result<()> {
        // In-memory storage has nothing to persist to
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        Ok(())
    }
}
