//! Statement rules on top of the store.
//!
//! The generic statement API refuses to touch list membership (`hasListElement`
//! statements of `List` resources); lists are changed through their own
//! operations so element order stays consistent.

use crate::domain::{
    NewStatement, Statement, StatementFilter, StatementId, StatementUpdate, Thing, ThingId,
    classes, predicates,
};
use crate::error::{Error, ForbiddenStatementDeletion, InvalidStatement, Result};
use crate::storage::{GraphStorage, require_thing};

/// Creates, updates and deletes statements under the content rules.
pub struct StatementService<'a> {
    storage: &'a mut dyn GraphStorage,
}

impl<'a> StatementService<'a> {
    /// A service over `storage`.
    pub fn new(storage: &'a mut dyn GraphStorage) -> Self {
        Self { storage }
    }

    /// Creates a statement, or returns the existing one with the same
    /// subject, predicate and object.
    ///
    /// # Errors
    ///
    /// - [`Error::ThingNotFound`] for an unknown subject or object
    /// - [`Error::PredicateNotFound`] for an unknown predicate
    /// - [`Error::InvalidStatement`] for literal or rosetta-stone subjects,
    ///   non-predicates and list element statements
    pub async fn create(&mut self, new: NewStatement) -> Result<Statement> {
        let subject = self.check_subject(&new.subject).await?;
        self.check_predicate(&new.predicate).await?;
        require_thing(&*self.storage, &new.object).await?;

        if is_list_element(&subject, &new.predicate) {
            return Err(InvalidStatement::IsListElementStatement(subject.id().clone()).into());
        }

        let filter = StatementFilter::subject(new.subject.clone())
            .with_predicate(new.predicate.clone())
            .with_object(new.object.clone());
        if let Some(existing) = self.storage.find_statements(&filter).await?.into_iter().next() {
            tracing::debug!(id = %existing.id, "Statement already exists");
            return Ok(existing);
        }

        let statement = self.storage.create_statement(new).await?;
        tracing::info!(
            id = %statement.id,
            subject = %statement.subject,
            predicate = %statement.predicate,
            object = %statement.object,
            "Created statement"
        );
        Ok(statement)
    }

    /// Replaces the predicate and/or object of a statement.
    ///
    /// # Errors
    ///
    /// - [`Error::StatementNotFound`] for an unknown id
    /// - [`Error::StatementNotModifiable`] for locked statements
    /// - [`Error::InvalidStatement`] when the old or new statement is a list element
    /// - [`Error::StatementAlreadyExists`] when another statement already has
    ///   the resulting triple
    pub async fn update(&mut self, id: &StatementId, update: StatementUpdate) -> Result<Statement> {
        let current = self
            .storage
            .find_statement(id)
            .await?
            .ok_or_else(|| Error::StatementNotFound(id.clone()))?;
        if !current.modifiable {
            return Err(Error::StatementNotModifiable(id.clone()));
        }

        let subject = require_thing(&*self.storage, &current.subject).await?;
        let predicate = update.predicate.as_ref().unwrap_or(&current.predicate);
        if is_list_element(&subject, &current.predicate) || is_list_element(&subject, predicate) {
            return Err(InvalidStatement::IsListElementStatement(subject.id().clone()).into());
        }
        if let Some(predicate) = &update.predicate {
            self.check_predicate(predicate).await?;
        }
        if let Some(object) = &update.object {
            require_thing(&*self.storage, object).await?;
        }

        let filter = StatementFilter::subject(current.subject.clone())
            .with_predicate(predicate.clone())
            .with_object(update.object.as_ref().unwrap_or(&current.object).clone());
        if let Some(existing) = self
            .storage
            .find_statements(&filter)
            .await?
            .into_iter()
            .find(|existing| existing.id != *id)
        {
            return Err(Error::StatementAlreadyExists(existing.id));
        }

        let updated = self.storage.update_statement(id, update).await?;
        tracing::info!(id = %id, "Updated statement");
        Ok(updated)
    }

    /// Deletes statements. Unknown ids are ignored.
    ///
    /// Nothing is deleted if any of the statements is locked or a list element.
    ///
    /// # Errors
    ///
    /// - [`Error::StatementNotModifiable`] for locked statements
    /// - [`Error::ForbiddenStatementDeletion`] for list element statements
    pub async fn delete(&mut self, ids: &[StatementId]) -> Result<usize> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(statement) = self.storage.find_statement(id).await? else {
                continue;
            };
            if !statement.modifiable {
                return Err(Error::StatementNotModifiable(id.clone()));
            }
            if let Some(subject) = self.storage.find_thing(&statement.subject).await?
                && is_list_element(&subject, &statement.predicate)
            {
                return Err(ForbiddenStatementDeletion::UsedInList(id.clone()).into());
            }
            found.push(statement.id);
        }

        let deleted = self.storage.delete_statements(&found).await?;
        tracing::info!(deleted, "Deleted statements");
        Ok(deleted)
    }

    /// Statements matching `filter`, in id order.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub async fn find(&self, filter: &StatementFilter) -> Result<Vec<Statement>> {
        self.storage.find_statements(filter).await
    }

    async fn check_subject(&self, id: &ThingId) -> Result<Thing> {
        let subject = require_thing(&*self.storage, id).await?;
        if subject.is_literal() {
            return Err(InvalidStatement::SubjectMustNotBeLiteral(id.clone()).into());
        }
        if subject.has_class(classes::ROSETTA_STONE_STATEMENT) {
            return Err(InvalidStatement::RosettaStoneStatementSubject(id.clone()).into());
        }
        Ok(subject)
    }

    async fn check_predicate(&self, id: &ThingId) -> Result<()> {
        match self.storage.find_thing(id).await? {
            Some(Thing::Predicate(_)) => Ok(()),
            Some(_) => Err(InvalidStatement::NotAPredicate(id.clone()).into()),
            None => Err(Error::PredicateNotFound(id.clone())),
        }
    }
}

fn is_list_element(subject: &Thing, predicate: &ThingId) -> bool {
    predicate == predicates::HAS_LIST_ELEMENT && subject.has_class(classes::LIST)
}
