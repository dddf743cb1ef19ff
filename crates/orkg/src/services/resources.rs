//! Resource, literal, predicate and class creation with label rules, and
//! guarded resource deletion.

use super::Curators;
use crate::domain::{
    Class, ContributorId, Literal, NewResource, NewThing, Predicate, Resource, StatementFilter,
    Thing, ThingId, validate_label,
};
use crate::error::{Error, Result};
use crate::storage::{GraphStorage, require_resource};

/// Creates and deletes things on behalf of a contributor.
pub struct ResourceService<'a> {
    storage: &'a mut dyn GraphStorage,
    curators: &'a Curators,
}

impl<'a> ResourceService<'a> {
    /// A service over `storage`; `curators` may delete anybody's resources.
    pub fn new(storage: &'a mut dyn GraphStorage, curators: &'a Curators) -> Self {
        Self { storage, curators }
    }

    /// Creates a resource after checking its label and classes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLabel`] for blank or multi-line labels
    /// - [`Error::Validation`] when a class does not exist
    /// - [`Error::ThingAlreadyExists`] when a fixed id is taken
    pub async fn create_resource(&mut self, new: NewResource) -> Result<Resource> {
        validate_label(&new.label).map_err(|reason| Error::invalid_label("label", reason))?;
        for class in &new.classes {
            match self.storage.find_thing(class).await? {
                Some(Thing::Class(_)) => {}
                _ => return Err(Error::Validation(format!("class \"{class}\" does not exist"))),
            }
        }

        let resource = self.storage.create_resource(new).await?;
        tracing::info!(id = %resource.id, label = %resource.label, "Created resource");
        Ok(resource)
    }

    /// Creates a literal. Literal values may be blank but not multi-line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLabel`] for values containing line breaks.
    pub async fn create_literal(&mut self, new: NewThing) -> Result<Literal> {
        if new.label.contains(['\n', '\r']) {
            return Err(Error::invalid_label("value", "literal must be a single line"));
        }
        let literal = self.storage.create_literal(new).await?;
        tracing::info!(id = %literal.id, "Created literal");
        Ok(literal)
    }

    /// Creates a predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLabel`] or [`Error::ThingAlreadyExists`].
    pub async fn create_predicate(&mut self, new: NewThing) -> Result<Predicate> {
        validate_label(&new.label).map_err(|reason| Error::invalid_label("label", reason))?;
        let predicate = self.storage.create_predicate(new).await?;
        tracing::info!(id = %predicate.id, "Created predicate");
        Ok(predicate)
    }

    /// Creates a class.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLabel`] or [`Error::ThingAlreadyExists`].
    pub async fn create_class(&mut self, new: NewThing) -> Result<Class> {
        validate_label(&new.label).map_err(|reason| Error::invalid_label("label", reason))?;
        let class = self.storage.create_class(new).await?;
        tracing::info!(id = %class.id, "Created class");
        Ok(class)
    }

    /// Deletes a resource together with its outgoing statements.
    ///
    /// # Errors
    ///
    /// - [`Error::ResourceNotFound`] for unknown ids
    /// - [`Error::ResourceNotModifiable`] for locked resources
    /// - [`Error::NeitherOwnerNorCurator`] when `contributor` may not delete it
    /// - [`Error::ResourceUsedInStatement`] when a statement points at it
    pub async fn delete_resource(
        &mut self,
        id: &ThingId,
        contributor: &ContributorId,
    ) -> Result<()> {
        let resource = require_resource(&*self.storage, id).await?;
        if !resource.modifiable {
            return Err(Error::ResourceNotModifiable(id.clone()));
        }
        self.curators
            .require_owner_or_curator(contributor, &Thing::Resource(resource))?;
        if self.storage.count_incoming_statements(id).await? > 0 {
            return Err(Error::ResourceUsedInStatement(id.clone()));
        }

        let outgoing: Vec<_> = self
            .storage
            .find_statements(&StatementFilter::subject(id.clone()))
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        self.storage.delete_statements(&outgoing).await?;
        self.storage.delete_thing(id).await?;

        tracing::info!(id = %id, statements = outgoing.len(), "Deleted resource");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BenchmarkVocabulary, NewStatement, classes, predicates};
    use crate::services::ensure_vocabulary;
    use crate::storage::in_memory::new_in_memory_storage;
    use rstest::rstest;

    async fn seeded() -> Box<dyn GraphStorage> {
        let mut storage = new_in_memory_storage();
        ensure_vocabulary(storage.as_mut(), &BenchmarkVocabulary::default())
            .await
            .unwrap();
        storage
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    #[case("two\nlines")]
    #[tokio::test]
    async fn test_invalid_labels_are_rejected(#[case] label: &str) {
        let mut storage = seeded().await;
        let curators = Curators::default();
        let err = ResourceService::new(storage.as_mut(), &curators)
            .create_resource(NewResource::new(label, [classes::PAPER]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLabel { .. }));
    }

    #[tokio::test]
    async fn test_unknown_class_is_rejected() {
        let mut storage = seeded().await;
        let curators = Curators::default();
        let err = ResourceService::new(storage.as_mut(), &curators)
            .create_resource(NewResource::new("Thing", ["NoSuchClass"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let mut storage = seeded().await;
        let curators = Curators::new([ContributorId::new("curator")]);
        let owner = ContributorId::new("owner");
        let mut service = ResourceService::new(storage.as_mut(), &curators);

        let paper = service
            .create_resource(NewResource::new("Paper", [classes::PAPER]).created_by(owner.clone()))
            .await
            .unwrap();
        let field = service
            .create_resource(
                NewResource::new("Field", [classes::RESEARCH_FIELD]).created_by(owner.clone()),
            )
            .await
            .unwrap();
        service
            .storage
            .create_statement(NewStatement::new(
                paper.id.clone(),
                predicates::HAS_RESEARCH_FIELD,
                field.id.clone(),
            ))
            .await
            .unwrap();

        let err = service
            .delete_resource(&paper.id, &"someone".into())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NeitherOwnerNorCurator { .. }));

        let err = service.delete_resource(&field.id, &owner).await.unwrap_err();
        assert!(matches!(err, Error::ResourceUsedInStatement(_)));

        service
            .delete_resource(&paper.id, &"curator".into())
            .await
            .unwrap();
        service.delete_resource(&field.id, &owner).await.unwrap();

        let err = service.delete_resource(&paper.id, &owner).await.unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_locked_resource_is_not_deleted() {
        let mut storage = seeded().await;
        let curators = Curators::default();
        let mut locked = NewResource::new("Locked", [classes::PAPER]);
        locked.modifiable = false;
        let mut service = ResourceService::new(storage.as_mut(), &curators);
        let resource = service.create_resource(locked).await.unwrap();

        let err = service
            .delete_resource(&resource.id, &ContributorId::unknown())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ResourceNotModifiable(_)));
    }
}
