//! Comparison related-resource and related-figure deletion.

use super::{Curators, delete_linked_subgraph};
use crate::cascade::{CascadePlanner, DeletionReport};
use crate::domain::{ContributorId, StatementFilter, ThingId, classes, predicates};
use crate::error::{Error, Result};
use crate::storage::{GraphStorage, require_resource};
use serde::{Deserialize, Serialize};

/// What a comparison links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedKind {
    /// `hasRelatedResource` to a `ComparisonRelatedResource`
    Resource,
    /// `hasRelatedFigure` to a `ComparisonRelatedFigure`
    Figure,
}

impl RelatedKind {
    fn predicate(self) -> &'static str {
        match self {
            Self::Resource => predicates::HAS_RELATED_RESOURCE,
            Self::Figure => predicates::HAS_RELATED_FIGURE,
        }
    }

    fn class(self) -> &'static str {
        match self {
            Self::Resource => classes::COMPARISON_RELATED_RESOURCE,
            Self::Figure => classes::COMPARISON_RELATED_FIGURE,
        }
    }
}

/// Removes a related resource or figure from a comparison.
///
/// Published comparisons, those another comparison names as its previous
/// version, can not be changed.
///
/// # Errors
///
/// - [`Error::ResourceNotFound`] when `comparison` is not a comparison
/// - [`Error::RelatedResourceNotFound`] when the comparison has no such link
/// - [`Error::RelatedResourceNotModifiable`] for published comparisons and
///   locked related resources
pub async fn delete_related_resource(
    storage: &mut dyn GraphStorage,
    planner: &CascadePlanner,
    curators: &Curators,
    comparison: &ThingId,
    related: &ThingId,
    kind: RelatedKind,
    contributor: &ContributorId,
) -> Result<DeletionReport> {
    let resource = require_resource(&*storage, comparison).await?;
    if !resource.has_class(classes::COMPARISON) {
        return Err(Error::ResourceNotFound(comparison.clone()));
    }

    let not_found = || Error::RelatedResourceNotFound {
        comparison: comparison.clone(),
        resource: related.clone(),
    };
    let filter = StatementFilter::subject(comparison.clone())
        .with_predicate(kind.predicate())
        .with_object(related.clone());
    let link = storage
        .find_statements(&filter)
        .await?
        .into_iter()
        .next()
        .ok_or_else(not_found)?;
    let target = match storage.find_thing(related).await? {
        Some(thing) if thing.has_class(kind.class()) => thing,
        _ => return Err(not_found()),
    };

    if is_previous_version(&*storage, comparison).await? || !target.is_modifiable() {
        return Err(Error::RelatedResourceNotModifiable(related.clone()));
    }

    delete_linked_subgraph(storage, planner, curators, &link, contributor).await
}

async fn is_previous_version(storage: &dyn GraphStorage, comparison: &ThingId) -> Result<bool> {
    let newer = storage
        .find_statements(
            &StatementFilter::object(comparison.clone())
                .with_predicate(predicates::HAS_PREVIOUS_VERSION),
        )
        .await?;
    for statement in newer {
        if let Some(thing) = storage.find_thing(&statement.subject).await?
            && thing.has_class(classes::COMPARISON)
        {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BenchmarkVocabulary, NewResource, NewStatement, NewThing};
    use crate::services::ensure_vocabulary;
    use crate::storage::in_memory::new_in_memory_storage;
    use rstest::rstest;

    struct Fixture {
        storage: Box<dyn GraphStorage>,
        comparison: ThingId,
        related: ThingId,
    }

    /// comparison -link-> related -P26-> literal
    async fn fixture(kind: RelatedKind) -> Fixture {
        let mut storage = new_in_memory_storage();
        ensure_vocabulary(storage.as_mut(), &BenchmarkVocabulary::default())
            .await
            .unwrap();
        let comparison = storage
            .create_resource(NewResource::new("Comparison", [classes::COMPARISON]))
            .await
            .unwrap()
            .id;
        let related = storage
            .create_resource(NewResource::new("Related", [kind.class()]))
            .await
            .unwrap()
            .id;
        let url = storage
            .create_literal(NewThing::new("https://example.org/figure.png"))
            .await
            .unwrap()
            .id;
        storage
            .create_statement(NewStatement::new(
                comparison.clone(),
                kind.predicate(),
                related.clone(),
            ))
            .await
            .unwrap();
        storage
            .create_statement(NewStatement::new(related.clone(), predicates::HAS_DOI, url))
            .await
            .unwrap();
        Fixture {
            storage,
            comparison,
            related,
        }
    }

    async fn delete(f: &mut Fixture, kind: RelatedKind) -> Result<DeletionReport> {
        delete_related_resource(
            f.storage.as_mut(),
            &CascadePlanner::default(),
            &Curators::default(),
            &f.comparison,
            &f.related,
            kind,
            &ContributorId::unknown(),
        )
        .await
    }

    #[rstest]
    #[case(RelatedKind::Resource)]
    #[case(RelatedKind::Figure)]
    #[tokio::test]
    async fn test_deletes_related_resource(#[case] kind: RelatedKind) {
        let mut f = fixture(kind).await;
        let report = delete(&mut f, kind).await.unwrap();

        assert_eq!(report.statements_deleted, 2);
        assert_eq!(report.resources_deleted, vec![f.related.clone()]);
        assert!(f.storage.find_thing(&f.related).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wrong_kind_is_not_found() {
        let mut f = fixture(RelatedKind::Resource).await;
        let err = delete(&mut f, RelatedKind::Figure).await.unwrap_err();
        assert!(matches!(err, Error::RelatedResourceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_previous_version_is_not_modifiable() {
        let mut f = fixture(RelatedKind::Resource).await;
        let newer = f
            .storage
            .create_resource(NewResource::new("Comparison v2", [classes::COMPARISON]))
            .await
            .unwrap();
        f.storage
            .create_statement(NewStatement::new(
                newer.id,
                predicates::HAS_PREVIOUS_VERSION,
                f.comparison.clone(),
            ))
            .await
            .unwrap();

        let err = delete(&mut f, RelatedKind::Resource).await.unwrap_err();
        assert!(matches!(err, Error::RelatedResourceNotModifiable(_)));
    }

    #[tokio::test]
    async fn test_shared_related_resource_keeps_resource() {
        let mut f = fixture(RelatedKind::Figure).await;
        let other = f
            .storage
            .create_resource(NewResource::new("Other", [classes::COMPARISON]))
            .await
            .unwrap();
        f.storage
            .create_statement(NewStatement::new(
                other.id,
                predicates::HAS_RELATED_FIGURE,
                f.related.clone(),
            ))
            .await
            .unwrap();

        let report = delete(&mut f, RelatedKind::Figure).await.unwrap();
        assert_eq!(report.statements_deleted, 1);
        assert!(f.storage.find_thing(&f.related).await.unwrap().is_some());
    }
}
