//! Smart-review section deletion.
//!
//! A smart review keeps its sections on a dedicated contribution:
//! `review -P31-> ContributionSmartReview -hasSection-> section`. Sections
//! point at comparisons, visualizations or other resources through
//! `hasLink`; those targets are never deleted with the section.

use super::{Curators, delete_linked_subgraph};
use crate::cascade::{CascadePlanner, DeletionReport};
use crate::domain::{
    ContributorId, Statement, StatementFilter, ThingId, classes, predicates,
    section_owning_predicates,
};
use crate::error::{Error, Result};
use crate::storage::GraphStorage;

/// Removes `section` from smart review `review`.
///
/// Behaves like the literature-list section delete: the `hasSection` link
/// always goes, and an unshared section takes its owned subgraph with it.
///
/// # Errors
///
/// - [`Error::SmartReviewNotFound`] when `review` is not a smart review
/// - [`Error::SmartReviewNotModifiable`] when the review is published
/// - [`Error::UnrelatedSmartReviewSection`] when no contribution of the
///   review links the section
pub async fn delete_section(
    storage: &mut dyn GraphStorage,
    planner: &CascadePlanner,
    curators: &Curators,
    review: &ThingId,
    section: &ThingId,
    contributor: &ContributorId,
) -> Result<DeletionReport> {
    let resource = match storage.find_thing(review).await? {
        Some(thing) if thing.has_class(classes::SMART_REVIEW) => thing,
        _ => return Err(Error::SmartReviewNotFound(review.clone())),
    };
    if resource.has_class(classes::SMART_REVIEW_PUBLISHED) {
        return Err(Error::SmartReviewNotModifiable(review.clone()));
    }

    let Some(link) = find_section_link(&*storage, review, section).await? else {
        return Err(Error::UnrelatedSmartReviewSection {
            review: review.clone(),
            section: section.clone(),
        });
    };

    tracing::debug!(review = %review, section = %section, "Deleting smart review section");
    let planner = planner.with_owning(section_owning_predicates());
    delete_linked_subgraph(storage, &planner, curators, &link, contributor).await
}

/// The `hasSection` statement from one of the review's contributions to `section`.
async fn find_section_link(
    storage: &dyn GraphStorage,
    review: &ThingId,
    section: &ThingId,
) -> Result<Option<Statement>> {
    let contributions = storage
        .find_statements(
            &StatementFilter::subject(review.clone()).with_predicate(predicates::HAS_CONTRIBUTION),
        )
        .await?;

    for contribution in contributions {
        let is_review_contribution = storage
            .find_thing(&contribution.object)
            .await?
            .is_some_and(|thing| thing.has_class(classes::SMART_REVIEW_CONTRIBUTION));
        if !is_review_contribution {
            continue;
        }
        let filter = StatementFilter::subject(contribution.object)
            .with_predicate(predicates::HAS_SECTION)
            .with_object(section.clone());
        if let Some(link) = storage.find_statements(&filter).await?.into_iter().next() {
            return Ok(Some(link));
        }
    }
    Ok(None)
}
