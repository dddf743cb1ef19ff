//! Content-type services over a [`GraphStorage`].
//!
//! Each service borrows the storage for the duration of one operation and
//! enforces the rules of its content type on top of the store's referential
//! integrity: statement restrictions, ownership, paper structure and the
//! cascading deletes of papers, literature-list and smart-review sections
//! and comparison related resources.

pub mod authors;
pub mod benchmarks;
pub mod comparisons;
pub mod literature_lists;
pub mod papers;
pub mod resources;
pub mod smart_reviews;
pub mod statements;
pub mod vocabulary;

pub use authors::{AuthorInput, AuthorView, ValidatedAuthor};
pub use benchmarks::BenchmarkService;
pub use comparisons::{RelatedKind, delete_related_resource};
pub use literature_lists::delete_section;
pub use papers::{
    ContributionInput, CreatePaperCommand, PaperService, PaperView, PublicationInfo,
};
pub use resources::ResourceService;
pub use statements::StatementService;
pub use vocabulary::ensure_vocabulary;

use crate::cascade::{CascadePlanner, DeletionReport};
use crate::domain::{ContributorId, Statement, Thing, ThingId};
use crate::error::{Error, Result};
use crate::storage::GraphStorage;
use std::collections::BTreeSet;

/// Contributors allowed to change content created by others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Curators(BTreeSet<ContributorId>);

impl Curators {
    /// Curators from a list of contributor ids.
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ContributorId>,
    {
        Self(ids.into_iter().collect())
    }

    /// Whether `contributor` is a curator.
    #[must_use]
    pub fn contains(&self, contributor: &ContributorId) -> bool {
        self.0.contains(contributor)
    }

    /// Whether `contributor` created `thing` or is a curator.
    #[must_use]
    pub fn may_change(&self, contributor: &ContributorId, thing: &Thing) -> bool {
        thing.created_by() == contributor || self.contains(contributor)
    }

    /// Fails unless `contributor` created `thing` or is a curator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NeitherOwnerNorCurator`].
    pub fn require_owner_or_curator(
        &self,
        contributor: &ContributorId,
        thing: &Thing,
    ) -> Result<()> {
        if self.may_change(contributor, thing) {
            Ok(())
        } else {
            Err(Error::NeitherOwnerNorCurator {
                contributor: contributor.clone(),
                id: thing.id().clone(),
            })
        }
    }
}

/// Removes `link` and, if its object is referenced by nothing else, the
/// object's owned subgraph.
///
/// Statements go first. Resources of the subgraph are deleted only when
/// `contributor` may change them and nothing outside the subgraph still
/// refers to them; others are skipped and reported.
pub(crate) async fn delete_linked_subgraph(
    storage: &mut dyn GraphStorage,
    planner: &CascadePlanner,
    curators: &Curators,
    link: &Statement,
    contributor: &ContributorId,
) -> Result<DeletionReport> {
    let target = &link.object;
    let incoming = storage.count_incoming_statements(target).await?;

    if incoming > 1 {
        tracing::debug!(target = %target, incoming, "Target shared, removing link only");
        let deleted = storage.delete_statements(std::slice::from_ref(&link.id)).await?;
        return Ok(DeletionReport {
            statements_deleted: deleted,
            ..DeletionReport::default()
        });
    }

    let plan = planner.plan_from_storage(storage, target).await?;
    let mut statements = plan.statements.clone();
    statements.push(link.id.clone());

    let mut report = DeletionReport {
        statements_deleted: storage.delete_statements(&statements).await?,
        ..DeletionReport::default()
    };

    // The target itself is not a subject when it has no statements.
    let mut resources: Vec<ThingId> = plan.resources.clone();
    if !resources.contains(target) {
        resources.push(target.clone());
    }

    for id in resources {
        let Some(thing) = storage.find_thing(&id).await? else {
            continue;
        };
        if !curators.may_change(contributor, &thing) {
            tracing::debug!(id = %id, "Not owned by contributor, keeping");
            report.resources_skipped.push(id);
            continue;
        }
        match storage.delete_thing(&id).await {
            Ok(()) => report.resources_deleted.push(id),
            Err(Error::ResourceUsedInStatement(_)) => {
                tracing::warn!(id = %id, "Resource still referenced, not deleted");
                report.resources_skipped.push(id);
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        link = %link.id,
        statements = report.statements_deleted,
        resources = report.resources_deleted.len(),
        "Deleted linked subgraph"
    );
    Ok(report)
}
