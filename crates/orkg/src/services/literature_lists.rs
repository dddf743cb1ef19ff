//! Literature-list section deletion.

use super::{Curators, delete_linked_subgraph};
use crate::cascade::{CascadePlanner, DeletionReport};
use crate::domain::{
    ContributorId, StatementFilter, ThingId, classes, predicates, section_owning_predicates,
};
use crate::error::{Error, Result};
use crate::storage::{GraphStorage, require_resource};

/// Removes `section` from literature list `list`.
///
/// The `hasSection` link is always deleted. When nothing else refers to the
/// section, its owned subgraph goes with it: `planner`'s owning predicates
/// plus `hasEntry`, so entries are removed while the papers they link to
/// stay. Resources `contributor` may not change are left in place.
///
/// # Errors
///
/// - [`Error::ResourceNotFound`] when `list` is not a literature list
/// - [`Error::SectionNotFound`] when the list has no such section
pub async fn delete_section(
    storage: &mut dyn GraphStorage,
    planner: &CascadePlanner,
    curators: &Curators,
    list: &ThingId,
    section: &ThingId,
    contributor: &ContributorId,
) -> Result<DeletionReport> {
    let resource = require_resource(&*storage, list).await?;
    if !resource.has_class(classes::LITERATURE_LIST) {
        return Err(Error::ResourceNotFound(list.clone()));
    }

    let filter = StatementFilter::subject(list.clone())
        .with_predicate(predicates::HAS_SECTION)
        .with_object(section.clone());
    let Some(link) = storage.find_statements(&filter).await?.into_iter().next() else {
        return Err(Error::SectionNotFound {
            list: list.clone(),
            section: section.clone(),
        });
    };

    let planner = planner.with_owning(section_owning_predicates());
    delete_linked_subgraph(storage, &planner, curators, &link, contributor).await
}
