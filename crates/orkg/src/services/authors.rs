//! Author validation and author-list creation for papers.
//!
//! Authors are given by id, by ORCID, or only by name. Ids and ORCIDs are
//! resolved to existing `Author` resources; authors that resolve to nothing
//! are created when the author list is written.

use crate::domain::{
    ContributorId, NewResource, NewStatement, NewThing, StatementFilter, Thing, ThingId, classes,
    predicates, validate_label,
};
use crate::error::{Error, Result};
use crate::storage::GraphStorage;
use serde::{Deserialize, Serialize};

/// An author as given in a create command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInput {
    /// Existing author resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ThingId>,
    /// Display name
    pub name: String,
    /// ORCID iD, e.g. `0000-0002-1825-0097`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
}

impl AuthorInput {
    /// An author known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// An author after validation; `id` is set when it resolved to a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAuthor {
    /// Resolved author resource
    pub id: Option<ThingId>,
    /// Display name
    pub name: String,
    /// ORCID iD
    pub orcid: Option<String>,
}

/// An author as shown on a paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorView {
    /// Author resource, or literal for legacy name-only entries
    pub id: ThingId,
    /// Display name
    pub name: String,
    /// ORCID iD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
}

/// Whether `orcid` has the `dddd-dddd-dddd-dddX` shape.
#[must_use]
pub fn is_valid_orcid(orcid: &str) -> bool {
    let groups: Vec<&str> = orcid.split('-').collect();
    groups.len() == 4
        && groups.iter().enumerate().all(|(i, group)| {
            group.len() == 4
                && group.chars().enumerate().all(|(j, c)| {
                    c.is_ascii_digit() || (i == 3 && j == 3 && c == 'X')
                })
        })
}

/// Finds the author resource carrying `orcid`.
///
/// # Errors
///
/// Propagates storage errors.
pub async fn find_author_by_orcid(
    storage: &dyn GraphStorage,
    orcid: &str,
) -> Result<Option<ThingId>> {
    let statements = storage
        .find_statements(&StatementFilter::default().with_predicate(predicates::HAS_ORCID))
        .await?;
    for statement in statements {
        let Some(object) = storage.find_thing(&statement.object).await? else {
            continue;
        };
        if object.label() != orcid {
            continue;
        }
        if let Some(subject) = storage.find_thing(&statement.subject).await?
            && subject.has_class(classes::AUTHOR)
        {
            return Ok(Some(subject.id().clone()));
        }
    }
    Ok(None)
}

/// Validates authors and resolves ids and ORCIDs to existing resources.
///
/// # Errors
///
/// - [`Error::InvalidLabel`] for names that are not valid labels
/// - [`Error::Validation`] for malformed ORCIDs
/// - [`Error::AuthorNotFound`] when an id is unknown or not an `Author`
/// - [`Error::AmbiguousAuthor`] when id and ORCID name different authors
pub async fn validate_authors(
    storage: &dyn GraphStorage,
    authors: &[AuthorInput],
) -> Result<Vec<ValidatedAuthor>> {
    let mut validated = Vec::with_capacity(authors.len());

    for author in authors {
        validate_label(&author.name).map_err(|reason| Error::invalid_label("author name", reason))?;

        let by_id = match &author.id {
            Some(id) => match storage.find_thing(id).await? {
                Some(thing) if thing.has_class(classes::AUTHOR) => Some(id.clone()),
                _ => return Err(Error::AuthorNotFound(id.clone())),
            },
            None => None,
        };

        let by_orcid = match &author.orcid {
            Some(orcid) => {
                if !is_valid_orcid(orcid) {
                    return Err(Error::Validation(format!("invalid ORCID \"{orcid}\"")));
                }
                find_author_by_orcid(storage, orcid).await?
            }
            None => None,
        };

        let id = match (by_id, by_orcid) {
            (Some(id), Some(other)) if id != other => {
                return Err(Error::AmbiguousAuthor {
                    id,
                    orcid: author.orcid.clone().unwrap_or_default(),
                });
            }
            (id @ Some(_), _) | (None, id) => id,
        };

        validated.push(ValidatedAuthor {
            id,
            name: author.name.clone(),
            orcid: author.orcid.clone(),
        });
    }

    Ok(validated)
}

/// Creates the author list of `subject`: a `List` resource linked with
/// `hasAuthors`, holding each author through an indexed `hasListElement`.
///
/// Authors without an id are created as `Author` resources, with their
/// ORCID as a literal.
///
/// # Errors
///
/// Propagates storage errors.
pub async fn create_author_list(
    storage: &mut dyn GraphStorage,
    subject: &ThingId,
    authors: &[ValidatedAuthor],
    contributor: &ContributorId,
) -> Result<ThingId> {
    let list = storage
        .create_resource(
            NewResource::new("authors list", [classes::LIST]).created_by(contributor.clone()),
        )
        .await?;
    storage
        .create_statement(
            NewStatement::new(subject.clone(), predicates::HAS_AUTHORS, list.id.clone())
                .created_by(contributor.clone()),
        )
        .await?;

    for (index, author) in (0u32..).zip(authors) {
        let author_id = match &author.id {
            Some(id) => id.clone(),
            None => create_author(storage, author, contributor).await?,
        };
        storage
            .create_statement(
                NewStatement::new(list.id.clone(), predicates::HAS_LIST_ELEMENT, author_id)
                    .at_index(index)
                    .created_by(contributor.clone()),
            )
            .await?;
    }

    tracing::debug!(list = %list.id, authors = authors.len(), "Created author list");
    Ok(list.id)
}

async fn create_author(
    storage: &mut dyn GraphStorage,
    author: &ValidatedAuthor,
    contributor: &ContributorId,
) -> Result<ThingId> {
    let resource = storage
        .create_resource(
            NewResource::new(author.name.clone(), [classes::AUTHOR])
                .created_by(contributor.clone()),
        )
        .await?;
    if let Some(orcid) = &author.orcid {
        let literal = storage
            .create_literal(NewThing::new(orcid.clone()).created_by(contributor.clone()))
            .await?;
        storage
            .create_statement(
                NewStatement::new(resource.id.clone(), predicates::HAS_ORCID, literal.id)
                    .created_by(contributor.clone()),
            )
            .await?;
    }
    Ok(resource.id)
}

/// Reads the author list of `subject` in list order.
///
/// # Errors
///
/// Propagates storage errors.
pub async fn read_author_list(
    storage: &dyn GraphStorage,
    subject: &ThingId,
) -> Result<Vec<AuthorView>> {
    let lists = storage
        .find_statements(
            &StatementFilter::subject(subject.clone()).with_predicate(predicates::HAS_AUTHORS),
        )
        .await?;
    let Some(list) = lists.into_iter().next() else {
        return Ok(Vec::new());
    };

    let mut elements = storage
        .find_statements(
            &StatementFilter::subject(list.object).with_predicate(predicates::HAS_LIST_ELEMENT),
        )
        .await?;
    elements.sort_by_key(|s| (s.index.unwrap_or(u32::MAX), s.id.clone()));

    let mut authors = Vec::with_capacity(elements.len());
    for element in elements {
        let Some(thing) = storage.find_thing(&element.object).await? else {
            continue;
        };
        let orcid = match &thing {
            Thing::Resource(_) => {
                let orcids = storage
                    .find_statements(
                        &StatementFilter::subject(thing.id().clone())
                            .with_predicate(predicates::HAS_ORCID),
                    )
                    .await?;
                match orcids.first() {
                    Some(s) => storage.find_thing(&s.object).await?.map(|t| t.label().to_string()),
                    None => None,
                }
            }
            _ => None,
        };
        authors.push(AuthorView {
            id: thing.id().clone(),
            name: thing.label().to_string(),
            orcid,
        });
    }
    Ok(authors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BenchmarkVocabulary;
    use crate::services::ensure_vocabulary;
    use crate::storage::in_memory::new_in_memory_storage;
    use rstest::rstest;

    const ORCID: &str = "0000-1111-2222-3333";

    async fn seeded() -> Box<dyn GraphStorage> {
        let mut storage = new_in_memory_storage();
        ensure_vocabulary(storage.as_mut(), &BenchmarkVocabulary::default())
            .await
            .unwrap();
        storage
    }

    async fn author_with_orcid(storage: &mut dyn GraphStorage, name: &str, orcid: &str) -> ThingId {
        create_author(
            storage,
            &ValidatedAuthor {
                id: None,
                name: name.to_string(),
                orcid: Some(orcid.to_string()),
            },
            &ContributorId::unknown(),
        )
        .await
        .unwrap()
    }

    #[rstest]
    #[case("0000-0002-1825-0097", true)]
    #[case("0000-0002-1694-233X", true)]
    #[case("0000-0002-1825", false)]
    #[case("0000-000X-1825-0097", false)]
    #[case("invalid", false)]
    fn test_orcid_shape(#[case] orcid: &str, #[case] valid: bool) {
        assert_eq!(is_valid_orcid(orcid), valid);
    }

    #[tokio::test]
    async fn test_resolves_id_and_orcid() {
        let mut storage = seeded().await;
        let known = author_with_orcid(storage.as_mut(), "Known Author", ORCID).await;

        let authors = vec![
            AuthorInput {
                id: Some(known.clone()),
                name: "Author with id".into(),
                orcid: None,
            },
            AuthorInput {
                id: None,
                name: "Author with orcid".into(),
                orcid: Some(ORCID.into()),
            },
            AuthorInput {
                id: Some(known.clone()),
                name: "Author with id and orcid".into(),
                orcid: Some(ORCID.into()),
            },
            AuthorInput::named("New Author"),
        ];
        let validated = validate_authors(storage.as_ref(), &authors).await.unwrap();

        let ids: Vec<Option<ThingId>> = validated.into_iter().map(|a| a.id).collect();
        assert_eq!(
            ids,
            vec![Some(known.clone()), Some(known.clone()), Some(known), None]
        );
    }

    #[tokio::test]
    async fn test_unknown_or_non_author_id() {
        let mut storage = seeded().await;
        let paper = storage
            .create_resource(NewResource::new("Not an author", [classes::PAPER]))
            .await
            .unwrap();

        for id in [ThingId::new("R404"), paper.id] {
            let input = AuthorInput {
                id: Some(id),
                ..AuthorInput::named("Someone")
            };
            let err = validate_authors(storage.as_ref(), &[input]).await.unwrap_err();
            assert!(matches!(err, Error::AuthorNotFound(_)));
        }
    }

    #[tokio::test]
    async fn test_invalid_name() {
        let storage = seeded().await;
        let err = validate_authors(storage.as_ref(), &[AuthorInput::named("\n")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLabel { .. }));
    }

    #[tokio::test]
    async fn test_id_and_orcid_of_different_authors_is_ambiguous() {
        let mut storage = seeded().await;
        let first = author_with_orcid(storage.as_mut(), "First", ORCID).await;
        author_with_orcid(storage.as_mut(), "Second", "0000-0000-0000-0001").await;

        let input = AuthorInput {
            id: Some(first),
            name: "Confused".into(),
            orcid: Some("0000-0000-0000-0001".into()),
        };
        let err = validate_authors(storage.as_ref(), &[input]).await.unwrap_err();
        assert!(matches!(err, Error::AmbiguousAuthor { .. }));
    }

    #[tokio::test]
    async fn test_author_list_round_trip() {
        let mut storage = seeded().await;
        let paper = storage
            .create_resource(NewResource::new("Paper", [classes::PAPER]))
            .await
            .unwrap();
        let authors = validate_authors(
            storage.as_ref(),
            &[
                AuthorInput::named("Ada Lovelace"),
                AuthorInput {
                    orcid: Some(ORCID.into()),
                    ..AuthorInput::named("Charles Babbage")
                },
            ],
        )
        .await
        .unwrap();

        create_author_list(storage.as_mut(), &paper.id, &authors, &ContributorId::unknown())
            .await
            .unwrap();
        let read = read_author_list(storage.as_ref(), &paper.id).await.unwrap();

        let names: Vec<&str> = read.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Ada Lovelace", "Charles Babbage"]);
        assert_eq!(read[1].orcid.as_deref(), Some(ORCID));

        let again = validate_authors(
            storage.as_ref(),
            &[AuthorInput {
                orcid: Some(ORCID.into()),
                ..AuthorInput::named("Charles Babbage")
            }],
        )
        .await
        .unwrap();
        assert_eq!(again[0].id.as_ref(), Some(&read[1].id));
    }
}
