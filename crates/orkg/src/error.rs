//! Error types for graph operations.
//!
//! Domain errors carry the ids involved so that callers can render precise
//! messages. [`Error::status_code`] gives the HTTP status a web layer would
//! answer with.

use crate::domain::{ContributorId, StatementId, ThingId};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for graph operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Snapshot file could not be read or written.
    #[error("Snapshot error: {0}")]
    Jsonl(#[from] orkg_jsonl::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage invariant violated.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Thing \"{0}\" not found")]
    ThingNotFound(ThingId),

    #[error("Resource \"{0}\" not found")]
    ResourceNotFound(ThingId),

    #[error("Predicate \"{0}\" not found")]
    PredicateNotFound(ThingId),

    #[error("Statement \"{0}\" not found")]
    StatementNotFound(StatementId),

    #[error("A thing with id \"{0}\" already exists")]
    ThingAlreadyExists(ThingId),

    #[error("Paper \"{0}\" not found")]
    PaperNotFound(ThingId),

    /// The paper is referenced from elsewhere in the graph.
    #[error("Paper \"{0}\" is still in use")]
    PaperInUse(ThingId),

    #[error("Research field \"{0}\" not found")]
    ResearchFieldNotFound(ThingId),

    #[error("Research problem \"{0}\" not found")]
    ResearchProblemNotFound(ThingId),

    #[error("Author \"{0}\" not found")]
    AuthorNotFound(ThingId),

    /// An author's id and ORCID point at different resources.
    #[error("Author id \"{id}\" and ORCID \"{orcid}\" refer to different authors")]
    AmbiguousAuthor {
        /// Id given for the author
        id: ThingId,
        /// ORCID given for the author
        orcid: String,
    },

    #[error("Invalid {field}: {reason}")]
    InvalidLabel {
        /// Which input held the label
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// Input failed a content-type rule other than label shape.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    InvalidStatement(#[from] InvalidStatement),

    #[error(transparent)]
    ForbiddenStatementDeletion(#[from] ForbiddenStatementDeletion),

    #[error("Statement \"{0}\" is not modifiable")]
    StatementNotModifiable(StatementId),

    #[error("Resource \"{0}\" is not modifiable")]
    ResourceNotModifiable(ThingId),

    /// The resource is the object of at least one statement.
    #[error("Resource \"{0}\" is still used in statements")]
    ResourceUsedInStatement(ThingId),

    #[error("Contributor \"{contributor}\" does not own resource \"{id}\" and is not a curator")]
    NeitherOwnerNorCurator {
        /// Contributor attempting the change
        contributor: ContributorId,
        /// Resource being changed
        id: ThingId,
    },

    #[error("Section \"{section}\" not found in literature list \"{list}\"")]
    SectionNotFound {
        /// Literature list id
        list: ThingId,
        /// Section id
        section: ThingId,
    },

    #[error("Related resource \"{resource}\" not found in comparison \"{comparison}\"")]
    RelatedResourceNotFound {
        /// Comparison id
        comparison: ThingId,
        /// Related resource or figure id
        resource: ThingId,
    },

    #[error("Related resource \"{0}\" is not modifiable")]
    RelatedResourceNotModifiable(ThingId),

    #[error("Smart review \"{0}\" not found")]
    SmartReviewNotFound(ThingId),

    /// Published smart reviews are frozen.
    #[error("Smart review \"{0}\" is not modifiable")]
    SmartReviewNotModifiable(ThingId),

    #[error("Smart review section \"{section}\" does not belong to smart review \"{review}\"")]
    UnrelatedSmartReviewSection {
        /// Smart review id
        review: ThingId,
        /// Section id
        section: ThingId,
    },

    /// Updating would duplicate another statement's triple.
    #[error("Statement \"{0}\" already has the same subject, predicate and object")]
    StatementAlreadyExists(StatementId),
}

/// Statements rejected at creation or update.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidStatement {
    #[error("A literal can not be the subject of a statement: \"{0}\"")]
    SubjectMustNotBeLiteral(ThingId),

    #[error("A rosetta stone statement can not be the subject of a statement: \"{0}\"")]
    RosettaStoneStatementSubject(ThingId),

    /// List membership is managed through list operations.
    #[error("A list element statement can not be managed using the statements api: \"{0}\"")]
    IsListElementStatement(ThingId),

    #[error("\"{0}\" is not a predicate")]
    NotAPredicate(ThingId),
}

/// Statements that may not be removed through the generic statement API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForbiddenStatementDeletion {
    #[error("Statement \"{0}\" is a list element and can only be removed by updating the list")]
    UsedInList(StatementId),
}

/// Problems locating or reading the `.orkg` project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Not an orkg project (or any parent directory). Run 'orkg init' first")]
    NotInitialized,

    #[error("An orkg project already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unsupported storage backend: {0}")]
    UnsupportedBackend(String),
}

impl Error {
    /// HTTP status a web layer would map this error to.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ThingNotFound(_)
            | Self::ResourceNotFound(_)
            | Self::PredicateNotFound(_)
            | Self::StatementNotFound(_)
            | Self::PaperNotFound(_)
            | Self::ResearchFieldNotFound(_)
            | Self::ResearchProblemNotFound(_)
            | Self::AuthorNotFound(_)
            | Self::SectionNotFound { .. }
            | Self::RelatedResourceNotFound { .. }
            | Self::SmartReviewNotFound(_) => 404,
            Self::NeitherOwnerNorCurator { .. }
            | Self::ForbiddenStatementDeletion(_)
            | Self::StatementNotModifiable(_)
            | Self::ResourceNotModifiable(_)
            | Self::RelatedResourceNotModifiable(_)
            | Self::SmartReviewNotModifiable(_) => 403,
            Self::PaperInUse(_)
            | Self::ResourceUsedInStatement(_)
            | Self::ThingAlreadyExists(_)
            | Self::StatementAlreadyExists(_) => 409,
            Self::AmbiguousAuthor { .. }
            | Self::UnrelatedSmartReviewSection { .. }
            | Self::InvalidLabel { .. }
            | Self::Validation(_)
            | Self::InvalidStatement(_) => 400,
            Self::Io(_) | Self::Jsonl(_) | Self::Config(_) | Self::Storage(_) => 500,
        }
    }

    pub(crate) fn invalid_label(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLabel {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::PaperNotFound("R1".into()).status_code(), 404);
        assert_eq!(Error::PaperInUse("R1".into()).status_code(), 409);
        assert_eq!(Error::StatementAlreadyExists("S1".into()).status_code(), 409);
        assert_eq!(
            Error::UnrelatedSmartReviewSection {
                review: "R1".into(),
                section: "R2".into(),
            }
            .status_code(),
            400
        );
        assert_eq!(
            Error::from(ForbiddenStatementDeletion::UsedInList("S1".into())).status_code(),
            403
        );
        assert_eq!(
            Error::from(InvalidStatement::SubjectMustNotBeLiteral("L1".into())).status_code(),
            400
        );
    }

    #[test]
    fn test_messages_name_the_ids() {
        let err = Error::AmbiguousAuthor {
            id: "R7".into(),
            orcid: "0000-0002-1825-0097".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("R7"));
        assert!(msg.contains("0000-0002-1825-0097"));
    }
}
