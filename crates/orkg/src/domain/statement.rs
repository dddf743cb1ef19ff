//! Statements: the edges of the graph.

use super::ids::{ContributorId, StatementId, ThingId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A `(subject, predicate, object)` triple.
///
/// Statements never change their subject. Predicate and object may be
/// replaced through the statement service unless `modifiable` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Unique id
    pub id: StatementId,
    /// Subject thing (never a literal)
    pub subject: ThingId,
    /// Predicate id
    pub predicate: ThingId,
    /// Object thing; literals are referenced by their id
    pub object: ThingId,
    /// Position within an ordered list, for `hasListElement` statements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Creator
    #[serde(default)]
    pub created_by: ContributorId,
    /// Whether the statement can be updated or deleted
    #[serde(default = "default_true")]
    pub modifiable: bool,
}

fn default_true() -> bool {
    true
}

impl Statement {
    /// Whether this statement has the given predicate.
    #[must_use]
    pub fn is(&self, predicate: &str) -> bool {
        self.predicate == predicate
    }
}

/// Input for creating a statement.
#[derive(Debug, Clone)]
pub struct NewStatement {
    /// Subject
    pub subject: ThingId,
    /// Predicate
    pub predicate: ThingId,
    /// Object
    pub object: ThingId,
    /// List position
    pub index: Option<u32>,
    /// Creator
    pub created_by: ContributorId,
    /// Whether the statement can be changed later
    pub modifiable: bool,
}

impl NewStatement {
    /// A modifiable statement by the unknown contributor.
    pub fn new(
        subject: impl Into<ThingId>,
        predicate: impl Into<ThingId>,
        object: impl Into<ThingId>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            index: None,
            created_by: ContributorId::unknown(),
            modifiable: true,
        }
    }

    /// Sets the list position.
    #[must_use]
    pub fn at_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    /// Sets the creator.
    #[must_use]
    pub fn created_by(mut self, contributor: ContributorId) -> Self {
        self.created_by = contributor;
        self
    }

    /// Marks the statement as not modifiable.
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.modifiable = false;
        self
    }
}

/// Criteria for finding statements. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementFilter {
    /// Subject id
    pub subject: Option<ThingId>,
    /// Predicate id
    pub predicate: Option<ThingId>,
    /// Object id
    pub object: Option<ThingId>,
}

impl StatementFilter {
    /// Statements with the given subject.
    pub fn subject(id: impl Into<ThingId>) -> Self {
        Self {
            subject: Some(id.into()),
            ..Self::default()
        }
    }

    /// Statements with the given object.
    pub fn object(id: impl Into<ThingId>) -> Self {
        Self {
            object: Some(id.into()),
            ..Self::default()
        }
    }

    /// Narrows to the given predicate.
    #[must_use]
    pub fn with_predicate(mut self, id: impl Into<ThingId>) -> Self {
        self.predicate = Some(id.into());
        self
    }

    /// Narrows to the given object.
    #[must_use]
    pub fn with_object(mut self, id: impl Into<ThingId>) -> Self {
        self.object = Some(id.into());
        self
    }

    /// Whether `statement` satisfies every set field.
    #[must_use]
    pub fn matches(&self, statement: &Statement) -> bool {
        self.subject.as_ref().is_none_or(|s| *s == statement.subject)
            && self
                .predicate
                .as_ref()
                .is_none_or(|p| *p == statement.predicate)
            && self.object.as_ref().is_none_or(|o| *o == statement.object)
    }
}

/// Changes to a statement; the subject is fixed.
#[derive(Debug, Clone, Default)]
pub struct StatementUpdate {
    /// Replacement predicate
    pub predicate: Option<ThingId>,
    /// Replacement object
    pub object: Option<ThingId>,
}
