//! Graph nodes: resources, literals, predicates and classes.

use super::ids::{ContributorId, ThingId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Datatype assigned to literals created without one.
pub const DEFAULT_LITERAL_DATATYPE: &str = "xsd:string";

fn default_true() -> bool {
    true
}

fn default_datatype() -> String {
    DEFAULT_LITERAL_DATATYPE.to_string()
}

/// A typed node with a label, e.g. a paper or an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique id
    pub id: ThingId,
    /// Human-readable label
    pub label: String,
    /// Classes this resource is an instance of
    #[serde(default)]
    pub classes: BTreeSet<ThingId>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Creator
    #[serde(default)]
    pub created_by: ContributorId,
    /// Whether the resource can be changed or deleted
    #[serde(default = "default_true")]
    pub modifiable: bool,
}

impl Resource {
    /// Whether the resource is an instance of `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// A value node, e.g. a title, a year or a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    /// Unique id
    pub id: ThingId,
    /// The literal value
    pub label: String,
    /// Datatype of the value
    #[serde(default = "default_datatype")]
    pub datatype: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Creator
    #[serde(default)]
    pub created_by: ContributorId,
    /// Whether the literal can be changed or deleted
    #[serde(default = "default_true")]
    pub modifiable: bool,
}

/// A relation type usable in the predicate position of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    /// Unique id
    pub id: ThingId,
    /// Human-readable label
    pub label: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Creator
    #[serde(default)]
    pub created_by: ContributorId,
    /// Whether the predicate can be changed or deleted
    #[serde(default = "default_true")]
    pub modifiable: bool,
}

/// A type that resources can be instances of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    /// Unique id
    pub id: ThingId,
    /// Human-readable label
    pub label: String,
    /// External IRI of the class, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Creator
    #[serde(default)]
    pub created_by: ContributorId,
    /// Whether the class can be changed or deleted
    #[serde(default = "default_true")]
    pub modifiable: bool,
}

/// Any node of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Thing {
    /// See [`Resource`]
    Resource(Resource),
    /// See [`Literal`]
    Literal(Literal),
    /// See [`Predicate`]
    Predicate(Predicate),
    /// See [`Class`]
    Class(Class),
}

/// Discriminant of [`Thing`], also used to pick id prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThingKind {
    /// Resource, ids `R<n>`
    Resource,
    /// Literal, ids `L<n>`
    Literal,
    /// Predicate, ids `P<n>`
    Predicate,
    /// Class, ids `C<n>`
    Class,
}

impl ThingKind {
    /// Prefix of generated ids for this kind.
    #[must_use]
    pub fn id_prefix(self) -> char {
        match self {
            Self::Resource => 'R',
            Self::Literal => 'L',
            Self::Predicate => 'P',
            Self::Class => 'C',
        }
    }
}

impl fmt::Display for ThingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Resource => "resource",
            Self::Literal => "literal",
            Self::Predicate => "predicate",
            Self::Class => "class",
        };
        f.write_str(s)
    }
}

impl Thing {
    /// The thing's id.
    #[must_use]
    pub fn id(&self) -> &ThingId {
        match self {
            Self::Resource(r) => &r.id,
            Self::Literal(l) => &l.id,
            Self::Predicate(p) => &p.id,
            Self::Class(c) => &c.id,
        }
    }

    /// The thing's label (the value, for literals).
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Resource(r) => &r.label,
            Self::Literal(l) => &l.label,
            Self::Predicate(p) => &p.label,
            Self::Class(c) => &c.label,
        }
    }

    /// Which kind of thing this is.
    #[must_use]
    pub fn kind(&self) -> ThingKind {
        match self {
            Self::Resource(_) => ThingKind::Resource,
            Self::Literal(_) => ThingKind::Literal,
            Self::Predicate(_) => ThingKind::Predicate,
            Self::Class(_) => ThingKind::Class,
        }
    }

    /// Creator of the thing.
    #[must_use]
    pub fn created_by(&self) -> &ContributorId {
        match self {
            Self::Resource(r) => &r.created_by,
            Self::Literal(l) => &l.created_by,
            Self::Predicate(p) => &p.created_by,
            Self::Class(c) => &c.created_by,
        }
    }

    /// Whether the thing can be changed or deleted.
    #[must_use]
    pub fn is_modifiable(&self) -> bool {
        match self {
            Self::Resource(r) => r.modifiable,
            Self::Literal(l) => l.modifiable,
            Self::Predicate(p) => p.modifiable,
            Self::Class(c) => c.modifiable,
        }
    }

    /// Classes of the thing; only resources carry classes.
    #[must_use]
    pub fn classes(&self) -> Option<&BTreeSet<ThingId>> {
        match self {
            Self::Resource(r) => Some(&r.classes),
            _ => None,
        }
    }

    /// Whether the thing is a resource classed `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.as_resource().is_some_and(|r| r.has_class(class))
    }

    /// The resource, if this thing is one.
    #[must_use]
    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// Whether this thing is a literal.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

/// Input for creating a resource.
#[derive(Debug, Clone, Default)]
pub struct NewResource {
    /// Fixed id; generated when `None`
    pub id: Option<ThingId>,
    /// Label
    pub label: String,
    /// Classes
    pub classes: BTreeSet<ThingId>,
    /// Creator
    pub created_by: ContributorId,
    /// Whether the resource can be changed later
    pub modifiable: bool,
}

impl NewResource {
    /// A modifiable resource with the given label and classes.
    pub fn new<I, C>(label: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ThingId>,
    {
        Self {
            id: None,
            label: label.into(),
            classes: classes.into_iter().map(Into::into).collect(),
            created_by: ContributorId::unknown(),
            modifiable: true,
        }
    }

    /// Sets a fixed id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ThingId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the creator.
    #[must_use]
    pub fn created_by(mut self, contributor: ContributorId) -> Self {
        self.created_by = contributor;
        self
    }
}

/// Input for creating a literal, predicate or class.
#[derive(Debug, Clone, Default)]
pub struct NewThing {
    /// Fixed id; generated when `None`
    pub id: Option<ThingId>,
    /// Label, or value for literals
    pub label: String,
    /// Literal datatype, or class IRI
    pub extra: Option<String>,
    /// Creator
    pub created_by: ContributorId,
}

impl NewThing {
    /// A thing with a generated id.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Sets a fixed id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ThingId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the creator.
    #[must_use]
    pub fn created_by(mut self, contributor: ContributorId) -> Self {
        self.created_by = contributor;
        self
    }
}

/// Changes to a resource; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ResourceUpdate {
    /// New label
    pub label: Option<String>,
    /// Replacement class set
    pub classes: Option<BTreeSet<ThingId>>,
}

/// Criteria for listing things.
#[derive(Debug, Clone, Default)]
pub struct ThingFilter {
    /// Only things of this kind
    pub kind: Option<ThingKind>,
    /// Only resources with this class
    pub class: Option<ThingId>,
    /// Only things whose label contains this text (case-insensitive)
    pub label_contains: Option<String>,
    /// Maximum number of results
    pub limit: Option<usize>,
}

impl ThingFilter {
    /// Whether `thing` satisfies the kind, class and label criteria.
    #[must_use]
    pub fn matches(&self, thing: &Thing) -> bool {
        if self.kind.is_some_and(|k| k != thing.kind()) {
            return false;
        }
        if let Some(class) = &self.class
            && !thing.has_class(class.as_str())
        {
            return false;
        }
        if let Some(needle) = &self.label_contains
            && !thing
                .label()
                .to_lowercase()
                .contains(&needle.to_lowercase())
        {
            return false;
        }
        true
    }
}
