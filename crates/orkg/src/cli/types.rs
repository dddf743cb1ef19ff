//! CLI value enums and domain type conversions.

use clap::ValueEnum;

use crate::aggregate::DatasetSort;
use crate::domain::ThingKind;
use crate::services::RelatedKind;

// ============================================================================
// Value Enums
// ============================================================================

/// Row order for the `datasets` command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetSortArg {
    /// Most models first
    #[default]
    Models,
    /// Most papers first
    Papers,
    /// Most source-code links first
    Codes,
}

impl std::fmt::Display for DatasetSortArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Models => write!(f, "models"),
            Self::Papers => write!(f, "papers"),
            Self::Codes => write!(f, "codes"),
        }
    }
}

/// What a comparison links to
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelatedKindArg {
    /// A related resource
    #[default]
    Resource,
    /// A related figure
    Figure,
}

impl std::fmt::Display for RelatedKindArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resource => write!(f, "resource"),
            Self::Figure => write!(f, "figure"),
        }
    }
}

/// Kind filter for listing things
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThingKindArg {
    /// Resources
    Resource,
    /// Literals
    Literal,
    /// Predicates
    Predicate,
    /// Classes
    Class,
}

// ============================================================================
// Domain Type Conversions
// ============================================================================

impl From<DatasetSortArg> for DatasetSort {
    fn from(arg: DatasetSortArg) -> Self {
        match arg {
            DatasetSortArg::Models => DatasetSort::Models,
            DatasetSortArg::Papers => DatasetSort::Papers,
            DatasetSortArg::Codes => DatasetSort::Codes,
        }
    }
}

impl From<RelatedKindArg> for RelatedKind {
    fn from(arg: RelatedKindArg) -> Self {
        match arg {
            RelatedKindArg::Resource => RelatedKind::Resource,
            RelatedKindArg::Figure => RelatedKind::Figure,
        }
    }
}

impl From<ThingKindArg> for ThingKind {
    fn from(arg: ThingKindArg) -> Self {
        match arg {
            ThingKindArg::Resource => ThingKind::Resource,
            ThingKindArg::Literal => ThingKind::Literal,
            ThingKindArg::Predicate => ThingKind::Predicate,
            ThingKindArg::Class => ThingKind::Class,
        }
    }
}
