//! Well-known class and predicate ids.

use super::ids::ThingId;
use serde::{Deserialize, Serialize};

/// Well-known class ids.
pub mod classes {
    /// A scholarly paper
    pub const PAPER: &str = "Paper";
    /// A contribution of a paper
    pub const CONTRIBUTION: &str = "Contribution";
    /// A research problem
    pub const PROBLEM: &str = "Problem";
    /// A research field
    pub const RESEARCH_FIELD: &str = "ResearchField";
    /// A person who authored content
    pub const AUTHOR: &str = "Author";
    /// An ordered list (e.g. of authors)
    pub const LIST: &str = "List";
    /// A comparison of contributions
    pub const COMPARISON: &str = "Comparison";
    /// A resource attached to a comparison
    pub const COMPARISON_RELATED_RESOURCE: &str = "ComparisonRelatedResource";
    /// A figure attached to a comparison
    pub const COMPARISON_RELATED_FIGURE: &str = "ComparisonRelatedFigure";
    /// A curated literature list
    pub const LITERATURE_LIST: &str = "LiteratureList";
    /// A section of a literature list
    pub const LIST_SECTION: &str = "ListSection";
    /// A structured review article
    pub const SMART_REVIEW: &str = "SmartReview";
    /// A smart review that has been published and is frozen
    pub const SMART_REVIEW_PUBLISHED: &str = "SmartReviewPublished";
    /// The contribution holding a smart review's sections
    pub const SMART_REVIEW_CONTRIBUTION: &str = "ContributionSmartReview";
    /// A reified n-ary statement; never the subject of plain statements
    pub const ROSETTA_STONE_STATEMENT: &str = "RosettaStoneStatement";
}

/// Well-known predicate ids.
pub mod predicates {
    /// Paper DOI literal
    pub const HAS_DOI: &str = "P26";
    /// Paper to a single author (legacy, superseded by the author list)
    pub const HAS_AUTHOR: &str = "P27";
    /// Month of publication literal
    pub const MONTH_PUBLISHED: &str = "P28";
    /// Year of publication literal
    pub const YEAR_PUBLISHED: &str = "P29";
    /// Paper to research field
    pub const HAS_RESEARCH_FIELD: &str = "P30";
    /// Paper to contribution
    pub const HAS_CONTRIBUTION: &str = "P31";
    /// Contribution to research problem
    pub const HAS_RESEARCH_PROBLEM: &str = "P32";
    /// Research field to subfield
    pub const HAS_SUBFIELD: &str = "P36";
    /// Paper to its author list
    pub const HAS_AUTHORS: &str = "hasAuthors";
    /// List to element
    pub const HAS_LIST_ELEMENT: &str = "hasListElement";
    /// Author to ORCID literal
    pub const HAS_ORCID: &str = "HAS_ORCID";
    /// Literature list or smart review contribution to section
    pub const HAS_SECTION: &str = "hasSection";
    /// List section to entry
    pub const HAS_ENTRY: &str = "hasEntry";
    /// Entry or section to the content it shows
    pub const HAS_LINK: &str = "hasLink";
    /// Comparison to compared contribution
    pub const COMPARE_CONTRIBUTION: &str = "compareContribution";
    /// Comparison to related resource
    pub const HAS_RELATED_RESOURCE: &str = "hasRelatedResource";
    /// Comparison to related figure
    pub const HAS_RELATED_FIGURE: &str = "hasRelatedFigure";
    /// Newer version to the version it replaces
    pub const HAS_PREVIOUS_VERSION: &str = "hasPreviousVersion";
}

/// Predicates a root owns its children through, for cascade deletes.
#[must_use]
pub fn default_owning_predicates() -> Vec<ThingId> {
    [
        predicates::HAS_CONTRIBUTION,
        predicates::HAS_AUTHORS,
        predicates::HAS_LIST_ELEMENT,
    ]
    .into_iter()
    .map(ThingId::from)
    .collect()
}

/// Extra predicates a section owns its children through, on top of the
/// default owning predicates.
#[must_use]
pub fn section_owning_predicates() -> Vec<ThingId> {
    vec![ThingId::from(predicates::HAS_ENTRY)]
}

/// Ids describing benchmark results in the graph.
///
/// The layout is: contribution `benchmark` benchmark, benchmark `dataset`
/// dataset, benchmark `evaluation` quantity, quantity `metric` metric,
/// quantity `quantity_value` value node, value node `numeric_value` literal.
/// Contributions link `source_code` literals and `model` resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BenchmarkVocabulary {
    /// Contribution to benchmark
    pub benchmark_predicate: ThingId,
    /// Benchmark to dataset
    pub dataset_predicate: ThingId,
    /// Contribution to source-code URL literal
    pub source_code_predicate: ThingId,
    /// Contribution to model
    pub model_predicate: ThingId,
    /// Benchmark to evaluation quantity
    pub evaluation_predicate: ThingId,
    /// Quantity to metric
    pub metric_predicate: ThingId,
    /// Quantity to value node
    pub quantity_value_predicate: ThingId,
    /// Value node to score literal
    pub numeric_value_predicate: ThingId,
    /// Class of benchmarks
    pub benchmark_class: ThingId,
    /// Class of datasets
    pub dataset_class: ThingId,
    /// Class of models
    pub model_class: ThingId,
    /// Class of evaluation quantities
    pub quantity_class: ThingId,
    /// Class of quantity values
    pub quantity_value_class: ThingId,
    /// Class of metrics
    pub metric_class: ThingId,
}

impl Default for BenchmarkVocabulary {
    fn default() -> Self {
        Self {
            benchmark_predicate: "HAS_BENCHMARK".into(),
            dataset_predicate: "HAS_DATASET".into(),
            source_code_predicate: "HAS_SOURCE_CODE".into(),
            model_predicate: "HAS_MODEL".into(),
            evaluation_predicate: "HAS_EVALUATION".into(),
            metric_predicate: "HAS_METRIC".into(),
            quantity_value_predicate: "HAS_VALUE".into(),
            numeric_value_predicate: "HAS_NUMERIC_VALUE".into(),
            benchmark_class: "Benchmark".into(),
            dataset_class: "Dataset".into(),
            model_class: "Model".into(),
            quantity_class: "Quantity".into(),
            quantity_value_class: "QuantityValue".into(),
            metric_class: "Metric".into(),
        }
    }
}
