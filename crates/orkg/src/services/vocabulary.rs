//! Well-known predicates and classes a fresh graph is seeded with.

use crate::domain::{BenchmarkVocabulary, NewThing, ThingId, classes, predicates};
use crate::error::Result;
use crate::storage::GraphStorage;

const PREDICATES: &[(&str, &str)] = &[
    (predicates::HAS_DOI, "has DOI"),
    (predicates::HAS_AUTHOR, "has author"),
    (predicates::MONTH_PUBLISHED, "month published"),
    (predicates::YEAR_PUBLISHED, "year published"),
    (predicates::HAS_RESEARCH_FIELD, "has research field"),
    (predicates::HAS_CONTRIBUTION, "has contribution"),
    (predicates::HAS_RESEARCH_PROBLEM, "has research problem"),
    (predicates::HAS_SUBFIELD, "has subfield"),
    (predicates::HAS_AUTHORS, "has authors"),
    (predicates::HAS_LIST_ELEMENT, "has list element"),
    (predicates::HAS_ORCID, "has ORCID"),
    (predicates::HAS_SECTION, "has section"),
    (predicates::HAS_ENTRY, "has entry"),
    (predicates::HAS_LINK, "has link"),
    (predicates::COMPARE_CONTRIBUTION, "compare contribution"),
    (predicates::HAS_RELATED_RESOURCE, "has related resource"),
    (predicates::HAS_RELATED_FIGURE, "has related figure"),
    (predicates::HAS_PREVIOUS_VERSION, "has previous version"),
];

const CLASSES: &[(&str, &str)] = &[
    (classes::PAPER, "Paper"),
    (classes::CONTRIBUTION, "Contribution"),
    (classes::PROBLEM, "Research problem"),
    (classes::RESEARCH_FIELD, "Research field"),
    (classes::AUTHOR, "Author"),
    (classes::LIST, "List"),
    (classes::COMPARISON, "Comparison"),
    (classes::COMPARISON_RELATED_RESOURCE, "Comparison related resource"),
    (classes::COMPARISON_RELATED_FIGURE, "Comparison related figure"),
    (classes::LITERATURE_LIST, "Literature list"),
    (classes::LIST_SECTION, "List section"),
    (classes::SMART_REVIEW, "Smart review"),
    (classes::SMART_REVIEW_PUBLISHED, "Published smart review"),
    (classes::SMART_REVIEW_CONTRIBUTION, "Smart review contribution"),
    (classes::ROSETTA_STONE_STATEMENT, "Rosetta stone statement"),
];

fn benchmark_predicates(vocab: &BenchmarkVocabulary) -> [(&ThingId, &'static str); 8] {
    [
        (&vocab.benchmark_predicate, "has benchmark"),
        (&vocab.dataset_predicate, "has dataset"),
        (&vocab.source_code_predicate, "has source code"),
        (&vocab.model_predicate, "has model"),
        (&vocab.evaluation_predicate, "has evaluation"),
        (&vocab.metric_predicate, "has metric"),
        (&vocab.quantity_value_predicate, "has value"),
        (&vocab.numeric_value_predicate, "has numeric value"),
    ]
}

fn benchmark_classes(vocab: &BenchmarkVocabulary) -> [(&ThingId, &'static str); 6] {
    [
        (&vocab.benchmark_class, "Benchmark"),
        (&vocab.dataset_class, "Dataset"),
        (&vocab.model_class, "Model"),
        (&vocab.quantity_class, "Quantity"),
        (&vocab.quantity_value_class, "Quantity value"),
        (&vocab.metric_class, "Metric"),
    ]
}

/// Creates every well-known predicate and class that does not exist yet.
///
/// Returns how many things were created; running it twice creates nothing
/// the second time.
///
/// # Errors
///
/// Propagates storage errors.
pub async fn ensure_vocabulary(
    storage: &mut dyn GraphStorage,
    benchmark: &BenchmarkVocabulary,
) -> Result<usize> {
    let mut created = 0;

    let wanted_predicates = PREDICATES
        .iter()
        .map(|(id, label)| (ThingId::from(*id), *label))
        .chain(
            benchmark_predicates(benchmark)
                .into_iter()
                .map(|(id, label)| (id.clone(), label)),
        );
    for (id, label) in wanted_predicates {
        if storage.find_thing(&id).await?.is_none() {
            storage
                .create_predicate(NewThing::new(label).with_id(id))
                .await?;
            created += 1;
        }
    }

    let wanted_classes = CLASSES
        .iter()
        .map(|(id, label)| (ThingId::from(*id), *label))
        .chain(
            benchmark_classes(benchmark)
                .into_iter()
                .map(|(id, label)| (id.clone(), label)),
        );
    for (id, label) in wanted_classes {
        if storage.find_thing(&id).await?.is_none() {
            storage.create_class(NewThing::new(label).with_id(id)).await?;
            created += 1;
        }
    }

    if created > 0 {
        tracing::info!(created, "Seeded vocabulary");
    }
    Ok(created)
}
