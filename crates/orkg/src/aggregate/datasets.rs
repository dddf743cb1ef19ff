//! Dataset statistics: which datasets a problem is benchmarked on, and the
//! results reported for a dataset.

use super::{GraphIndex, ThingRef, benchmarks_of, datasets_of, papers_of, problems_of};
use crate::domain::{BenchmarkVocabulary, ThingId, classes, predicates};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Usage statistics of one dataset for a research problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetRow {
    /// Dataset id
    pub id: ThingId,
    /// Dataset label
    pub label: String,
    /// Distinct papers benchmarking on the dataset
    pub total_papers: usize,
    /// Distinct models evaluated on the dataset
    pub total_models: usize,
    /// Distinct source-code links of those contributions
    pub total_codes: usize,
}

/// Ordering of [`datasets_for_problem`] rows. Counts sort descending, ties by id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSort {
    /// Most models first
    #[default]
    Models,
    /// Most papers first
    Papers,
    /// Most code links first
    Codes,
}

impl DatasetSort {
    fn key(self, row: &DatasetRow) -> usize {
        match self {
            Self::Models => row.total_models,
            Self::Papers => row.total_papers,
            Self::Codes => row.total_codes,
        }
    }
}

/// One reported result on a dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DatasetSummaryRow {
    /// Evaluated model, if the contribution names one
    pub model_name: Option<String>,
    /// Model id
    pub model_id: Option<ThingId>,
    /// Metric label
    pub metric: String,
    /// Score as written in the graph
    pub score: String,
    /// Paper reporting the result
    pub paper_id: ThingId,
    /// Paper title
    pub paper_title: String,
    /// Publication month
    pub paper_month: Option<String>,
    /// Publication year
    pub paper_year: Option<String>,
    /// Source-code links of the contribution
    pub code_urls: Vec<String>,
}

#[derive(Default)]
struct Usage<'a> {
    papers: BTreeSet<&'a ThingId>,
    models: BTreeSet<&'a ThingId>,
    codes: BTreeSet<&'a ThingId>,
}

fn models_of<'a>(
    index: &'a GraphIndex,
    vocab: &BenchmarkVocabulary,
    contribution: &ThingId,
) -> BTreeSet<&'a ThingId> {
    index.objects_of_class(
        contribution,
        vocab.model_predicate.as_str(),
        vocab.model_class.as_str(),
    )
}

fn contributions_on<'a>(index: &'a GraphIndex, problem: &ThingId) -> BTreeSet<&'a ThingId> {
    index.subjects_of_class(
        predicates::HAS_RESEARCH_PROBLEM,
        problem,
        classes::CONTRIBUTION,
    )
}

/// Datasets used by benchmarks of contributions addressing `problem`.
///
/// Papers, models and code links are counted per dataset over the
/// contributions whose benchmark uses it.
#[must_use]
pub fn datasets_for_problem(
    index: &GraphIndex,
    vocab: &BenchmarkVocabulary,
    problem: &ThingId,
    sort: DatasetSort,
) -> Vec<DatasetRow> {
    let mut usage: BTreeMap<&ThingId, Usage<'_>> = BTreeMap::new();

    for contribution in contributions_on(index, problem) {
        let papers = papers_of(index, contribution);
        let models = models_of(index, vocab, contribution);
        let codes = index.objects(contribution, vocab.source_code_predicate.as_str());

        for dataset in datasets_of(index, vocab, contribution) {
            let entry = usage.entry(dataset).or_default();
            entry.papers.extend(papers.iter().copied());
            entry.models.extend(models.iter().copied());
            entry.codes.extend(codes.iter().copied());
        }
    }

    let mut rows: Vec<DatasetRow> = usage
        .into_iter()
        .map(|(dataset, u)| DatasetRow {
            id: dataset.clone(),
            label: index.label(dataset).to_string(),
            total_papers: u.papers.len(),
            total_models: u.models.len(),
            total_codes: u.codes.len(),
        })
        .collect();
    rows.sort_by(|a, b| sort.key(b).cmp(&sort.key(a)).then_with(|| a.id.cmp(&b.id)));
    rows
}

/// Research problems of contributions whose benchmark uses `dataset`, in id order.
#[must_use]
pub fn problems_for_dataset(
    index: &GraphIndex,
    vocab: &BenchmarkVocabulary,
    dataset: &ThingId,
) -> Vec<ThingRef> {
    let problems: BTreeSet<&ThingId> = index
        .subjects_of_class(
            vocab.dataset_predicate.as_str(),
            dataset,
            vocab.benchmark_class.as_str(),
        )
        .into_iter()
        .flat_map(|benchmark| {
            index.subjects_of_class(
                vocab.benchmark_predicate.as_str(),
                benchmark,
                classes::CONTRIBUTION,
            )
        })
        .flat_map(|contribution| problems_of(index, contribution))
        .collect();
    problems.into_iter().map(|p| index.thing_ref(p)).collect()
}

/// Results reported on `dataset` for `problem`.
///
/// Yields one row per evaluation of a matching benchmark and model of the
/// contribution; a contribution without models contributes rows with no
/// model. Rows are sorted by model, then metric, score and paper.
#[must_use]
pub fn dataset_summary(
    index: &GraphIndex,
    vocab: &BenchmarkVocabulary,
    dataset: &ThingId,
    problem: &ThingId,
) -> Vec<DatasetSummaryRow> {
    let mut rows = Vec::new();

    for contribution in contributions_on(index, problem) {
        let benchmarks: Vec<&ThingId> = benchmarks_of(index, vocab, contribution)
            .into_iter()
            .filter(|b| {
                index
                    .objects(b, vocab.dataset_predicate.as_str())
                    .contains(dataset)
            })
            .collect();
        if benchmarks.is_empty() {
            continue;
        }

        let models: Vec<Option<&ThingId>> = {
            let models = models_of(index, vocab, contribution);
            if models.is_empty() {
                vec![None]
            } else {
                models.into_iter().map(Some).collect()
            }
        };
        let code_urls: Vec<String> = index
            .objects(contribution, vocab.source_code_predicate.as_str())
            .into_iter()
            .map(|code| index.label(code).to_string())
            .collect();

        for paper in papers_of(index, contribution) {
            let paper_month = index
                .first_object(paper, predicates::MONTH_PUBLISHED)
                .map(|m| index.label(m).to_string());
            let paper_year = index
                .first_object(paper, predicates::YEAR_PUBLISHED)
                .map(|y| index.label(y).to_string());

            for benchmark in &benchmarks {
                for evaluation in index.objects(benchmark, vocab.evaluation_predicate.as_str()) {
                    let metric = index
                        .first_object(evaluation, vocab.metric_predicate.as_str())
                        .map(|m| index.label(m).to_string())
                        .unwrap_or_default();
                    let score = index
                        .first_object(evaluation, vocab.quantity_value_predicate.as_str())
                        .and_then(|value| {
                            index.first_object(value, vocab.numeric_value_predicate.as_str())
                        })
                        .map(|s| index.label(s).to_string())
                        .unwrap_or_default();

                    for &model in &models {
                        rows.push(DatasetSummaryRow {
                            model_name: model.map(|m| index.label(m).to_string()),
                            model_id: model.cloned(),
                            metric: metric.clone(),
                            score: score.clone(),
                            paper_id: paper.clone(),
                            paper_title: index.label(paper).to_string(),
                            paper_month: paper_month.clone(),
                            paper_year: paper_year.clone(),
                            code_urls: code_urls.clone(),
                        });
                    }
                }
            }
        }
    }

    rows.sort();
    rows.dedup();
    rows
}
