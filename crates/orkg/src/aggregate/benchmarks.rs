//! Benchmark summaries per research problem.

use super::{
    GraphIndex, PaperContribution, ThingRef, benchmarked_contributions, datasets_of, fields_of,
    problems_of,
};
use crate::domain::{BenchmarkVocabulary, ThingId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Benchmark statistics for one research problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkSummary {
    /// The problem the benchmarks address
    pub research_problem: ThingRef,
    /// Fields of the benchmarked papers, in id order
    pub research_fields: Vec<ThingRef>,
    /// Distinct papers with a benchmarked contribution on the problem
    pub total_papers: usize,
    /// Distinct datasets used by those benchmarks
    pub total_datasets: usize,
    /// Distinct source-code links of those contributions
    pub total_codes: usize,
}

#[derive(Default)]
struct Accumulator<'a> {
    fields: BTreeSet<&'a ThingId>,
    papers: BTreeSet<&'a ThingId>,
    datasets: BTreeSet<&'a ThingId>,
    codes: BTreeSet<&'a ThingId>,
}

fn summarize<'a, F>(
    index: &'a GraphIndex,
    vocab: &BenchmarkVocabulary,
    mut keep_paper: F,
) -> Vec<BenchmarkSummary>
where
    F: FnMut(&ThingId) -> bool,
{
    let mut by_problem: BTreeMap<&'a ThingId, Accumulator<'a>> = BTreeMap::new();

    for PaperContribution {
        paper,
        contribution,
    } in benchmarked_contributions(index, vocab)
    {
        if !keep_paper(paper) {
            continue;
        }
        let fields = fields_of(index, paper);
        let datasets = datasets_of(index, vocab, contribution);
        let codes = index.objects(contribution, vocab.source_code_predicate.as_str());

        for problem in problems_of(index, contribution) {
            let acc = by_problem.entry(problem).or_default();
            acc.fields.extend(fields.iter().copied());
            acc.papers.insert(paper);
            acc.datasets.extend(datasets.iter().copied());
            acc.codes.extend(codes.iter().copied());
        }
    }

    by_problem
        .into_iter()
        .map(|(problem, acc)| BenchmarkSummary {
            research_problem: index.thing_ref(problem),
            research_fields: acc.fields.into_iter().map(|f| index.thing_ref(f)).collect(),
            total_papers: acc.papers.len(),
            total_datasets: acc.datasets.len(),
            total_codes: acc.codes.len(),
        })
        .collect()
}

/// One summary per research problem addressed by a benchmarked contribution,
/// in problem-id order.
///
/// A problem reached from several papers or fields is reported once with the
/// union of their statistics.
#[must_use]
pub fn benchmark_summaries(
    index: &GraphIndex,
    vocab: &BenchmarkVocabulary,
) -> Vec<BenchmarkSummary> {
    summarize(index, vocab, |_| true)
}

/// Like [`benchmark_summaries`], restricted to papers in `field` or any of
/// its transitive subfields.
#[must_use]
pub fn benchmark_summaries_for_field(
    index: &GraphIndex,
    vocab: &BenchmarkVocabulary,
    field: &ThingId,
) -> Vec<BenchmarkSummary> {
    let fields = index.field_with_subfields(field);
    summarize(index, vocab, |paper| {
        fields_of(index, paper).iter().any(|f| fields.contains(f))
    })
}

/// Research fields of all benchmarked papers, in id order.
#[must_use]
pub fn research_fields_with_benchmarks(
    index: &GraphIndex,
    vocab: &BenchmarkVocabulary,
) -> Vec<ThingRef> {
    let fields: BTreeSet<&ThingId> = benchmarked_contributions(index, vocab)
        .into_iter()
        .flat_map(|pc| fields_of(index, pc.paper))
        .collect();
    fields.into_iter().map(|f| index.thing_ref(f)).collect()
}
