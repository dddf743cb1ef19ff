//! Benchmark and dataset queries: existence checks in front of the aggregator.

use crate::aggregate::{
    BenchmarkSummary, DatasetRow, DatasetSort, DatasetSummaryRow, GraphIndex, benchmark_summaries,
    benchmark_summaries_for_field, dataset_summary, datasets_for_problem, problems_for_dataset,
    research_fields_with_benchmarks,
};
use crate::domain::{BenchmarkVocabulary, ThingId, ThingRef, classes};
use crate::error::{Error, Result};
use crate::storage::GraphStorage;

/// Answers benchmark queries from a snapshot of the graph.
#[derive(Debug)]
pub struct BenchmarkService<'a> {
    index: GraphIndex,
    vocab: &'a BenchmarkVocabulary,
}

impl<'a> BenchmarkService<'a> {
    /// Indexes `storage` for querying.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub async fn load(storage: &dyn GraphStorage, vocab: &'a BenchmarkVocabulary) -> Result<Self> {
        Ok(Self::from_index(GraphIndex::load(storage).await?, vocab))
    }

    /// Queries an existing index.
    #[must_use]
    pub fn from_index(index: GraphIndex, vocab: &'a BenchmarkVocabulary) -> Self {
        Self { index, vocab }
    }

    fn require_class(
        &self,
        id: &ThingId,
        class: &str,
        missing: fn(ThingId) -> Error,
    ) -> Result<()> {
        if self.index.has_class(id, class) {
            Ok(())
        } else {
            Err(missing(id.clone()))
        }
    }

    /// Benchmark summaries of all problems, or of those in `field` and its subfields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResearchFieldNotFound`] for an unknown field.
    pub fn summaries(&self, field: Option<&ThingId>) -> Result<Vec<BenchmarkSummary>> {
        match field {
            Some(field) => {
                self.require_class(field, classes::RESEARCH_FIELD, Error::ResearchFieldNotFound)?;
                Ok(benchmark_summaries_for_field(&self.index, self.vocab, field))
            }
            None => Ok(benchmark_summaries(&self.index, self.vocab)),
        }
    }

    /// Research fields with at least one benchmarked paper.
    #[must_use]
    pub fn fields_with_benchmarks(&self) -> Vec<ThingRef> {
        research_fields_with_benchmarks(&self.index, self.vocab)
    }

    /// Datasets a problem is benchmarked on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResearchProblemNotFound`] for an unknown problem.
    pub fn datasets(&self, problem: &ThingId, sort: DatasetSort) -> Result<Vec<DatasetRow>> {
        self.require_class(problem, classes::PROBLEM, Error::ResearchProblemNotFound)?;
        Ok(datasets_for_problem(&self.index, self.vocab, problem, sort))
    }

    /// Problems benchmarked on a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceNotFound`] when `dataset` is not a dataset.
    pub fn problems(&self, dataset: &ThingId) -> Result<Vec<ThingRef>> {
        self.require_class(dataset, self.vocab.dataset_class.as_str(), Error::ResourceNotFound)?;
        Ok(problems_for_dataset(&self.index, self.vocab, dataset))
    }

    /// Results reported on a dataset for a problem.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceNotFound`] or [`Error::ResearchProblemNotFound`].
    pub fn dataset_summary(
        &self,
        dataset: &ThingId,
        problem: &ThingId,
    ) -> Result<Vec<DatasetSummaryRow>> {
        self.require_class(dataset, self.vocab.dataset_class.as_str(), Error::ResourceNotFound)?;
        self.require_class(problem, classes::PROBLEM, Error::ResearchProblemNotFound)?;
        Ok(dataset_summary(&self.index, self.vocab, dataset, problem))
    }
}
