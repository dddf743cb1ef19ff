//! Aggregator: benchmark and dataset statistics over the statement graph.
//!
//! Aggregations run on a [`GraphIndex`], a read-only view of things plus
//! statements indexed in both directions. Every function here is pure and
//! returns its rows in a fixed order, so the same graph yields the same
//! output no matter in which order its statements were loaded.
//!
//! The shape walked by the aggregators, with the default vocabulary:
//!
//! ```text
//! (Paper) -P30-> (ResearchField) -P36-> (ResearchField)
//!    |
//!   P31
//!    v
//! (Contribution) -P32-> (Problem)
//!    |  |  \--HAS_SOURCE_CODE--> code
//!    |  \--HAS_MODEL--> (Model)
//!    \--HAS_BENCHMARK--> (Benchmark) -HAS_DATASET-> (Dataset)
//!                            \--HAS_EVALUATION--> (Quantity) -HAS_METRIC-> (Metric)
//!                                                     \--HAS_VALUE--> (QuantityValue)
//!                                                             \--HAS_NUMERIC_VALUE--> score
//! ```

mod benchmarks;
mod datasets;

pub use benchmarks::{
    BenchmarkSummary, benchmark_summaries, benchmark_summaries_for_field,
    research_fields_with_benchmarks,
};
pub use datasets::{
    DatasetRow, DatasetSort, DatasetSummaryRow, dataset_summary, datasets_for_problem,
    problems_for_dataset,
};

use crate::domain::{
    BenchmarkVocabulary, Statement, Thing, ThingId, ThingRef, classes, predicates,
};
use crate::error::Result;
use crate::fetcher::GroupedStatements;
use crate::storage::GraphStorage;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Things and statements indexed by subject and by object.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    things: HashMap<ThingId, Thing>,
    outgoing: GroupedStatements,
    incoming: BTreeMap<ThingId, Vec<Statement>>,
}

impl GraphIndex {
    /// Indexes the given things and statements.
    pub fn new<T, S>(things: T, statements: S) -> Self
    where
        T: IntoIterator<Item = Thing>,
        S: IntoIterator<Item = Statement>,
    {
        let things: HashMap<ThingId, Thing> =
            things.into_iter().map(|t| (t.id().clone(), t)).collect();
        let outgoing = GroupedStatements::from_statements(statements);

        let mut incoming: BTreeMap<ThingId, Vec<Statement>> = BTreeMap::new();
        for statement in outgoing.statements() {
            incoming
                .entry(statement.object.clone())
                .or_default()
                .push(statement.clone());
        }

        Self {
            things,
            outgoing,
            incoming,
        }
    }

    /// Indexes the full contents of `storage`.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub async fn load(storage: &dyn GraphStorage) -> Result<Self> {
        let snapshot = storage.export_snapshot().await?;
        tracing::debug!(
            things = snapshot.things.len(),
            statements = snapshot.statements.len(),
            "Indexed graph for aggregation"
        );
        Ok(Self::new(snapshot.things, snapshot.statements))
    }

    /// Looks up a thing.
    #[must_use]
    pub fn thing(&self, id: &ThingId) -> Option<&Thing> {
        self.things.get(id)
    }

    /// Label of `id`, empty for unknown ids.
    #[must_use]
    pub fn label(&self, id: &ThingId) -> &str {
        self.thing(id).map_or("", Thing::label)
    }

    /// Whether `id` is a resource classed `class`.
    #[must_use]
    pub fn has_class(&self, id: &ThingId, class: &str) -> bool {
        self.thing(id).is_some_and(|t| t.has_class(class))
    }

    /// Id and label of `id`.
    #[must_use]
    pub fn thing_ref(&self, id: &ThingId) -> ThingRef {
        ThingRef {
            id: id.clone(),
            label: self.label(id).to_string(),
        }
    }

    /// Objects of `subject`'s statements with `predicate`, in id order.
    #[must_use]
    pub fn objects(&self, subject: &ThingId, predicate: &str) -> BTreeSet<&ThingId> {
        self.outgoing
            .outgoing(subject)
            .iter()
            .filter(|s| s.is(predicate))
            .map(|s| &s.object)
            .collect()
    }

    /// Objects of `subject` via `predicate` that are classed `class`.
    #[must_use]
    pub fn objects_of_class(
        &self,
        subject: &ThingId,
        predicate: &str,
        class: &str,
    ) -> BTreeSet<&ThingId> {
        self.objects(subject, predicate)
            .into_iter()
            .filter(|id| self.has_class(id, class))
            .collect()
    }

    /// Subjects of statements with `predicate` pointing at `object`, in id order.
    #[must_use]
    pub fn subjects(&self, predicate: &str, object: &ThingId) -> BTreeSet<&ThingId> {
        self.incoming
            .get(object)
            .into_iter()
            .flatten()
            .filter(|s| s.is(predicate))
            .map(|s| &s.subject)
            .collect()
    }

    /// Subjects via `predicate` pointing at `object` that are classed `class`.
    #[must_use]
    pub fn subjects_of_class(
        &self,
        predicate: &str,
        object: &ThingId,
        class: &str,
    ) -> BTreeSet<&ThingId> {
        self.subjects(predicate, object)
            .into_iter()
            .filter(|id| self.has_class(id, class))
            .collect()
    }

    /// First object of `subject` via `predicate`, by id.
    #[must_use]
    pub fn first_object(&self, subject: &ThingId, predicate: &str) -> Option<&ThingId> {
        self.objects(subject, predicate).into_iter().next()
    }

    /// `root` and every field reachable from it through `hasSubfield`.
    #[must_use]
    pub fn field_with_subfields(&self, root: &ThingId) -> BTreeSet<&ThingId> {
        let mut seen: BTreeSet<&ThingId> = BTreeSet::new();
        let Some((key, _)) = self.things.get_key_value(root) else {
            return seen;
        };
        let mut stack = vec![key];
        while let Some(field) = stack.pop() {
            if !seen.insert(field) {
                continue;
            }
            stack.extend(self.objects(field, predicates::HAS_SUBFIELD));
        }
        seen
    }
}

/// A paper together with one of its contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PaperContribution<'a> {
    paper: &'a ThingId,
    contribution: &'a ThingId,
}

/// Benchmarks of a contribution.
fn benchmarks_of<'a>(
    index: &'a GraphIndex,
    vocab: &BenchmarkVocabulary,
    contribution: &ThingId,
) -> BTreeSet<&'a ThingId> {
    index.objects_of_class(
        contribution,
        vocab.benchmark_predicate.as_str(),
        vocab.benchmark_class.as_str(),
    )
}

/// Datasets used by any benchmark of a contribution.
fn datasets_of<'a>(
    index: &'a GraphIndex,
    vocab: &BenchmarkVocabulary,
    contribution: &ThingId,
) -> BTreeSet<&'a ThingId> {
    benchmarks_of(index, vocab, contribution)
        .into_iter()
        .flat_map(|benchmark| {
            index.objects_of_class(
                benchmark,
                vocab.dataset_predicate.as_str(),
                vocab.dataset_class.as_str(),
            )
        })
        .collect()
}

/// Research problems addressed by a contribution.
fn problems_of<'a>(index: &'a GraphIndex, contribution: &ThingId) -> BTreeSet<&'a ThingId> {
    index.objects_of_class(
        contribution,
        predicates::HAS_RESEARCH_PROBLEM,
        classes::PROBLEM,
    )
}

/// Papers that hold a contribution.
fn papers_of<'a>(index: &'a GraphIndex, contribution: &ThingId) -> BTreeSet<&'a ThingId> {
    index.subjects_of_class(predicates::HAS_CONTRIBUTION, contribution, classes::PAPER)
}

/// Every (paper, contribution) pair where the contribution has a benchmark.
fn benchmarked_contributions<'a>(
    index: &'a GraphIndex,
    vocab: &BenchmarkVocabulary,
) -> BTreeSet<PaperContribution<'a>> {
    let mut pairs = BTreeSet::new();
    for statement in index.outgoing.statements() {
        if !statement.is(vocab.benchmark_predicate.as_str())
            || !index.has_class(&statement.object, vocab.benchmark_class.as_str())
            || !index.has_class(&statement.subject, classes::CONTRIBUTION)
        {
            continue;
        }
        for paper in papers_of(index, &statement.subject) {
            pairs.insert(PaperContribution {
                paper,
                contribution: &statement.subject,
            });
        }
    }
    pairs
}

/// Research fields of a paper.
fn fields_of<'a>(index: &'a GraphIndex, paper: &ThingId) -> BTreeSet<&'a ThingId> {
    index.objects_of_class(paper, predicates::HAS_RESEARCH_FIELD, classes::RESEARCH_FIELD)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small graph builders shared by the aggregator tests.

    use crate::domain::{ContributorId, Literal, Resource, Statement, Thing, ThingId};
    use chrono::Utc;

    /// Accumulates things and statements for a [`super::GraphIndex`].
    #[derive(Default)]
    pub(crate) struct GraphBuilder {
        pub(crate) things: Vec<Thing>,
        pub(crate) statements: Vec<Statement>,
    }

    impl GraphBuilder {
        pub(crate) fn resource(&mut self, id: &str, label: &str, classes: &[&str]) -> &mut Self {
            self.things.push(Thing::Resource(Resource {
                id: id.into(),
                label: label.to_string(),
                classes: classes.iter().map(|c| ThingId::new(*c)).collect(),
                created_at: Utc::now(),
                created_by: ContributorId::unknown(),
                modifiable: true,
            }));
            self
        }

        pub(crate) fn literal(&mut self, id: &str, value: &str) -> &mut Self {
            self.things.push(Thing::Literal(Literal {
                id: id.into(),
                label: value.to_string(),
                datatype: "xsd:string".to_string(),
                created_at: Utc::now(),
                created_by: ContributorId::unknown(),
                modifiable: true,
            }));
            self
        }

        pub(crate) fn link(&mut self, s: &str, p: &str, o: &str) -> &mut Self {
            let id = format!("S{}", self.statements.len() + 1);
            self.statements.push(Statement {
                id: id.into(),
                subject: s.into(),
                predicate: p.into(),
                object: o.into(),
                index: None,
                created_at: Utc::now(),
                created_by: ContributorId::unknown(),
                modifiable: true,
            });
            self
        }

        pub(crate) fn build(&self) -> super::GraphIndex {
            super::GraphIndex::new(self.things.clone(), self.statements.clone())
        }
    }
}
