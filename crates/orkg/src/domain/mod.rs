//! Domain types for the statement graph.
//!
//! Everything in the graph is a [`Thing`] (resource, literal, predicate or
//! class) connected by [`Statement`]s. Content types such as papers or
//! comparisons are conventions over these two building blocks, expressed
//! through the well-known ids in [`vocab`].

mod bundle;
mod ids;
mod statement;
mod thing;
pub mod vocab;

pub use bundle::BundleConfiguration;
pub use ids::{ContributorId, StatementId, ThingId, validate_thing_id};
pub use statement::{NewStatement, Statement, StatementFilter, StatementUpdate};
pub use thing::{
    Class, DEFAULT_LITERAL_DATATYPE, Literal, NewResource, NewThing, Predicate, Resource,
    ResourceUpdate, Thing, ThingFilter, ThingKind,
};
pub use vocab::{
    BenchmarkVocabulary, classes, default_owning_predicates, predicates, section_owning_predicates,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum label length in characters.
pub const MAX_LABEL_LENGTH: usize = 8164;

/// Id and label of a thing, as shown in query results.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ThingRef {
    /// Thing id
    pub id: ThingId,
    /// Thing label
    pub label: String,
}

impl ThingRef {
    /// Reference to `thing`.
    #[must_use]
    pub fn of(thing: &Thing) -> Self {
        Self {
            id: thing.id().clone(),
            label: thing.label().to_string(),
        }
    }
}

/// One line of a graph snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum GraphRecord {
    /// A node
    Thing(Thing),
    /// An edge
    Statement(Statement),
    /// Highest id counter handed out for a prefix, so deleted ids stay retired
    Counter {
        /// Id prefix, e.g. `R`
        prefix: char,
        /// Last counter value used
        value: u64,
    },
}

/// The complete contents of a graph store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    /// All things, in id order
    pub things: Vec<Thing>,
    /// All statements, in id order
    pub statements: Vec<Statement>,
    /// Id counter per prefix
    pub counters: BTreeMap<char, u64>,
}

impl GraphSnapshot {
    /// Snapshot as records: counters, then things, then statements, so
    /// statements never precede their endpoints.
    pub fn into_records(self) -> impl Iterator<Item = GraphRecord> {
        self.counters
            .into_iter()
            .map(|(prefix, value)| GraphRecord::Counter { prefix, value })
            .chain(self.things.into_iter().map(GraphRecord::Thing))
            .chain(self.statements.into_iter().map(GraphRecord::Statement))
    }

    /// Collects records in any order back into a snapshot.
    ///
    /// A repeated counter keeps its highest value.
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = GraphRecord>,
    {
        let mut snapshot = Self::default();
        for record in records {
            match record {
                GraphRecord::Thing(thing) => snapshot.things.push(thing),
                GraphRecord::Statement(statement) => snapshot.statements.push(statement),
                GraphRecord::Counter { prefix, value } => {
                    let counter = snapshot.counters.entry(prefix).or_insert(0);
                    *counter = (*counter).max(value);
                }
            }
        }
        snapshot
    }
}

/// Checks that a label is non-blank, single-line and not overly long.
///
/// # Errors
///
/// Returns the reason the label was rejected.
pub fn validate_label(label: &str) -> Result<(), String> {
    if label.trim().is_empty() {
        return Err("label must not be blank".to_string());
    }
    if label.contains('\n') || label.contains('\r') {
        return Err("label must be a single line".to_string());
    }
    if label.chars().count() > MAX_LABEL_LENGTH {
        return Err(format!(
            "label must be at most {MAX_LABEL_LENGTH} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Attention Is All You Need", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("first\nsecond", false)]
    #[case("carriage\rreturn", false)]
    fn test_validate_label(#[case] label: &str, #[case] valid: bool) {
        assert_eq!(validate_label(label).is_ok(), valid);
    }

    #[test]
    fn test_thing_record_is_tagged() {
        let thing = Thing::Predicate(Predicate {
            id: ThingId::new("P31"),
            label: "has contribution".to_string(),
            created_at: chrono::Utc::now(),
            created_by: ContributorId::unknown(),
            modifiable: true,
        });
        let json = serde_json::to_value(GraphRecord::Thing(thing.clone())).unwrap();

        assert_eq!(json["record"], "thing");
        assert_eq!(json["type"], "predicate");
        let back: GraphRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, GraphRecord::Thing(thing));
    }

    #[test]
    fn test_counter_records_lead_and_merge() {
        let snapshot = GraphSnapshot {
            counters: BTreeMap::from([('R', 7), ('S', 3)]),
            ..GraphSnapshot::default()
        };
        let records: Vec<GraphRecord> = snapshot.into_records().collect();
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json, serde_json::json!({"record": "counter", "prefix": "R", "value": 7}));

        let merged = GraphSnapshot::from_records([
            GraphRecord::Counter { prefix: 'R', value: 9 },
            GraphRecord::Counter { prefix: 'R', value: 4 },
        ]);
        assert_eq!(merged.counters, BTreeMap::from([('R', 9)]));
    }
}
