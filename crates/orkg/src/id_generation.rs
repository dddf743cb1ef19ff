//! Sequential id allocation.
//!
//! Generated ids are a one-letter prefix followed by a counter: `R1`, `R2`,
//! `P1`, `S1`, ... Each prefix has its own counter. Ids that already exist
//! (loaded from disk or created with a fixed id) are registered so the
//! generator never hands them out. Counters only ever move forward, and
//! [`IdGenerator::counters`] exposes them so a snapshot can carry them across
//! a save and reload.
//!
//! # Example
//!
//! ```
//! use orkg::id_generation::IdGenerator;
//!
//! let mut generator = IdGenerator::new();
//! generator.register_id("R7");
//!
//! assert_eq!(generator.next_id('R'), "R8");
//! assert_eq!(generator.next_id('S'), "S1");
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Allocates ids that are unique among all registered ids.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    /// Highest counter handed out or registered, per prefix
    counters: HashMap<char, u64>,
    existing_ids: HashSet<String>,
}

impl IdGenerator {
    /// Creates a generator with no registered ids.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as taken.
    ///
    /// If the id has the generated shape (`<letter><digits>`) the counter for
    /// that letter is moved past it, so allocation stays sequential after a load.
    pub fn register_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        if let Some((prefix, number)) = parse_generated(&id) {
            self.advance_counter(prefix, number);
        }
        self.existing_ids.insert(id);
    }

    /// Moves the counter for `prefix` to at least `value`.
    pub fn advance_counter(&mut self, prefix: char, value: u64) {
        let counter = self.counters.entry(prefix).or_insert(0);
        *counter = (*counter).max(value);
    }

    /// Highest counter per prefix.
    #[must_use]
    pub fn counters(&self) -> BTreeMap<char, u64> {
        self.counters.iter().map(|(&prefix, &value)| (prefix, value)).collect()
    }

    /// Forgets `id`. Counters are not rewound, so a released id is not reused.
    pub fn release_id(&mut self, id: &str) {
        self.existing_ids.remove(id);
    }

    /// Allocates the next free id for `prefix`.
    pub fn next_id(&mut self, prefix: char) -> String {
        let counter = self.counters.entry(prefix).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{prefix}{counter}");
            if self.existing_ids.insert(candidate.clone()) {
                debug!(id = %candidate, "Allocated id");
                return candidate;
            }
        }
    }

    /// Number of ids currently registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.existing_ids.len()
    }

    /// Whether no ids are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.existing_ids.is_empty()
    }

    /// Clears all registrations and counters.
    pub fn clear_state(&mut self) {
        self.counters.clear();
        self.existing_ids.clear();
    }
}

fn parse_generated(id: &str) -> Option<(char, u64)> {
    let mut chars = id.chars();
    let prefix = chars.next().filter(char::is_ascii_uppercase)?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|n| (prefix, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_per_prefix() {
        let mut generator = IdGenerator::new();
        assert_eq!(generator.next_id('R'), "R1");
        assert_eq!(generator.next_id('R'), "R2");
        assert_eq!(generator.next_id('L'), "L1");
        assert_eq!(generator.len(), 3);
    }

    #[test]
    fn test_registered_ids_advance_counter() {
        let mut generator = IdGenerator::new();
        generator.register_id("R41");
        generator.register_id("R3");
        assert_eq!(generator.next_id('R'), "R42");
    }

    #[test]
    fn test_non_generated_ids_do_not_touch_counters() {
        let mut generator = IdGenerator::new();
        generator.register_id("hasAuthors");
        generator.register_id("Paper");
        generator.register_id("R12abc");
        assert_eq!(generator.next_id('R'), "R1");
        assert_eq!(generator.next_id('P'), "P1");
    }

    #[test]
    fn test_released_ids_are_not_reused() {
        let mut generator = IdGenerator::new();
        let first = generator.next_id('S');
        generator.release_id(&first);
        assert_eq!(generator.next_id('S'), "S2");
    }

    #[test]
    fn test_advanced_counter_skips_released_range() {
        let mut generator = IdGenerator::new();
        generator.register_id("R1");
        generator.advance_counter('R', 2);
        generator.advance_counter('R', 1);

        assert_eq!(generator.counters().get(&'R'), Some(&2));
        assert_eq!(generator.next_id('R'), "R3");
    }

    #[test]
    fn test_clear_state_restarts_counters() {
        let mut generator = IdGenerator::new();
        generator.next_id('R');
        generator.clear_state();
        assert!(generator.is_empty());
        assert_eq!(generator.next_id('R'), "R1");
    }
}
