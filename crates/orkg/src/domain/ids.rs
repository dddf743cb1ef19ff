//! Identifier newtypes.
//!
//! Ids order naturally: `R2` sorts before `R10`. This keeps listings and
//! cascade plans in creation order for generated ids.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Splits an id into its alphabetic prefix and trailing number, if any.
fn natural_key(id: &str) -> (&str, Option<u64>) {
    let digits_at = id
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map_or(id.len(), |(i, _)| i);
    let (prefix, digits) = id.split_at(digits_at);
    (prefix, digits.parse().ok())
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a)
        .cmp(&natural_key(b))
        .then_with(|| a.cmp(b))
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wraps a raw id string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                natural_cmp(&self.0, &other.0)
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }
    };
}

string_id!(
    /// Id of a thing: a resource, literal, predicate or class.
    ThingId
);

string_id!(
    /// Id of a statement.
    StatementId
);

string_id!(
    /// Id of the user or service that created or is changing content.
    ContributorId
);

impl ContributorId {
    /// The contributor recorded when nobody is known.
    pub const UNKNOWN: &'static str = "00000000-0000-0000-0000-000000000000";

    /// Returns the unknown contributor.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN)
    }

    /// Whether this is the unknown contributor.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }
}

impl Default for ContributorId {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Checks the shape of a thing id: non-empty, no whitespace, at most 256 bytes.
///
/// # Errors
///
/// Returns a human-readable reason when the id is not acceptable.
pub fn validate_thing_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("id cannot be empty".to_string());
    }
    if id.len() > 256 {
        return Err("id cannot be longer than 256 bytes".to_string());
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == ':')
    {
        return Err(format!(
            "id '{id}' may only contain ASCII letters, digits, '_', '-' and ':'"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order_compares_numeric_suffix() {
        let mut ids = vec![
            ThingId::new("R10"),
            ThingId::new("R2"),
            ThingId::new("P31"),
            ThingId::new("R1"),
        ];
        ids.sort();
        let ids: Vec<_> = ids.iter().map(ThingId::as_str).collect();
        assert_eq!(ids, vec!["P31", "R1", "R2", "R10"]);
    }

    #[test]
    fn ids_without_digits_order_by_prefix() {
        assert!(ThingId::new("hasAuthors") < ThingId::new("hasListElement"));
        assert_eq!(natural_key("hasAuthors"), ("hasAuthors", None));
        assert_eq!(natural_key("S12"), ("S", Some(12)));
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&StatementId::new("S5")).unwrap();
        assert_eq!(json, "\"S5\"");
    }

    #[test]
    fn validate_rejects_whitespace() {
        assert!(validate_thing_id("R1").is_ok());
        assert!(validate_thing_id("HAS_BENCHMARK").is_ok());
        assert!(validate_thing_id("").is_err());
        assert!(validate_thing_id("R 1").is_err());
    }
}
