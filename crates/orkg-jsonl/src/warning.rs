//! Non-fatal problems found while reading JSONL data.

use std::fmt;

/// A line that was skipped during a resilient read.
///
/// Every variant carries the 1-based line number so callers can point users at
/// the exact place in the file that needs fixing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The line is not valid JSON, or does not match the record type.
    MalformedJson {
        /// The 1-based line number where the error occurred.
        line_number: usize,
        /// The parser's error message.
        error: String,
    },

    /// The line was skipped for a reason other than a parse failure.
    SkippedLine {
        /// The 1-based line number that was skipped.
        line_number: usize,
        /// Why the line was skipped.
        reason: String,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. } | Self::SkippedLine { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Returns a stable identifier for the warning kind, e.g. for grouping in reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::SkippedLine { .. } => "skipped_line",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: malformed JSON: {error}")
            }
            Self::SkippedLine {
                line_number,
                reason,
            } => write!(f, "line {line_number}: skipped: {reason}"),
        }
    }
}

impl std::error::Error for Warning {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_line_and_cause() {
        let warning = Warning::MalformedJson {
            line_number: 7,
            error: "expected value".to_string(),
        };

        let text = warning.to_string();
        assert!(text.contains("line 7"));
        assert!(text.contains("expected value"));
    }

    #[test]
    fn kind_and_line_number_per_variant() {
        let skipped = Warning::SkippedLine {
            line_number: 3,
            reason: "oversized".to_string(),
        };
        let malformed = Warning::MalformedJson {
            line_number: 9,
            error: "eof".to_string(),
        };

        assert_eq!(skipped.kind(), "skipped_line");
        assert_eq!(skipped.line_number(), 3);
        assert_eq!(malformed.kind(), "malformed_json");
        assert_eq!(malformed.line_number(), 9);
    }
}
