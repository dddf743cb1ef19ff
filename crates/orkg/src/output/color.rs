//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:        green   (deleted resources, created things)
//!   - Warning:        yellow  (shared or skipped resources)
//!   - Error:          red     (failures)
//!   - Info/Reference: cyan    (thing and statement ids)
//!   - Accent:         magenta (classes, predicates)
//!   - Muted:          dimmed  (field labels, connectors)
//!   - Emphasis:       bold    (section headers)

use crate::domain::{ThingId, ThingKind};
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Colorize a thing or statement id (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.cyan().to_string()
}

/// Colorize class ids (magenta), joined with commas.
pub(crate) fn colorize_classes<'a, I>(classes: I, config: &OutputConfig) -> String
where
    I: IntoIterator<Item = &'a ThingId>,
{
    let text = classes
        .into_iter()
        .map(ThingId::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if !config.use_colors || text.is_empty() {
        return text;
    }
    text.magenta().to_string()
}

/// Colorize a predicate id (magenta).
pub(crate) fn colorize_predicate(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.magenta().to_string()
}

/// Short marker for a thing kind, with ASCII fallback support.
pub(crate) fn kind_icon(kind: ThingKind, config: &OutputConfig) -> String {
    let icon = if config.use_ascii {
        match kind {
            ThingKind::Resource => "R",
            ThingKind::Literal => "L",
            ThingKind::Predicate => "P",
            ThingKind::Class => "C",
        }
    } else {
        match kind {
            ThingKind::Resource => "●",
            ThingKind::Literal => "\u{201c}",
            ThingKind::Predicate => "→",
            ThingKind::Class => "◆",
        }
    };

    if !config.use_colors {
        return icon.to_string();
    }
    match kind {
        ThingKind::Resource => icon.cyan().to_string(),
        ThingKind::Literal => icon.white().to_string(),
        ThingKind::Predicate => icon.magenta().to_string(),
        ThingKind::Class => icon.blue().bold().to_string(),
    }
}

/// Arrow between subject, predicate and object.
pub(crate) fn arrow(config: &OutputConfig) -> String {
    let arrow = if config.use_ascii { "->" } else { "→" };
    dimmed(arrow, config)
}

/// Apply dimmed style to text (for labels/field names).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}
