//! Output formatting for CLI commands.
//!
//! Every command result can be printed as human-readable text or as pretty
//! JSON for programmatic use. Text output honors [`OutputConfig`].
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, icons)

pub mod color;

use crate::aggregate::{BenchmarkSummary, DatasetRow, DatasetSummaryRow};
use crate::cascade::{DeletionPlan, DeletionReport};
use crate::domain::{Statement, Thing, ThingRef};
use crate::fetcher::GroupedStatements;
use crate::services::PaperView;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, success, warning};

use color::{
    arrow, bold, colorize_classes, colorize_id, colorize_predicate, dimmed, kind_icon,
};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 80;

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `ORKG_MAX_WIDTH`: Maximum content width (default: 80)
    /// - `ORKG_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `ORKG_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`OutputConfig::from_env`] with variables read through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_width = match lookup("ORKG_MAX_WIDTH") {
            Some(s) if !s.is_empty() => s.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    env_var = "ORKG_MAX_WIDTH",
                    value = %s,
                    default = DEFAULT_MAX_CONTENT_WIDTH,
                    "Invalid value, using default"
                );
                DEFAULT_MAX_CONTENT_WIDTH
            }),
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match lookup("ORKG_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "ORKG_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // https://no-color.org/
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("ORKG_COLOR")
                .is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size().map_or(DEFAULT_TERMINAL_WIDTH as usize, |(w, _)| w.0 as usize)
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

fn emit<T, F>(value: &T, mode: OutputMode, text: F) -> io::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&mut io::StdoutLock<'_>, &OutputConfig) -> io::Result<()>,
{
    match mode {
        OutputMode::Json => print_json(value),
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            text(&mut handle, &OutputConfig::from_env())
        }
    }
}

/// Print a thing with its outgoing statements
pub fn print_thing(thing: &Thing, outgoing: &[Statement], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(&serde_json::json!({
            "thing": thing,
            "statements": outgoing,
        })),
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            print_thing_text(&mut handle, thing, outgoing, &OutputConfig::from_env())
        }
    }
}

/// Print a list of things
pub fn print_things(things: &[Thing], mode: OutputMode) -> io::Result<()> {
    emit(things, mode, |w, config| print_things_text(w, things, config))
}

/// Print a list of statements
pub fn print_statements(statements: &[Statement], mode: OutputMode) -> io::Result<()> {
    emit(statements, mode, |w, config| {
        print_statements_text(w, statements, config)
    })
}

/// Print a paper
pub fn print_paper(paper: &PaperView, mode: OutputMode) -> io::Result<()> {
    emit(paper, mode, |w, config| print_paper_text(w, paper, config))
}

/// Print the statements of a subgraph, grouped by subject
pub fn print_bundle(bundle: &GroupedStatements, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => {
            let statements: Vec<&Statement> = bundle.statements().collect();
            print_json(&statements)
        }
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            print_bundle_text(&mut handle, bundle, &OutputConfig::from_env())
        }
    }
}

/// Print a deletion plan without applying it
pub fn print_plan(plan: &DeletionPlan, mode: OutputMode) -> io::Result<()> {
    emit(plan, mode, |w, config| print_plan_text(w, plan, config))
}

/// Print the outcome of a cascading delete
pub fn print_report(report: &DeletionReport, mode: OutputMode) -> io::Result<()> {
    emit(report, mode, |w, config| print_report_text(w, report, config))
}

/// Print benchmark summaries
pub fn print_benchmarks(summaries: &[BenchmarkSummary], mode: OutputMode) -> io::Result<()> {
    emit(summaries, mode, |w, config| {
        print_benchmarks_text(w, summaries, config)
    })
}

/// Print id and label pairs under a heading
pub fn print_refs(heading: &str, refs: &[ThingRef], mode: OutputMode) -> io::Result<()> {
    emit(refs, mode, |w, config| print_refs_text(w, heading, refs, config))
}

/// Print dataset rows of a research problem
pub fn print_datasets(rows: &[DatasetRow], mode: OutputMode) -> io::Result<()> {
    emit(rows, mode, |w, config| print_datasets_text(w, rows, config))
}

/// Print the results reported on a dataset
pub fn print_dataset_summary(rows: &[DatasetSummaryRow], mode: OutputMode) -> io::Result<()> {
    emit(rows, mode, |w, config| {
        print_dataset_summary_text(w, rows, config)
    })
}

/// Print a simple message
pub fn print_message(msg: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{msg}")
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

fn statement_line(statement: &Statement, config: &OutputConfig) -> String {
    let mut line = format!(
        "{}  {} {} {} {} {}",
        dimmed(statement.id.as_str(), config),
        colorize_id(statement.subject.as_str(), config),
        arrow(config),
        colorize_predicate(statement.predicate.as_str(), config),
        arrow(config),
        colorize_id(statement.object.as_str(), config),
    );
    if let Some(index) = statement.index {
        line.push_str(&format!(" [{index}]"));
    }
    if !statement.modifiable {
        line.push_str(&format!(" {}", dimmed("(locked)", config)));
    }
    line
}

fn print_thing_text<W: Write>(
    w: &mut W,
    thing: &Thing,
    outgoing: &[Statement],
    config: &OutputConfig,
) -> io::Result<()> {
    let content_width = get_terminal_width().min(config.max_width);

    writeln!(
        w,
        "{} {}: {}",
        kind_icon(thing.kind(), config),
        colorize_id(thing.id().as_str(), config),
        bold(thing.kind().to_string().as_str(), config)
    )?;
    for line in wrap_text(thing.label(), content_width.saturating_sub(2)) {
        writeln!(w, "  {line}")?;
    }

    if let Some(classes) = thing.classes()
        && !classes.is_empty()
    {
        writeln!(
            w,
            "{} {}",
            dimmed("Classes:", config),
            colorize_classes(classes, config)
        )?;
    }
    if let Thing::Literal(literal) = thing {
        writeln!(w, "{} {}", dimmed("Datatype:", config), literal.datatype)?;
    }
    writeln!(
        w,
        "{} {}",
        dimmed("Created by:", config),
        thing.created_by()
    )?;
    if !thing.is_modifiable() {
        writeln!(w, "{}", dimmed("Not modifiable", config))?;
    }

    if !outgoing.is_empty() {
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold("Statements", config), outgoing.len())?;
        for statement in outgoing {
            writeln!(w, "  {}", statement_line(statement, config))?;
        }
    }

    Ok(())
}

fn print_things_text<W: Write>(
    w: &mut W,
    things: &[Thing],
    config: &OutputConfig,
) -> io::Result<()> {
    if things.is_empty() {
        writeln!(w, "No things found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} thing(s):", things.len())?;
    writeln!(w)?;
    for thing in things {
        writeln!(
            w,
            "{} {}  {}",
            kind_icon(thing.kind(), config),
            colorize_id(thing.id().as_str(), config),
            thing.label()
        )?;
    }
    Ok(())
}

fn print_statements_text<W: Write>(
    w: &mut W,
    statements: &[Statement],
    config: &OutputConfig,
) -> io::Result<()> {
    if statements.is_empty() {
        writeln!(w, "No statements found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} statement(s):", statements.len())?;
    writeln!(w)?;
    for statement in statements {
        writeln!(w, "{}", statement_line(statement, config))?;
    }
    Ok(())
}

fn print_paper_text<W: Write>(
    w: &mut W,
    paper: &PaperView,
    config: &OutputConfig,
) -> io::Result<()> {
    let content_width = get_terminal_width().min(config.max_width);

    writeln!(w, "{}: {}", colorize_id(paper.id.as_str(), config), paper.title)?;

    let fields: Vec<String> = paper
        .research_fields
        .iter()
        .map(|f| format!("{} ({})", f.label, colorize_id(f.id.as_str(), config)))
        .collect();
    writeln!(w, "{} {}", dimmed("Research fields:", config), fields.join(", "))?;

    if let Some(doi) = &paper.doi {
        writeln!(w, "{} {}", dimmed("DOI:", config), doi)?;
    }
    let published = match (paper.publication_info.month, paper.publication_info.year) {
        (Some(month), Some(year)) => Some(format!("{year}-{month:02}")),
        (None, Some(year)) => Some(year.to_string()),
        (Some(month), None) => Some(format!("month {month}")),
        (None, None) => None,
    };
    if let Some(published) = published {
        writeln!(w, "{} {}", dimmed("Published:", config), published)?;
    }
    writeln!(w, "{} {}", dimmed("Statements:", config), paper.statement_count)?;
    writeln!(
        w,
        "{} {}    {} {}",
        dimmed("Created:", config),
        paper.created_at.format("%Y-%m-%d %H:%M"),
        dimmed("By:", config),
        paper.created_by
    )?;

    if !paper.authors.is_empty() {
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold("Authors", config), paper.authors.len())?;
        for author in &paper.authors {
            let orcid = author
                .orcid
                .as_ref()
                .map(|o| format!(" <{o}>"))
                .unwrap_or_default();
            writeln!(
                w,
                "  {} {}{}",
                colorize_id(author.id.as_str(), config),
                author.name,
                orcid
            )?;
        }
    }

    writeln!(w)?;
    writeln!(
        w,
        "{} ({}):",
        bold("Contributions", config),
        paper.contributions.len()
    )?;
    for contribution in &paper.contributions {
        let label = wrap_text(&contribution.label, content_width.saturating_sub(12)).join(" ");
        writeln!(
            w,
            "  {} {}",
            colorize_id(contribution.id.as_str(), config),
            label
        )?;
    }

    Ok(())
}

fn print_bundle_text<W: Write>(
    w: &mut W,
    bundle: &GroupedStatements,
    config: &OutputConfig,
) -> io::Result<()> {
    if bundle.is_empty() {
        writeln!(w, "No statements in bundle.")?;
        return Ok(());
    }

    writeln!(
        w,
        "Bundle of {} statement(s) from {} subject(s):",
        bundle.len(),
        bundle.subjects().count()
    )?;
    for subject in bundle.subjects() {
        writeln!(w)?;
        writeln!(w, "{}", colorize_id(subject.as_str(), config))?;
        for statement in bundle.outgoing(subject) {
            writeln!(
                w,
                "  {} {} {} {}",
                arrow(config),
                colorize_predicate(statement.predicate.as_str(), config),
                arrow(config),
                colorize_id(statement.object.as_str(), config)
            )?;
        }
    }
    Ok(())
}

fn print_ids<W: Write>(
    w: &mut W,
    heading: &str,
    ids: &[impl AsRef<str>],
    paint: fn(&str, &OutputConfig) -> String,
    config: &OutputConfig,
) -> io::Result<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let joined: Vec<String> = ids.iter().map(|id| paint(id.as_ref(), config)).collect();
    writeln!(w, "{} ({}): {}", dimmed(heading, config), ids.len(), joined.join(", "))
}

fn print_plan_text<W: Write>(
    w: &mut W,
    plan: &DeletionPlan,
    config: &OutputConfig,
) -> io::Result<()> {
    if plan.is_empty() {
        writeln!(
            w,
            "Nothing to delete below {}.",
            colorize_id(plan.root.as_str(), config)
        )?;
        return Ok(());
    }

    writeln!(
        w,
        "Deleting {} would remove:",
        colorize_id(plan.root.as_str(), config)
    )?;
    print_ids(w, "Statements", &plan.statements, colorize_id, config)?;
    print_ids(w, "Resources", &plan.resources, success, config)?;
    print_ids(w, "Kept (shared)", &plan.shared, warning, config)?;
    Ok(())
}

fn print_report_text<W: Write>(
    w: &mut W,
    report: &DeletionReport,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "Deleted {} statement(s)", report.statements_deleted)?;
    print_ids(w, "Deleted resources", &report.resources_deleted, success, config)?;
    print_ids(w, "Skipped resources", &report.resources_skipped, warning, config)?;
    Ok(())
}

fn print_benchmarks_text<W: Write>(
    w: &mut W,
    summaries: &[BenchmarkSummary],
    config: &OutputConfig,
) -> io::Result<()> {
    if summaries.is_empty() {
        writeln!(w, "No benchmarks found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} benchmarked problem(s):", summaries.len())?;
    for summary in summaries {
        writeln!(w)?;
        writeln!(
            w,
            "{} {}",
            colorize_id(summary.research_problem.id.as_str(), config),
            bold(&summary.research_problem.label, config)
        )?;
        let fields: Vec<&str> = summary
            .research_fields
            .iter()
            .map(|f| f.label.as_str())
            .collect();
        writeln!(w, "  {} {}", dimmed("Fields:", config), fields.join(", "))?;
        writeln!(
            w,
            "  {} {}  {} {}  {} {}",
            dimmed("Papers:", config),
            summary.total_papers,
            dimmed("Datasets:", config),
            summary.total_datasets,
            dimmed("Codes:", config),
            summary.total_codes
        )?;
    }
    Ok(())
}

fn print_refs_text<W: Write>(
    w: &mut W,
    heading: &str,
    refs: &[ThingRef],
    config: &OutputConfig,
) -> io::Result<()> {
    if refs.is_empty() {
        writeln!(w, "No {} found.", heading.to_lowercase())?;
        return Ok(());
    }

    writeln!(w, "{} ({}):", bold(heading, config), refs.len())?;
    for r in refs {
        writeln!(w, "  {} {}", colorize_id(r.id.as_str(), config), r.label)?;
    }
    Ok(())
}

fn print_datasets_text<W: Write>(
    w: &mut W,
    rows: &[DatasetRow],
    config: &OutputConfig,
) -> io::Result<()> {
    if rows.is_empty() {
        writeln!(w, "No datasets found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} dataset(s):", rows.len())?;
    writeln!(w)?;
    for row in rows {
        writeln!(
            w,
            "{} {}  {} {}  {} {}  {} {}",
            colorize_id(row.id.as_str(), config),
            row.label,
            dimmed("papers:", config),
            row.total_papers,
            dimmed("models:", config),
            row.total_models,
            dimmed("codes:", config),
            row.total_codes
        )?;
    }
    Ok(())
}

fn print_dataset_summary_text<W: Write>(
    w: &mut W,
    rows: &[DatasetSummaryRow],
    config: &OutputConfig,
) -> io::Result<()> {
    if rows.is_empty() {
        writeln!(w, "No results found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} result(s):", rows.len())?;
    for row in rows {
        writeln!(w)?;
        writeln!(
            w,
            "{} = {}  {}",
            bold(&row.metric, config),
            row.score,
            row.model_name.as_deref().unwrap_or("(no model)")
        )?;
        let date = match (&row.paper_year, &row.paper_month) {
            (Some(year), Some(month)) => format!(" ({year}-{month})"),
            (Some(year), None) => format!(" ({year})"),
            _ => String::new(),
        };
        writeln!(
            w,
            "  {} {} {}{}",
            dimmed("Paper:", config),
            colorize_id(row.paper_id.as_str(), config),
            row.paper_title,
            date
        )?;
        for url in &row.code_urls {
            writeln!(w, "  {} {}", dimmed("Code:", config), url)?;
        }
    }
    Ok(())
}

/// Wrap text to fit within a given width, preserving existing line breaks.
/// Uses textwrap to handle edge cases like long words (URLs, file paths).
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width.max(1))
                    .into_iter()
                    .map(std::borrow::Cow::into_owned)
                    .collect()
            }
        })
        .collect()
}
