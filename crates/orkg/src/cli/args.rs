//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::{Parser, Subcommand};

use super::types::{DatasetSortArg, RelatedKindArg, ThingKindArg};
use super::validators::{parse_author, parse_contribution, validate_id, validate_label};
use crate::domain::{DEFAULT_LITERAL_DATATYPE, StatementId, ThingId};
use crate::services::papers::ContributionInput;
use crate::services::AuthorInput;

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Rewrite the configuration of an existing project
    ///
    /// The graph snapshot is kept; missing vocabulary is added.
    #[arg(short, long)]
    pub force: bool,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {}

// ============================================================================
// Things
// ============================================================================

/// Arguments for the `resource` command
#[derive(Parser, Debug, Clone)]
pub struct ResourceArgs {
    /// Resource subcommand
    #[command(subcommand)]
    pub action: ResourceAction,
}

/// Resource actions
#[derive(Subcommand, Debug, Clone)]
pub enum ResourceAction {
    /// Create a resource
    Create {
        /// Resource label
        #[arg(short, long, value_parser = validate_label)]
        label: String,

        /// Classes (comma-separated, must exist)
        #[arg(short, long = "class", value_delimiter = ',', value_parser = validate_id)]
        classes: Vec<ThingId>,

        /// Fixed id instead of a generated one
        #[arg(long, value_parser = validate_id)]
        id: Option<ThingId>,
    },

    /// Show a thing with its outgoing statements
    Show {
        /// Thing id
        #[arg(value_parser = validate_id)]
        id: ThingId,
    },

    /// List things
    List {
        /// Only things of this kind
        #[arg(short, long, value_enum)]
        kind: Option<ThingKindArg>,

        /// Only resources with this class
        #[arg(short, long, value_parser = validate_id)]
        class: Option<ThingId>,

        /// Only labels containing this text
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of things to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },

    /// Delete a resource nothing refers to
    Delete {
        /// Resource id
        #[arg(value_parser = validate_id)]
        id: ThingId,
    },
}

/// Arguments for the `literal` command
#[derive(Parser, Debug, Clone)]
pub struct LiteralArgs {
    /// Literal subcommand
    #[command(subcommand)]
    pub action: LiteralAction,
}

/// Literal actions
#[derive(Subcommand, Debug, Clone)]
pub enum LiteralAction {
    /// Create a literal
    Create {
        /// Literal value (single line)
        value: String,

        /// Datatype of the value
        #[arg(short, long, default_value = DEFAULT_LITERAL_DATATYPE)]
        datatype: String,
    },
}

/// Arguments for the `predicate` command
#[derive(Parser, Debug, Clone)]
pub struct PredicateArgs {
    /// Predicate subcommand
    #[command(subcommand)]
    pub action: PredicateAction,
}

/// Predicate actions
#[derive(Subcommand, Debug, Clone)]
pub enum PredicateAction {
    /// Create a predicate
    Create {
        /// Predicate label
        #[arg(short, long, value_parser = validate_label)]
        label: String,

        /// Fixed id instead of a generated one
        #[arg(long, value_parser = validate_id)]
        id: Option<ThingId>,
    },
}

/// Arguments for the `class` command
#[derive(Parser, Debug, Clone)]
pub struct ClassArgs {
    /// Class subcommand
    #[command(subcommand)]
    pub action: ClassAction,
}

/// Class actions
#[derive(Subcommand, Debug, Clone)]
pub enum ClassAction {
    /// Create a class
    Create {
        /// Class label
        #[arg(short, long, value_parser = validate_label)]
        label: String,

        /// Fixed id instead of a generated one
        #[arg(long, value_parser = validate_id)]
        id: Option<ThingId>,

        /// External IRI of the class
        #[arg(long)]
        uri: Option<String>,
    },
}

// ============================================================================
// Statements
// ============================================================================

/// Arguments for the `statement` command
#[derive(Parser, Debug, Clone)]
pub struct StatementArgs {
    /// Statement subcommand
    #[command(subcommand)]
    pub action: StatementAction,
}

/// Statement actions
#[derive(Subcommand, Debug, Clone)]
pub enum StatementAction {
    /// Add a statement (returns the existing one for a duplicate triple)
    Add {
        /// Subject id
        #[arg(value_parser = validate_id)]
        subject: ThingId,

        /// Predicate id
        #[arg(value_parser = validate_id)]
        predicate: ThingId,

        /// Object id
        #[arg(value_parser = validate_id)]
        object: ThingId,
    },

    /// List statements matching the given positions
    List {
        /// Subject id
        #[arg(short, long, value_parser = validate_id)]
        subject: Option<ThingId>,

        /// Predicate id
        #[arg(short, long, value_parser = validate_id)]
        predicate: Option<ThingId>,

        /// Object id
        #[arg(short, long, value_parser = validate_id)]
        object: Option<ThingId>,
    },

    /// Change the predicate or object of a statement
    Update {
        /// Statement id
        id: StatementId,

        /// New predicate id
        #[arg(short, long, value_parser = validate_id)]
        predicate: Option<ThingId>,

        /// New object id
        #[arg(short, long, value_parser = validate_id)]
        object: Option<ThingId>,
    },

    /// Delete statements
    Delete {
        /// Statement ids
        #[arg(required = true)]
        ids: Vec<StatementId>,
    },
}

// ============================================================================
// Papers
// ============================================================================

/// Arguments for the `paper` command
#[derive(Parser, Debug, Clone)]
pub struct PaperArgs {
    /// Paper subcommand
    #[command(subcommand)]
    pub action: PaperAction,
}

/// Paper actions
#[derive(Subcommand, Debug, Clone)]
pub enum PaperAction {
    /// Create a paper with its authors and contributions
    Create(PaperCreateArgs),

    /// Show a paper
    Show {
        /// Paper id
        #[arg(value_parser = validate_id)]
        id: ThingId,
    },

    /// Delete a paper and everything only it owns
    Delete {
        /// Paper id
        #[arg(value_parser = validate_id)]
        id: ThingId,
    },
}

/// Arguments for `paper create`
#[derive(Parser, Debug, Clone)]
pub struct PaperCreateArgs {
    /// Paper title
    #[arg(short, long, value_parser = validate_label)]
    pub title: String,

    /// Research field ids (comma-separated)
    #[arg(
        short,
        long = "field",
        value_delimiter = ',',
        required = true,
        value_parser = validate_id
    )]
    pub fields: Vec<ThingId>,

    /// Authors in order: "Name", "Name <ORCID>" or "Name @R12"
    #[arg(short, long = "author", value_parser = parse_author)]
    pub authors: Vec<AuthorInput>,

    /// Contributions: "Label" or "Label=R1,R2" with research problem ids
    #[arg(short, long = "contribution", required = true, value_parser = parse_contribution)]
    pub contributions: Vec<ContributionInput>,

    /// DOI
    #[arg(long)]
    pub doi: Option<String>,

    /// Publication month (1-12)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
    pub month: Option<u8>,

    /// Publication year
    #[arg(long)]
    pub year: Option<i64>,
}

// ============================================================================
// Graph queries
// ============================================================================

/// Arguments for the `bundle` command
#[derive(Parser, Debug, Clone)]
pub struct BundleArgs {
    /// Root thing id
    #[arg(value_parser = validate_id)]
    pub id: ThingId,

    /// First level to include (the root's own statements are level 1)
    #[arg(long)]
    pub min_level: Option<usize>,

    /// Last level to traverse
    #[arg(long)]
    pub max_level: Option<usize>,

    /// Only objects with these classes (comma-separated)
    #[arg(long, value_delimiter = ',', value_parser = validate_id)]
    pub whitelist: Vec<ThingId>,

    /// Stop at objects with these classes (comma-separated)
    #[arg(long, value_delimiter = ',', value_parser = validate_id)]
    pub blacklist: Vec<ThingId>,
}

/// Arguments for the `plan-delete` command
#[derive(Parser, Debug, Clone)]
pub struct PlanDeleteArgs {
    /// Root thing id
    #[arg(value_parser = validate_id)]
    pub id: ThingId,
}

// ============================================================================
// Benchmarks
// ============================================================================

/// Arguments for the `benchmarks` command
#[derive(Parser, Debug, Clone)]
pub struct BenchmarksArgs {
    /// Only problems of this research field and its subfields
    #[arg(short, long, value_parser = validate_id)]
    pub field: Option<ThingId>,
}

/// Arguments for the `fields-with-benchmarks` command
#[derive(Parser, Debug, Clone)]
pub struct FieldsWithBenchmarksArgs {}

/// Arguments for the `datasets` command
#[derive(Parser, Debug, Clone)]
pub struct DatasetsArgs {
    /// Research problem id
    #[arg(short, long, value_parser = validate_id)]
    pub problem: ThingId,

    /// Row order
    #[arg(long, value_enum, default_value = "models")]
    pub sort: DatasetSortArg,
}

/// Arguments for the `dataset-problems` command
#[derive(Parser, Debug, Clone)]
pub struct DatasetProblemsArgs {
    /// Dataset id
    #[arg(value_parser = validate_id)]
    pub dataset: ThingId,
}

/// Arguments for the `dataset-summary` command
#[derive(Parser, Debug, Clone)]
pub struct DatasetSummaryArgs {
    /// Dataset id
    #[arg(value_parser = validate_id)]
    pub dataset: ThingId,

    /// Research problem id
    #[arg(value_parser = validate_id)]
    pub problem: ThingId,
}

// ============================================================================
// Content deleters
// ============================================================================

/// Arguments for the `section` command
#[derive(Parser, Debug, Clone)]
pub struct SectionArgs {
    /// Section subcommand
    #[command(subcommand)]
    pub action: SectionAction,
}

/// Literature-list section actions
#[derive(Subcommand, Debug, Clone)]
pub enum SectionAction {
    /// Remove a section from a literature list
    Delete {
        /// Literature list id
        #[arg(value_parser = validate_id)]
        list: ThingId,

        /// Section id
        #[arg(value_parser = validate_id)]
        section: ThingId,
    },
}

/// Arguments for the `smart-review` command
#[derive(Parser, Debug, Clone)]
pub struct SmartReviewArgs {
    /// Smart review subcommand
    #[command(subcommand)]
    pub action: SmartReviewAction,
}

/// Smart review actions
#[derive(Subcommand, Debug, Clone)]
pub enum SmartReviewAction {
    /// Remove a section from an unpublished smart review
    DeleteSection {
        /// Smart review id
        #[arg(value_parser = validate_id)]
        review: ThingId,

        /// Section id
        #[arg(value_parser = validate_id)]
        section: ThingId,
    },
}

/// Arguments for the `comparison` command
#[derive(Parser, Debug, Clone)]
pub struct ComparisonArgs {
    /// Comparison subcommand
    #[command(subcommand)]
    pub action: ComparisonAction,
}

/// Comparison actions
#[derive(Subcommand, Debug, Clone)]
pub enum ComparisonAction {
    /// Remove a related resource or figure from a comparison
    RemoveRelated {
        /// Comparison id
        #[arg(value_parser = validate_id)]
        comparison: ThingId,

        /// Related resource or figure id
        #[arg(value_parser = validate_id)]
        related: ThingId,

        /// Kind of the related item
        #[arg(short, long, value_enum, default_value = "resource")]
        kind: RelatedKindArg,
    },
}
