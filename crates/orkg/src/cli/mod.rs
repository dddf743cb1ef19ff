//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for orkg using clap's derive API.
//! Each command has its own argument struct with validation and helpful error messages.
//!
//! # Commands
//!
//! - `init`: Initialize a new orkg project
//! - `resource`, `literal`, `predicate`, `class`: Create and inspect things
//! - `statement`: Add, list, update and delete statements
//! - `paper`: Create, show and delete papers
//! - `bundle`: Fetch the subgraph reachable from a thing
//! - `plan-delete`: Show what a cascading delete would remove
//! - `benchmarks`, `datasets`, ...: Benchmark statistics
//! - `section`, `smart-review`, `comparison`: Remove parts of literature lists,
//!   smart reviews and comparisons
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--as <CONTRIBUTOR>`: Contributor recorded on created content and
//!   checked on deletes
//!
//! # Example
//!
//! ```bash
//! orkg init
//! orkg paper create --title "Deep Learning" --field R11 --author "Jane Doe" \
//!     --contribution "Main result=R20"
//! orkg bundle R30 --max-level 2
//! orkg paper delete R30
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::domain::ContributorId;

// Re-export argument structs
pub use args::{
    BenchmarksArgs, BundleArgs, ClassAction, ClassArgs, ComparisonAction, ComparisonArgs,
    DatasetProblemsArgs, DatasetSummaryArgs, DatasetsArgs, FieldsWithBenchmarksArgs, InfoArgs,
    InitArgs, LiteralAction, LiteralArgs, PaperAction, PaperArgs, PaperCreateArgs,
    PlanDeleteArgs, PredicateAction, PredicateArgs, ResourceAction, ResourceArgs, SectionAction,
    SectionArgs, SmartReviewAction, SmartReviewArgs, StatementAction, StatementArgs,
};

// Re-export types
pub use types::{DatasetSortArg, RelatedKindArg, ThingKindArg};

// Re-export validators for external use
pub use validators::{parse_author, parse_contribution, validate_id, validate_label};

/// ORKG statement graph
///
/// Create papers and other research content as statements over resources,
/// delete them with their owned subgraphs, and compute benchmark statistics.
/// The graph is stored in `.orkg/graph.jsonl`.
#[derive(Parser, Debug)]
#[command(name = "orkg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Contributor id to act as (defaults to the unknown contributor)
    #[arg(long = "as", global = true, value_name = "CONTRIBUTOR")]
    pub as_contributor: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new orkg project
    ///
    /// Creates the `.orkg/` directory with configuration and a graph seeded
    /// with the benchmark vocabulary.
    Init(InitArgs),

    /// Show project information
    ///
    /// Displays the graph file and counts of things and statements.
    Info(InfoArgs),

    /// Create, show, list and delete resources
    Resource(ResourceArgs),

    /// Create literals
    Literal(LiteralArgs),

    /// Create predicates
    Predicate(PredicateArgs),

    /// Create classes
    Class(ClassArgs),

    /// Add, list, update and delete statements
    Statement(StatementArgs),

    /// Create, show and delete papers
    ///
    /// Deleting a paper also removes its contributions and author list
    /// unless other content shares them.
    Paper(PaperArgs),

    /// Fetch the statements reachable from a thing
    ///
    /// Walks outgoing statements breadth-first, optionally bounded by level
    /// and filtered by object classes.
    Bundle(BundleArgs),

    /// Show what deleting a thing would remove
    ///
    /// Nothing is changed.
    PlanDelete(PlanDeleteArgs),

    /// List research problems with benchmarks
    Benchmarks(BenchmarksArgs),

    /// List research fields that have benchmarks
    FieldsWithBenchmarks(FieldsWithBenchmarksArgs),

    /// List datasets evaluated for a research problem
    Datasets(DatasetsArgs),

    /// List research problems a dataset is evaluated for
    DatasetProblems(DatasetProblemsArgs),

    /// Show evaluation results on a dataset for a research problem
    DatasetSummary(DatasetSummaryArgs),

    /// Manage literature-list sections
    Section(SectionArgs),

    /// Manage smart-review sections
    SmartReview(SmartReviewArgs),

    /// Manage comparisons
    Comparison(ComparisonArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// The contributor given with `--as`, or the unknown contributor.
    #[must_use]
    pub fn contributor(&self) -> ContributorId {
        self.as_contributor
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map_or_else(ContributorId::unknown, ContributorId::new)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        let contributor = self.contributor();

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(args).await,
            Some(Commands::Info(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_info(&app, args, output_mode).await
            }
            Some(Commands::Resource(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_resource(&mut app, args, &contributor, output_mode).await
            }
            Some(Commands::Literal(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_literal(&mut app, args, &contributor, output_mode).await
            }
            Some(Commands::Predicate(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_predicate(&mut app, args, &contributor, output_mode).await
            }
            Some(Commands::Class(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_class(&mut app, args, &contributor, output_mode).await
            }
            Some(Commands::Statement(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_statement(&mut app, args, &contributor, output_mode).await
            }
            Some(Commands::Paper(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_paper(&mut app, args, &contributor, output_mode).await
            }
            Some(Commands::Bundle(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_bundle(&app, args, output_mode).await
            }
            Some(Commands::PlanDelete(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_plan_delete(&app, args, output_mode).await
            }
            Some(Commands::Benchmarks(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_benchmarks(&app, args, output_mode).await
            }
            Some(Commands::FieldsWithBenchmarks(_)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_fields_with_benchmarks(&app, output_mode).await
            }
            Some(Commands::Datasets(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_datasets(&app, args, output_mode).await
            }
            Some(Commands::DatasetProblems(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_dataset_problems(&app, args, output_mode).await
            }
            Some(Commands::DatasetSummary(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_dataset_summary(&app, args, output_mode).await
            }
            Some(Commands::Section(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_section(&mut app, args, &contributor, output_mode).await
            }
            Some(Commands::SmartReview(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_smart_review(&mut app, args, &contributor, output_mode).await
            }
            Some(Commands::Comparison(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_comparison(&mut app, args, &contributor, output_mode).await
            }
            None => {
                println!("ORKG statement graph");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}
