//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands. Each
//! function runs one command against an [`App`] and prints its result;
//! mutating commands save the graph before printing.

use anyhow::{Result, bail};

use super::args::{
    BenchmarksArgs, BundleArgs, ClassAction, ClassArgs, ComparisonAction, ComparisonArgs,
    DatasetProblemsArgs, DatasetSummaryArgs, DatasetsArgs, InfoArgs, InitArgs, LiteralAction,
    LiteralArgs, PaperAction, PaperArgs, PaperCreateArgs, PlanDeleteArgs, PredicateAction,
    PredicateArgs, ResourceAction, ResourceArgs, SectionAction, SectionArgs, SmartReviewAction,
    SmartReviewArgs, StatementAction, StatementArgs,
};
use crate::app::App;
use crate::domain::{
    BundleConfiguration, ContributorId, NewResource, NewStatement, NewThing, StatementFilter,
    StatementUpdate, ThingFilter, ThingKind,
};
use crate::output::{self, OutputMode};
use crate::services::{
    BenchmarkService, CreatePaperCommand, PaperService, PublicationInfo, ResourceService,
    StatementService, delete_related_resource, delete_section, smart_reviews,
};
use crate::storage::require_thing;

/// Execute the init command
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;

    if !args.quiet {
        println!("Initializing orkg project...");
    }

    let result = init::init(&current_dir, args.force).await?;

    if !args.quiet {
        println!("Initialized orkg in {}", result.orkg_dir.display());
        println!("  Config: {}", result.config_file.display());
        println!("  Graph:  {}", result.data_file.display());
        println!("  Vocabulary things added: {}", result.seeded);
    }

    Ok(())
}

/// Execute the info command
pub async fn execute_info(app: &App, _args: &InfoArgs, output_mode: OutputMode) -> Result<()> {
    let snapshot = app.storage().export_snapshot().await?;
    let count = |kind: ThingKind| snapshot.things.iter().filter(|t| t.kind() == kind).count();
    let (resources, literals, predicates, classes) = (
        count(ThingKind::Resource),
        count(ThingKind::Literal),
        count(ThingKind::Predicate),
        count(ThingKind::Class),
    );
    let data_path = app
        .data_path()
        .map_or_else(|| "(in memory)".to_string(), |p| p.display().to_string());

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "data_path": data_path,
                "things": {
                    "resources": resources,
                    "literals": literals,
                    "predicates": predicates,
                    "classes": classes,
                },
                "statements": snapshot.statements.len(),
                "curators": app.config().curators,
                "owning_predicates": app.config().cascade.owning_predicates,
            }))?;
        }
        OutputMode::Text => {
            println!("ORKG Graph Information");
            println!("======================");
            println!();
            println!("Data file:   {data_path}");
            println!(
                "Things:      {} total ({resources} resources, {literals} literals, \
                 {predicates} predicates, {classes} classes)",
                snapshot.things.len()
            );
            println!("Statements:  {}", snapshot.statements.len());
            println!("Curators:    {}", app.config().curators.len());
        }
    }

    Ok(())
}

// ============================================================================
// Things
// ============================================================================

/// Execute the resource command
pub async fn execute_resource(
    app: &mut App,
    args: &ResourceArgs,
    contributor: &ContributorId,
    output_mode: OutputMode,
) -> Result<()> {
    match &args.action {
        ResourceAction::Create { label, classes, id } => {
            let mut new = NewResource::new(label.as_str(), classes.iter().cloned())
                .created_by(contributor.clone());
            new.id = id.clone();

            let (storage, _, curators) = app.parts_mut();
            let resource = ResourceService::new(storage, curators)
                .create_resource(new)
                .await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => output::print_json(&resource)?,
                OutputMode::Text => println!("Created resource: {}", resource.id),
            }
        }
        ResourceAction::Show { id } => {
            let thing = require_thing(app.storage(), id).await?;
            let outgoing = app
                .storage()
                .find_statements(&StatementFilter::subject(id.clone()))
                .await?;
            output::print_thing(&thing, &outgoing, output_mode)?;
        }
        ResourceAction::List {
            kind,
            class,
            search,
            limit,
        } => {
            let filter = ThingFilter {
                kind: kind.map(Into::into),
                class: class.clone(),
                label_contains: search.clone(),
                limit: Some(*limit),
            };
            let things = app.storage().list_things(&filter).await?;
            output::print_things(&things, output_mode)?;
        }
        ResourceAction::Delete { id } => {
            let (storage, _, curators) = app.parts_mut();
            ResourceService::new(storage, curators)
                .delete_resource(id, contributor)
                .await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => output::print_json(&serde_json::json!({ "deleted": id }))?,
                OutputMode::Text => println!("Deleted resource: {id}"),
            }
        }
    }

    Ok(())
}

/// Execute the literal command
pub async fn execute_literal(
    app: &mut App,
    args: &LiteralArgs,
    contributor: &ContributorId,
    output_mode: OutputMode,
) -> Result<()> {
    let LiteralAction::Create { value, datatype } = &args.action;
    let new = NewThing {
        extra: Some(datatype.clone()),
        ..NewThing::new(value.as_str()).created_by(contributor.clone())
    };

    let (storage, _, curators) = app.parts_mut();
    let literal = ResourceService::new(storage, curators)
        .create_literal(new)
        .await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_json(&literal)?,
        OutputMode::Text => println!("Created literal: {}", literal.id),
    }
    Ok(())
}

/// Execute the predicate command
pub async fn execute_predicate(
    app: &mut App,
    args: &PredicateArgs,
    contributor: &ContributorId,
    output_mode: OutputMode,
) -> Result<()> {
    let PredicateAction::Create { label, id } = &args.action;
    let new = NewThing {
        id: id.clone(),
        ..NewThing::new(label.as_str()).created_by(contributor.clone())
    };

    let (storage, _, curators) = app.parts_mut();
    let predicate = ResourceService::new(storage, curators)
        .create_predicate(new)
        .await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_json(&predicate)?,
        OutputMode::Text => println!("Created predicate: {}", predicate.id),
    }
    Ok(())
}

/// Execute the class command
pub async fn execute_class(
    app: &mut App,
    args: &ClassArgs,
    contributor: &ContributorId,
    output_mode: OutputMode,
) -> Result<()> {
    let ClassAction::Create { label, id, uri } = &args.action;
    let new = NewThing {
        id: id.clone(),
        extra: uri.clone(),
        ..NewThing::new(label.as_str()).created_by(contributor.clone())
    };

    let (storage, _, curators) = app.parts_mut();
    let class = ResourceService::new(storage, curators)
        .create_class(new)
        .await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_json(&class)?,
        OutputMode::Text => println!("Created class: {}", class.id),
    }
    Ok(())
}

// ============================================================================
// Statements
// ============================================================================

/// Execute the statement command
pub async fn execute_statement(
    app: &mut App,
    args: &StatementArgs,
    contributor: &ContributorId,
    output_mode: OutputMode,
) -> Result<()> {
    match &args.action {
        StatementAction::Add {
            subject,
            predicate,
            object,
        } => {
            let new = NewStatement::new(subject.clone(), predicate.clone(), object.clone())
                .created_by(contributor.clone());
            let statement = StatementService::new(app.storage_mut()).create(new).await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => output::print_json(&statement)?,
                OutputMode::Text => println!("Statement: {}", statement.id),
            }
        }
        StatementAction::List {
            subject,
            predicate,
            object,
        } => {
            let filter = StatementFilter {
                subject: subject.clone(),
                predicate: predicate.clone(),
                object: object.clone(),
            };
            let statements = StatementService::new(app.storage_mut()).find(&filter).await?;
            output::print_statements(&statements, output_mode)?;
        }
        StatementAction::Update {
            id,
            predicate,
            object,
        } => {
            if predicate.is_none() && object.is_none() {
                bail!("Nothing to update. Give --predicate and/or --object");
            }
            let update = StatementUpdate {
                predicate: predicate.clone(),
                object: object.clone(),
            };
            let statement = StatementService::new(app.storage_mut())
                .update(id, update)
                .await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => output::print_json(&statement)?,
                OutputMode::Text => println!("Updated statement: {}", statement.id),
            }
        }
        StatementAction::Delete { ids } => {
            let deleted = StatementService::new(app.storage_mut()).delete(ids).await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => {
                    output::print_json(&serde_json::json!({ "deleted": deleted }))?;
                }
                OutputMode::Text => println!("Deleted {deleted} statement(s)"),
            }
        }
    }

    Ok(())
}

// ============================================================================
// Papers
// ============================================================================

fn create_paper_command(args: &PaperCreateArgs, contributor: &ContributorId) -> CreatePaperCommand {
    CreatePaperCommand {
        contributor: contributor.clone(),
        title: args.title.clone(),
        research_fields: args.fields.clone(),
        authors: args.authors.clone(),
        doi: args.doi.clone(),
        publication_info: PublicationInfo {
            month: args.month,
            year: args.year,
        },
        contributions: args.contributions.clone(),
    }
}

/// Execute the paper command
pub async fn execute_paper(
    app: &mut App,
    args: &PaperArgs,
    contributor: &ContributorId,
    output_mode: OutputMode,
) -> Result<()> {
    match &args.action {
        PaperAction::Create(create) => {
            let command = create_paper_command(create, contributor);
            let (storage, planner, curators) = app.parts_mut();
            let mut service = PaperService::new(storage, curators, planner);
            let id = service.create(&command).await?;
            let paper = service.find(&id).await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => output::print_json(&paper)?,
                OutputMode::Text => println!("Created paper: {id}"),
            }
        }
        PaperAction::Show { id } => {
            let (storage, planner, curators) = app.parts_mut();
            let paper = PaperService::new(storage, curators, planner).find(id).await?;
            output::print_paper(&paper, output_mode)?;
        }
        PaperAction::Delete { id } => {
            let (storage, planner, curators) = app.parts_mut();
            let report = PaperService::new(storage, curators, planner)
                .delete(id, contributor)
                .await?;
            app.save().await?;
            output::print_report(&report, output_mode)?;
        }
    }

    Ok(())
}

// ============================================================================
// Graph queries
// ============================================================================

/// Execute the bundle command
pub async fn execute_bundle(app: &App, args: &BundleArgs, output_mode: OutputMode) -> Result<()> {
    use crate::fetcher::fetch_closure;

    if let (Some(min), Some(max)) = (args.min_level, args.max_level)
        && min > max
    {
        bail!("--min-level ({min}) cannot be greater than --max-level ({max})");
    }

    require_thing(app.storage(), &args.id).await?;
    let config = BundleConfiguration {
        min_level: args.min_level,
        max_level: args.max_level,
        whitelist: args.whitelist.clone(),
        blacklist: args.blacklist.clone(),
    };
    let bundle = fetch_closure(app.storage(), &args.id, &config).await?;
    output::print_bundle(&bundle, output_mode)?;
    Ok(())
}

/// Execute the plan-delete command
pub async fn execute_plan_delete(
    app: &App,
    args: &PlanDeleteArgs,
    output_mode: OutputMode,
) -> Result<()> {
    require_thing(app.storage(), &args.id).await?;
    let plan = app
        .planner()
        .plan_from_storage(app.storage(), &args.id)
        .await?;
    output::print_plan(&plan, output_mode)?;
    Ok(())
}

// ============================================================================
// Benchmarks
// ============================================================================

/// Execute the benchmarks command
pub async fn execute_benchmarks(
    app: &App,
    args: &BenchmarksArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let service = BenchmarkService::load(app.storage(), &app.config().vocabulary).await?;
    let summaries = service.summaries(args.field.as_ref())?;
    output::print_benchmarks(&summaries, output_mode)?;
    Ok(())
}

/// Execute the fields-with-benchmarks command
pub async fn execute_fields_with_benchmarks(app: &App, output_mode: OutputMode) -> Result<()> {
    let service = BenchmarkService::load(app.storage(), &app.config().vocabulary).await?;
    let fields = service.fields_with_benchmarks();
    output::print_refs("Research fields", &fields, output_mode)?;
    Ok(())
}

/// Execute the datasets command
pub async fn execute_datasets(
    app: &App,
    args: &DatasetsArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let service = BenchmarkService::load(app.storage(), &app.config().vocabulary).await?;
    let rows = service.datasets(&args.problem, args.sort.into())?;
    output::print_datasets(&rows, output_mode)?;
    Ok(())
}

/// Execute the dataset-problems command
pub async fn execute_dataset_problems(
    app: &App,
    args: &DatasetProblemsArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let service = BenchmarkService::load(app.storage(), &app.config().vocabulary).await?;
    let problems = service.problems(&args.dataset)?;
    output::print_refs("Research problems", &problems, output_mode)?;
    Ok(())
}

/// Execute the dataset-summary command
pub async fn execute_dataset_summary(
    app: &App,
    args: &DatasetSummaryArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let service = BenchmarkService::load(app.storage(), &app.config().vocabulary).await?;
    let rows = service.dataset_summary(&args.dataset, &args.problem)?;
    output::print_dataset_summary(&rows, output_mode)?;
    Ok(())
}

// ============================================================================
// Content deleters
// ============================================================================

/// Execute the section command
pub async fn execute_section(
    app: &mut App,
    args: &SectionArgs,
    contributor: &ContributorId,
    output_mode: OutputMode,
) -> Result<()> {
    let SectionAction::Delete { list, section } = &args.action;
    let (storage, planner, curators) = app.parts_mut();
    let report = delete_section(storage, planner, curators, list, section, contributor).await?;
    app.save().await?;
    output::print_report(&report, output_mode)?;
    Ok(())
}

/// Execute the smart-review command
pub async fn execute_smart_review(
    app: &mut App,
    args: &SmartReviewArgs,
    contributor: &ContributorId,
    output_mode: OutputMode,
) -> Result<()> {
    let SmartReviewAction::DeleteSection { review, section } = &args.action;
    let (storage, planner, curators) = app.parts_mut();
    let report =
        smart_reviews::delete_section(storage, planner, curators, review, section, contributor)
            .await?;
    app.save().await?;
    output::print_report(&report, output_mode)?;
    Ok(())
}

/// Execute the comparison command
pub async fn execute_comparison(
    app: &mut App,
    args: &ComparisonArgs,
    contributor: &ContributorId,
    output_mode: OutputMode,
) -> Result<()> {
    let ComparisonAction::RemoveRelated {
        comparison,
        related,
        kind,
    } = &args.action;
    let (storage, planner, curators) = app.parts_mut();
    let report = delete_related_resource(
        storage,
        planner,
        curators,
        comparison,
        related,
        (*kind).into(),
        contributor,
    )
    .await?;
    app.save().await?;
    output::print_report(&report, output_mode)?;
    Ok(())
}
