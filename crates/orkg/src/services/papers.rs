//! Paper creation, lookup and cascading deletion.
//!
//! Creating a paper runs a fixed sequence of steps over a shared context:
//! validators first, so nothing is written for an invalid command, then
//! creators that add the paper resource and its statements.

use super::Curators;
use super::authors::{
    AuthorInput, AuthorView, ValidatedAuthor, create_author_list, read_author_list,
    validate_authors,
};
use crate::cascade::{CascadePlanner, DeletionReport, apply_plan};
use crate::domain::{
    ContributorId, NewResource, NewStatement, NewThing, StatementFilter, Thing, ThingId, ThingRef,
    classes, predicates, validate_label,
};
use crate::error::{Error, Result};
use crate::storage::GraphStorage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Datatype of month and year literals.
const INTEGER_DATATYPE: &str = "xsd:integer";

/// Month and year a paper was published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationInfo {
    /// Month, 1 to 12
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    /// Year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
}

/// A contribution to create with the paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionInput {
    /// Contribution label
    pub label: String,
    /// Research problems the contribution addresses
    #[serde(default)]
    pub research_problems: Vec<ThingId>,
}

/// Everything needed to create a paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaperCommand {
    /// Creator of every resource and statement written
    #[serde(default)]
    pub contributor: ContributorId,
    /// Paper title
    pub title: String,
    /// Existing research fields
    pub research_fields: Vec<ThingId>,
    /// Authors in order
    #[serde(default)]
    pub authors: Vec<AuthorInput>,
    /// DOI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Publication month and year
    #[serde(default)]
    pub publication_info: PublicationInfo,
    /// At least one contribution
    pub contributions: Vec<ContributionInput>,
}

/// A paper read back from the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperView {
    /// Paper id
    pub id: ThingId,
    /// Title
    pub title: String,
    /// Research fields
    pub research_fields: Vec<ThingRef>,
    /// Authors in list order
    pub authors: Vec<AuthorView>,
    /// DOI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Publication month and year
    pub publication_info: PublicationInfo,
    /// Contributions, in id order
    pub contributions: Vec<ThingRef>,
    /// Statements describing the paper, not counting linked papers,
    /// problems or fields
    pub statement_count: usize,
    /// Creator
    pub created_by: ContributorId,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

// ========== Create Pipeline ==========

struct CreatePaperContext<'a> {
    storage: &'a mut dyn GraphStorage,
    command: &'a CreatePaperCommand,
    authors: Vec<ValidatedAuthor>,
    paper_id: Option<ThingId>,
}

impl CreatePaperContext<'_> {
    fn paper_id(&self) -> Result<ThingId> {
        self.paper_id
            .clone()
            .ok_or_else(|| Error::Storage("paper resource has not been created".to_string()))
    }

    fn contributor(&self) -> ContributorId {
        self.command.contributor.clone()
    }

    async fn link(&mut self, subject: ThingId, predicate: &str, object: ThingId) -> Result<()> {
        let statement =
            NewStatement::new(subject, predicate, object).created_by(self.contributor());
        self.storage.create_statement(statement).await?;
        Ok(())
    }
}

#[async_trait]
trait CreatePaperAction: Send + Sync {
    async fn run(&self, ctx: &mut CreatePaperContext<'_>) -> Result<()>;
}

struct TitleValidator;

#[async_trait]
impl CreatePaperAction for TitleValidator {
    async fn run(&self, ctx: &mut CreatePaperContext<'_>) -> Result<()> {
        validate_label(&ctx.command.title).map_err(|reason| Error::invalid_label("title", reason))
    }
}

struct ResearchFieldValidator;

#[async_trait]
impl CreatePaperAction for ResearchFieldValidator {
    async fn run(&self, ctx: &mut CreatePaperContext<'_>) -> Result<()> {
        let command = ctx.command;
        if command.research_fields.is_empty() {
            return Err(Error::Validation(
                "a paper needs at least one research field".to_string(),
            ));
        }
        for field in &command.research_fields {
            match ctx.storage.find_thing(field).await? {
                Some(thing) if thing.has_class(classes::RESEARCH_FIELD) => {}
                _ => return Err(Error::ResearchFieldNotFound(field.clone())),
            }
        }
        Ok(())
    }
}

struct AuthorValidator;

#[async_trait]
impl CreatePaperAction for AuthorValidator {
    async fn run(&self, ctx: &mut CreatePaperContext<'_>) -> Result<()> {
        ctx.authors = validate_authors(&*ctx.storage, &ctx.command.authors).await?;
        Ok(())
    }
}

struct ContributionValidator;

#[async_trait]
impl CreatePaperAction for ContributionValidator {
    async fn run(&self, ctx: &mut CreatePaperContext<'_>) -> Result<()> {
        let command = ctx.command;
        if command.contributions.is_empty() {
            return Err(Error::Validation(
                "a paper needs at least one contribution".to_string(),
            ));
        }
        for contribution in &command.contributions {
            validate_label(&contribution.label)
                .map_err(|reason| Error::invalid_label("contribution label", reason))?;
            for problem in &contribution.research_problems {
                match ctx.storage.find_thing(problem).await? {
                    Some(thing) if thing.has_class(classes::PROBLEM) => {}
                    _ => return Err(Error::ResearchProblemNotFound(problem.clone())),
                }
            }
        }
        Ok(())
    }
}

struct PublicationInfoValidator;

#[async_trait]
impl CreatePaperAction for PublicationInfoValidator {
    async fn run(&self, ctx: &mut CreatePaperContext<'_>) -> Result<()> {
        if let Some(month) = ctx.command.publication_info.month
            && !(1..=12).contains(&month)
        {
            return Err(Error::Validation(format!(
                "publication month must be between 1 and 12, got {month}"
            )));
        }
        if let Some(doi) = &ctx.command.doi {
            validate_label(doi).map_err(|reason| Error::invalid_label("doi", reason))?;
        }
        Ok(())
    }
}

struct PaperResourceCreator;

#[async_trait]
impl CreatePaperAction for PaperResourceCreator {
    async fn run(&self, ctx: &mut CreatePaperContext<'_>) -> Result<()> {
        let new = NewResource::new(ctx.command.title.clone(), [classes::PAPER])
            .created_by(ctx.contributor());
        let paper = ctx.storage.create_resource(new).await?;
        ctx.paper_id = Some(paper.id);
        Ok(())
    }
}

struct ResearchFieldCreator;

#[async_trait]
impl CreatePaperAction for ResearchFieldCreator {
    async fn run(&self, ctx: &mut CreatePaperContext<'_>) -> Result<()> {
        let paper = ctx.paper_id()?;
        let command = ctx.command;
        for field in &command.research_fields {
            ctx.link(paper.clone(), predicates::HAS_RESEARCH_FIELD, field.clone())
                .await?;
        }
        Ok(())
    }
}

struct AuthorCreator;

#[async_trait]
impl CreatePaperAction for AuthorCreator {
    async fn run(&self, ctx: &mut CreatePaperContext<'_>) -> Result<()> {
        if ctx.authors.is_empty() {
            return Ok(());
        }
        let paper = ctx.paper_id()?;
        let contributor = ctx.contributor();
        create_author_list(&mut *ctx.storage, &paper, &ctx.authors, &contributor).await?;
        Ok(())
    }
}

struct PublicationInfoCreator;

#[async_trait]
impl CreatePaperAction for PublicationInfoCreator {
    async fn run(&self, ctx: &mut CreatePaperContext<'_>) -> Result<()> {
        let paper = ctx.paper_id()?;
        let info = ctx.command.publication_info;
        let values = [
            (predicates::MONTH_PUBLISHED, info.month.map(i64::from)),
            (predicates::YEAR_PUBLISHED, info.year),
        ];
        for (predicate, value) in values {
            let Some(value) = value else { continue };
            let new = NewThing {
                extra: Some(INTEGER_DATATYPE.to_string()),
                ..NewThing::new(value.to_string()).created_by(ctx.contributor())
            };
            let literal = ctx.storage.create_literal(new).await?;
            ctx.link(paper.clone(), predicate, literal.id).await?;
        }
        Ok(())
    }
}

struct DoiCreator;

#[async_trait]
impl CreatePaperAction for DoiCreator {
    async fn run(&self, ctx: &mut CreatePaperContext<'_>) -> Result<()> {
        let Some(doi) = ctx.command.doi.clone() else {
            return Ok(());
        };
        let paper = ctx.paper_id()?;
        let new = NewThing::new(doi).created_by(ctx.contributor());
        let literal = ctx.storage.create_literal(new).await?;
        ctx.link(paper, predicates::HAS_DOI, literal.id).await
    }
}

struct ContributionCreator;

#[async_trait]
impl CreatePaperAction for ContributionCreator {
    async fn run(&self, ctx: &mut CreatePaperContext<'_>) -> Result<()> {
        let paper = ctx.paper_id()?;
        let command = ctx.command;
        for contribution in &command.contributions {
            let new = NewResource::new(contribution.label.clone(), [classes::CONTRIBUTION])
                .created_by(ctx.contributor());
            let resource = ctx.storage.create_resource(new).await?;
            ctx.link(paper.clone(), predicates::HAS_CONTRIBUTION, resource.id.clone())
                .await?;
            for problem in &contribution.research_problems {
                ctx.link(
                    resource.id.clone(),
                    predicates::HAS_RESEARCH_PROBLEM,
                    problem.clone(),
                )
                .await?;
            }
        }
        Ok(())
    }
}

fn create_paper_steps() -> Vec<Box<dyn CreatePaperAction>> {
    vec![
        Box::new(TitleValidator),
        Box::new(ResearchFieldValidator),
        Box::new(AuthorValidator),
        Box::new(ContributionValidator),
        Box::new(PublicationInfoValidator),
        Box::new(PaperResourceCreator),
        Box::new(ResearchFieldCreator),
        Box::new(AuthorCreator),
        Box::new(PublicationInfoCreator),
        Box::new(DoiCreator),
        Box::new(ContributionCreator),
    ]
}

// ========== Service ==========

/// Creates, reads and deletes papers.
pub struct PaperService<'a> {
    storage: &'a mut dyn GraphStorage,
    curators: &'a Curators,
    planner: &'a CascadePlanner,
}

impl<'a> PaperService<'a> {
    /// A service over `storage`, deleting along `planner`'s owning predicates.
    pub fn new(
        storage: &'a mut dyn GraphStorage,
        curators: &'a Curators,
        planner: &'a CascadePlanner,
    ) -> Self {
        Self {
            storage,
            curators,
            planner,
        }
    }

    /// Validates `command` and writes the paper. Returns the paper id.
    ///
    /// # Errors
    ///
    /// Returns the first validation error; in that case nothing is written.
    pub async fn create(&mut self, command: &CreatePaperCommand) -> Result<ThingId> {
        let mut ctx = CreatePaperContext {
            storage: &mut *self.storage,
            command,
            authors: Vec::new(),
            paper_id: None,
        };
        for step in create_paper_steps() {
            step.run(&mut ctx).await?;
        }
        let id = ctx.paper_id()?;
        tracing::info!(id = %id, title = %command.title, "Created paper");
        Ok(id)
    }

    /// Reads a paper.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PaperNotFound`] if `id` is not a paper.
    pub async fn find(&self, id: &ThingId) -> Result<PaperView> {
        let storage: &dyn GraphStorage = &*self.storage;
        let paper = match storage.find_thing(id).await? {
            Some(Thing::Resource(r)) if r.has_class(classes::PAPER) => r,
            _ => return Err(Error::PaperNotFound(id.clone())),
        };
        let outgoing = storage
            .find_statements(&StatementFilter::subject(id.clone()))
            .await?;

        let mut view = PaperView {
            id: paper.id.clone(),
            title: paper.label.clone(),
            research_fields: Vec::new(),
            authors: read_author_list(storage, id).await?,
            doi: None,
            publication_info: PublicationInfo::default(),
            contributions: Vec::new(),
            statement_count: storage.count_statements_recursive(id).await?,
            created_by: paper.created_by.clone(),
            created_at: paper.created_at,
        };

        for statement in outgoing {
            let Some(object) = storage.find_thing(&statement.object).await? else {
                continue;
            };
            match statement.predicate.as_str() {
                predicates::HAS_RESEARCH_FIELD => view.research_fields.push(ThingRef::of(&object)),
                predicates::HAS_CONTRIBUTION => view.contributions.push(ThingRef::of(&object)),
                predicates::HAS_DOI => view.doi = Some(object.label().to_string()),
                predicates::MONTH_PUBLISHED => {
                    view.publication_info.month = object.label().parse().ok();
                }
                predicates::YEAR_PUBLISHED => {
                    view.publication_info.year = object.label().parse().ok();
                }
                _ => {}
            }
        }
        view.research_fields.sort();
        view.contributions.sort();
        Ok(view)
    }

    /// Deletes a paper with everything it exclusively owns.
    ///
    /// # Errors
    ///
    /// - [`Error::PaperNotFound`] if `id` is not a paper
    /// - [`Error::PaperInUse`] if any statement points at the paper
    /// - [`Error::NeitherOwnerNorCurator`] if `contributor` may not delete it
    pub async fn delete(
        &mut self,
        id: &ThingId,
        contributor: &ContributorId,
    ) -> Result<DeletionReport> {
        let paper = match self.storage.find_thing(id).await? {
            Some(thing) if thing.has_class(classes::PAPER) => thing,
            _ => return Err(Error::PaperNotFound(id.clone())),
        };
        if self.storage.count_incoming_statements(id).await? > 0 {
            return Err(Error::PaperInUse(id.clone()));
        }
        self.curators.require_owner_or_curator(contributor, &paper)?;

        let plan = self.planner.plan_from_storage(&*self.storage, id).await?;
        let mut report = apply_plan(&mut *self.storage, &plan).await?;

        // A paper without statements is not a subject, so the plan is empty.
        if plan.is_empty() {
            self.storage.delete_thing(id).await?;
            report.resources_deleted.push(id.clone());
        }

        tracing::info!(id = %id, resources = report.resources_deleted.len(), "Deleted paper");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BenchmarkVocabulary;
    use crate::services::ensure_vocabulary;
    use crate::storage::in_memory::new_in_memory_storage;

    struct Fixture {
        storage: Box<dyn GraphStorage>,
        field: ThingId,
        problem: ThingId,
    }

    async fn fixture() -> Fixture {
        let mut storage = new_in_memory_storage();
        ensure_vocabulary(storage.as_mut(), &BenchmarkVocabulary::default())
            .await
            .unwrap();
        let field = storage
            .create_resource(NewResource::new("Computer Science", [classes::RESEARCH_FIELD]))
            .await
            .unwrap()
            .id;
        let problem = storage
            .create_resource(NewResource::new("Machine translation", [classes::PROBLEM]))
            .await
            .unwrap()
            .id;
        Fixture {
            storage,
            field,
            problem,
        }
    }

    fn command(f: &Fixture) -> CreatePaperCommand {
        CreatePaperCommand {
            contributor: ContributorId::new("alice"),
            title: "Attention Is All You Need".to_string(),
            research_fields: vec![f.field.clone()],
            authors: vec![
                AuthorInput::named("Ashish Vaswani"),
                AuthorInput::named("Noam Shazeer"),
            ],
            doi: Some("10.48550/arXiv.1706.03762".to_string()),
            publication_info: PublicationInfo {
                month: Some(6),
                year: Some(2017),
            },
            contributions: vec![ContributionInput {
                label: "Transformer".to_string(),
                research_problems: vec![f.problem.clone()],
            }],
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let mut f = fixture().await;
        let command = command(&f);
        let (curators, planner) = (Curators::default(), CascadePlanner::default());
        let mut service = PaperService::new(f.storage.as_mut(), &curators, &planner);

        let id = service.create(&command).await.unwrap();
        let view = service.find(&id).await.unwrap();

        assert_eq!(view.title, "Attention Is All You Need");
        assert_eq!(view.research_fields.len(), 1);
        assert_eq!(view.research_fields[0].id, f.field);
        let authors: Vec<&str> = view.authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(view.doi.as_deref(), Some("10.48550/arXiv.1706.03762"));
        assert_eq!(view.publication_info.month, Some(6));
        assert_eq!(view.publication_info.year, Some(2017));
        assert_eq!(view.contributions.len(), 1);
        assert_eq!(view.created_by, ContributorId::new("alice"));
    }

    #[tokio::test]
    async fn test_invalid_command_writes_nothing() {
        let mut f = fixture().await;
        let before = f.storage.export_snapshot().await.unwrap();
        let (curators, planner) = (Curators::default(), CascadePlanner::default());

        let mut bad_month = command(&f);
        bad_month.publication_info.month = Some(13);
        let mut no_contributions = command(&f);
        no_contributions.contributions.clear();
        let mut unknown_field = command(&f);
        unknown_field.research_fields = vec![f.problem.clone()];
        let mut unknown_problem = command(&f);
        unknown_problem.contributions[0].research_problems = vec![f.field.clone()];
        let mut blank_title = command(&f);
        blank_title.title = " ".to_string();

        let mut service = PaperService::new(f.storage.as_mut(), &curators, &planner);
        assert!(matches!(
            service.create(&bad_month).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.create(&no_contributions).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.create(&unknown_field).await,
            Err(Error::ResearchFieldNotFound(_))
        ));
        assert!(matches!(
            service.create(&unknown_problem).await,
            Err(Error::ResearchProblemNotFound(_))
        ));
        assert!(matches!(
            service.create(&blank_title).await,
            Err(Error::InvalidLabel { .. })
        ));

        assert_eq!(f.storage.export_snapshot().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_removes_owned_content() {
        let mut f = fixture().await;
        let command = command(&f);
        let (curators, planner) = (Curators::default(), CascadePlanner::default());
        let mut service = PaperService::new(f.storage.as_mut(), &curators, &planner);
        let id = service.create(&command).await.unwrap();

        let err = service
            .delete(&id, &ContributorId::new("mallory"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NeitherOwnerNorCurator { .. }));

        let report = service.delete(&id, &command.contributor).await.unwrap();
        assert!(report.resources_deleted.contains(&id));
        // paper, author list, two authors, contribution
        assert_eq!(report.resources_deleted.len(), 5);

        assert!(matches!(
            service.find(&id).await,
            Err(Error::PaperNotFound(_))
        ));
        assert!(f.storage.find_thing(&f.field).await.unwrap().is_some());
        assert!(f.storage.find_thing(&f.problem).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_paper_in_use() {
        let mut f = fixture().await;
        let command = command(&f);
        let (curators, planner) = (Curators::default(), CascadePlanner::default());
        let mut service = PaperService::new(f.storage.as_mut(), &curators, &planner);
        let id = service.create(&command).await.unwrap();

        f.storage
            .create_statement(NewStatement::new(
                f.field.clone(),
                predicates::HAS_CONTRIBUTION,
                id.clone(),
            ))
            .await
            .unwrap();
        let mut service = PaperService::new(f.storage.as_mut(), &curators, &planner);
        let err = service.delete(&id, &command.contributor).await.unwrap_err();
        assert!(matches!(err, Error::PaperInUse(_)));

        let err = service
            .delete(&f.field, &command.contributor)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PaperNotFound(_)));
    }
}
