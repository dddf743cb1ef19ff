//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use crate::domain::{ThingId, validate_label as validate_domain_label, validate_thing_id};
use crate::services::papers::ContributionInput;
use crate::services::{AuthorInput, authors::is_valid_orcid};

/// Validate a thing id (`R12`, `P31`, `hasAuthors`, ...).
///
/// Delegates to the domain validator so the CLI and the store agree on
/// which ids are acceptable.
pub fn validate_id(s: &str) -> Result<ThingId, String> {
    let trimmed = s.trim();
    validate_thing_id(trimmed)?;
    Ok(ThingId::new(trimmed))
}

/// Validate a resource, predicate or class label.
pub fn validate_label(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    validate_domain_label(trimmed)?;
    Ok(trimmed.to_string())
}

/// Parse an author given on the command line.
///
/// Accepted forms:
/// - `Jane Doe`: created unless nothing else resolves it
/// - `Jane Doe <0000-0002-1825-0097>`: resolved by ORCID when known
/// - `Jane Doe @R12`: an existing author resource
pub fn parse_author(s: &str) -> Result<AuthorInput, String> {
    let s = s.trim();

    if let Some((name, id)) = s.rsplit_once('@') {
        return Ok(AuthorInput {
            id: Some(validate_id(id)?),
            name: validate_label(name)?,
            orcid: None,
        });
    }

    if let Some((name, rest)) = s.split_once('<') {
        let orcid = rest
            .strip_suffix('>')
            .ok_or_else(|| format!("Missing closing '>' in author '{s}'"))?
            .trim();
        if !is_valid_orcid(orcid) {
            return Err(format!(
                "Invalid ORCID '{orcid}'. Expected format: 0000-0002-1825-0097"
            ));
        }
        return Ok(AuthorInput {
            id: None,
            name: validate_label(name)?,
            orcid: Some(orcid.to_string()),
        });
    }

    Ok(AuthorInput::named(validate_label(s)?))
}

/// Parse a contribution as `label` or `label=R1,R2` (research problem ids).
pub fn parse_contribution(s: &str) -> Result<ContributionInput, String> {
    let (label, problems) = match s.split_once('=') {
        Some((label, problems)) => (label, problems),
        None => (s, ""),
    };

    let research_problems = problems
        .split(',')
        .filter(|p| !p.trim().is_empty())
        .map(validate_id)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ContributionInput {
        label: validate_label(label)?,
        research_problems,
    })
}
