//! Local checks run before a draft is submitted.
//!
//! Every rule here is evaluated without touching the network. The
//! duplicate variants are never produced by [`validate_draft`]; the add
//! form appends them from its duplicate guard so callers receive a
//! single list of reasons.

use crate::error::{CatalogError, Result};
use crate::types::{DraftEntity, EntityKind};
use std::collections::HashSet;
use std::fmt;

/// Earliest accepted release year
pub const MIN_YEAR: i32 = 1888;

/// Latest accepted release year
pub const MAX_YEAR: i32 = 2100;

/// Lowest number an extra part or season may carry
pub const MIN_PART_NUMBER: u32 = 2;

/// A single failed rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationProblem {
    MissingName,
    MissingCategory,
    MissingYear,
    InvalidYear(String),
    NoGenres,
    PartNumberTooLow { number: u32 },
    DuplicatePartNumber { number: u32 },
    MissingPartYear { number: u32 },
    InvalidPartYear { number: u32, input: String },
    DuplicateName,
    DuplicateComposite,
}

impl fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "Name is required"),
            Self::MissingCategory => write!(f, "Category is required"),
            Self::MissingYear => write!(f, "Release year is required"),
            Self::InvalidYear(input) => write!(
                f,
                "Release year '{}' must be a 4-digit year between {} and {}",
                input, MIN_YEAR, MAX_YEAR
            ),
            Self::NoGenres => write!(f, "Select at least one genre"),
            Self::PartNumberTooLow { number } => write!(
                f,
                "Number {} is not allowed; extra entries start at {}",
                number, MIN_PART_NUMBER
            ),
            Self::DuplicatePartNumber { number } => write!(f, "Number {} is used twice", number),
            Self::MissingPartYear { number } => write!(f, "Year is required for number {}", number),
            Self::InvalidPartYear { number, input } => {
                write!(f, "Year '{}' for number {} is not valid", input, number)
            }
            Self::DuplicateName => write!(f, "An entry with this name already exists"),
            Self::DuplicateComposite => write!(
                f,
                "An entry with this name, category and year already exists"
            ),
        }
    }
}

/// Parse a typed release year.
///
/// Accepts exactly four ASCII digits (surrounding whitespace ignored)
/// within `MIN_YEAR..=MAX_YEAR`.
pub fn parse_year(input: &str) -> Option<i32> {
    let input = input.trim();
    if input.len() != 4 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = input.parse().ok()?;
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

/// Collect every local problem with a draft, in field order.
pub fn check_draft(draft: &DraftEntity) -> Vec<ValidationProblem> {
    let mut problems = Vec::new();

    if draft.trimmed_name().is_empty() {
        problems.push(ValidationProblem::MissingName);
    }

    if draft.category_id.is_none() {
        problems.push(ValidationProblem::MissingCategory);
    }

    let year_input = draft.release_year.trim();
    if year_input.is_empty() {
        if draft.kind.requires_year() {
            problems.push(ValidationProblem::MissingYear);
        }
    } else if parse_year(year_input).is_none() {
        problems.push(ValidationProblem::InvalidYear(year_input.to_string()));
    }

    if draft.genre_ids.is_empty() {
        problems.push(ValidationProblem::NoGenres);
    }

    check_parts(draft, &mut problems);

    problems
}

fn check_parts(draft: &DraftEntity, problems: &mut Vec<ValidationProblem>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for part in &draft.parts {
        if part.number < MIN_PART_NUMBER {
            problems.push(ValidationProblem::PartNumberTooLow {
                number: part.number,
            });
        }

        if !seen.insert(part.number) && reported.insert(part.number) {
            problems.push(ValidationProblem::DuplicatePartNumber {
                number: part.number,
            });
        }

        let year_input = part.year.trim();
        if year_input.is_empty() {
            if draft.kind == EntityKind::Movie {
                problems.push(ValidationProblem::MissingPartYear {
                    number: part.number,
                });
            }
        } else if parse_year(year_input).is_none() {
            problems.push(ValidationProblem::InvalidPartYear {
                number: part.number,
                input: year_input.to_string(),
            });
        }
    }
}

/// Validate a draft, returning every problem at once.
pub fn validate_draft(draft: &DraftEntity) -> Result<()> {
    let problems = check_draft(draft);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Validation(problems))
    }
}
