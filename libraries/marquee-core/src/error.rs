/// Core error types for Marquee
use crate::validation::ValidationProblem;
use thiserror::Error;

/// Result type alias using `CatalogError`
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Core error type for Marquee
#[derive(Error, Debug)]
pub enum CatalogError {
    /// One or more local validation rules failed
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<ValidationProblem>),
}

impl CatalogError {
    /// Validation problems carried by this error
    pub fn problems(&self) -> &[ValidationProblem] {
        match self {
            Self::Validation(problems) => problems,
        }
    }
}

fn summarize(problems: &[ValidationProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
