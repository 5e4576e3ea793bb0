use plotters::drawing::DrawingAreaErrorKind;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("input file {0} not found")]
    FileNotFound(PathBuf),

    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("column '{0}' is missing from the header")]
    MissingColumn(String),

    #[error("column '{column}', row {row}: '{value}' is not a number")]
    Conversion {
        column: String,
        row: usize,
        value: String,
    },

    /// The bar layout asks for more experiment columns than the file has.
    #[error("expected at least {expected} experiment columns, found {found}")]
    MissingColumns { expected: usize, found: usize },

    #[error("environment variable {0} is not set")]
    MissingEnvironment(&'static str),

    #[error("could not write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("could not read experiment results {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Render(e.to_string())
    }
}
