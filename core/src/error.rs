use std::path::PathBuf;
use thiserror::Error;

/// Startup failure: the process must not serve without a valid catalog.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog must be a JSON array of assessments")]
    NotAnArray,

    #[error("assessment #{index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("assessment #{index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("assessment #{index} has `attributes` that is not a JSON object")]
    InvalidAttributes { index: usize },

    #[error("assessment #{index} ({id}) has an empty description")]
    EmptyDescription { index: usize, id: String },

    #[error("assessment #{index} reuses id `{id}`")]
    DuplicateId { index: usize, id: String },
}

/// Per-request rejection. Never touches shared state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("query text is empty")]
    EmptyText,

    #[error("k must be greater than zero")]
    NonPositiveK,
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("failed to read test cases {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("test cases are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("test case #{index} was rejected: {source}")]
    InvalidCase {
        index: usize,
        #[source]
        source: InvalidInputError,
    },
}
