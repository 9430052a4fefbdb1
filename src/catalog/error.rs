use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the record source itself, distinct from game-rule failures.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Could not read dataset '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate overall_rank {0} in dataset")]
    DuplicateRank(u32),
}

/// Catalog lookups that found nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Not found")]
    NotFound,
}
