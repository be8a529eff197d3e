//! Error types for loading and joining the annotation tables.
//!
//! Every variant carries the source name (usually the file path) so a
//! message can be traced back to the offending input without a backtrace.

use thiserror::Error;

/// Errors raised while reading hit reports and annotation tables.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A column the pipeline reads is not present in the header.
    ///
    /// Raised before any data row is processed.
    #[error("{source_name}: required column '{column}' not found in header. Available columns: {available:?}")]
    MissingColumn {
        source_name: String,
        column: String,
        available: Vec<String>,
    },

    /// A data row has a different number of fields than the header declares.
    #[error("{source_name}: line {line} has {found} columns, expected {expected}")]
    MalformedInput {
        source_name: String,
        /// 1-based line number in the source
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A numeric field could not be parsed.
    #[error("{source_name}: line {line}, column '{column}': cannot parse '{value}' as {expected}")]
    TypeMismatch {
        source_name: String,
        /// 1-based line number in the source
        line: usize,
        column: String,
        value: String,
        expected: &'static str,
    },

    /// No hit survived the gene-type join and plastic-type filter.
    ///
    /// Informational only: the run continues and writes empty tables.
    #[error("no hits matched an annotated gene with a plastic type")]
    EmptyJoinResult,

    /// The source could not be opened or read.
    #[error("{source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub(crate) fn io(source_name: &str, source: std::io::Error) -> Self {
        PipelineError::Io {
            source_name: source_name.to_string(),
            source,
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
