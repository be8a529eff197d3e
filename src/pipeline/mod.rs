//! Pipeline module - load, join/expand, aggregate

pub mod aggregate;
pub mod error;
pub mod join;
pub mod loader;
pub mod records;

use std::path::PathBuf;

pub use aggregate::*;
pub use error::*;
pub use join::*;
pub use loader::*;
pub use records::*;

/// Locations of the three input tables
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub hits: PathBuf,
    pub gene_types: PathBuf,
    pub plastic_classes: PathBuf,
}

/// The loaded input tables, held for the whole run
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub hits: Vec<HitRecord>,
    pub gene_types: Vec<GeneTypeAnnotation>,
    pub plastic_classes: Vec<PlasticClassification>,
}

/// Output of one pipeline run, borrowing from its `Inputs`
#[derive(Debug, Clone)]
pub struct PipelineRun<'a> {
    pub rows: Vec<ExpandedHit<'a>>,
    pub aggregates: Aggregates,
}

impl<'a> PipelineRun<'a> {
    /// Aggregate the rows of a finished join stage
    pub fn from_joined(hits: &[HitRecord], joined: JoinedHits<'a>) -> Self {
        let aggregates = aggregate(hits, joined.retained_rows, &joined.rows);
        PipelineRun {
            rows: joined.rows,
            aggregates,
        }
    }
}

/// Load all three tables. Each file is opened, read and closed in turn.
pub fn load_inputs(paths: &InputPaths, columns: &ColumnNames) -> PipelineResult<Inputs> {
    Ok(Inputs {
        hits: read_hits(&paths.hits)?,
        gene_types: read_gene_types(&paths.gene_types, columns)?,
        plastic_classes: read_plastic_classes(&paths.plastic_classes, columns)?,
    })
}
