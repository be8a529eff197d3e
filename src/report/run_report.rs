//! JSON run report and zip bundling of the written outputs

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{Aggregates, ColumnNames, Dimension, InputPaths, PipelineCounts};

/// Metadata about the run
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (RFC 3339)
    pub timestamp: String,
    pub plastanno_version: String,
    pub hits_file: String,
    pub gene_types_file: String,
    pub plastic_classes_file: String,
    pub columns: ColumnNames,
}

/// Per-dimension overview
#[derive(Debug, Clone, Serialize)]
pub struct DimensionEntry {
    pub dimension: Dimension,
    pub groups: usize,
    /// Key of the group with the most hits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_group_hits: Option<usize>,
}

/// Complete run report
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub counts: PipelineCounts,
    pub dimensions: Vec<DimensionEntry>,
    pub outputs: Vec<String>,
}

/// Assemble the report for a finished run
pub fn build_run_report(
    inputs: &InputPaths,
    columns: &ColumnNames,
    aggregates: &Aggregates,
    outputs: &[PathBuf],
) -> RunReport {
    let dimensions = Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let bars = aggregates.bars(dimension);
            let top = bars.first();
            DimensionEntry {
                dimension,
                groups: bars.len(),
                top_group: top.map(|(key, _)| key.to_string()),
                top_group_hits: top.map(|(_, hits)| *hits),
            }
        })
        .collect();

    RunReport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            plastanno_version: env!("CARGO_PKG_VERSION").to_string(),
            hits_file: inputs.hits.display().to_string(),
            gene_types_file: inputs.gene_types.display().to_string(),
            plastic_classes_file: inputs.plastic_classes.display().to_string(),
            columns: columns.clone(),
        },
        counts: aggregates.counts.clone(),
        dimensions,
        outputs: outputs
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect(),
    }
}

/// Export the run report to a JSON file
pub fn export_run_report(report: &RunReport, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize run report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write run report to {}", output_path.display()))?;

    Ok(())
}

/// Package output files into a zip archive, flat by file name
pub fn package_outputs(files: &[PathBuf], zip_path: &Path) -> Result<()> {
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let zip_file = std::fs::File::create(zip_path)
        .with_context(|| format!("Failed to create zip file: {}", zip_path.display()))?;

    let mut zip = ZipWriter::new(zip_file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for path in files {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid output file name: {}", path.display()))?;
        zip.start_file(filename, options)
            .with_context(|| format!("Failed to add {} to zip", filename))?;
        let mut content = Vec::new();
        std::fs::File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?
            .read_to_end(&mut content)?;
        zip.write_all(&content)?;
    }

    zip.finish().context("Failed to finalize zip file")?;

    Ok(())
}
