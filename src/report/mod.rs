//! Report module - output tables, charts and run summaries

pub mod charts;
pub mod run_report;
pub mod summary;
pub mod tables;

pub use charts::*;
pub use run_report::*;
pub use summary::*;
pub use tables::*;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::pipeline::{ColumnNames, Dimension, InputPaths, PipelineRun};

/// Where a run writes its files: `<dir>/<prefix>_<suffix>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub prefix: String,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    fn file(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}_{}", self.prefix, suffix))
    }

    pub fn annotated(&self) -> PathBuf {
        self.file("annotated.tsv")
    }

    pub fn summary(&self, dimension: Dimension) -> PathBuf {
        self.file(&format!("by_{}.tsv", dimension.slug()))
    }

    pub fn chart(&self, dimension: Dimension) -> PathBuf {
        self.file(&format!("by_{}.svg", dimension.slug()))
    }

    pub fn run_report(&self) -> PathBuf {
        self.file("run_report.json")
    }

    pub fn bundle(&self) -> PathBuf {
        self.file("results.zip")
    }

    /// Every path a run with `options` would write
    pub fn planned(&self, options: &WriteOptions) -> Vec<PathBuf> {
        let mut paths = vec![self.annotated()];
        paths.extend(Dimension::ALL.iter().map(|&d| self.summary(d)));
        if options.charts {
            paths.extend(Dimension::ALL.iter().map(|&d| self.chart(d)));
        }
        paths.push(self.run_report());
        if options.bundle {
            paths.push(self.bundle());
        }
        paths
    }

    /// Planned paths that already exist on disk
    pub fn existing(&self, options: &WriteOptions) -> Vec<PathBuf> {
        self.planned(options)
            .into_iter()
            .filter(|p| p.exists())
            .collect()
    }
}

/// Which optional outputs to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub charts: bool,
    /// Groups shown in the chart of the widest dimension
    pub top_n: usize,
    pub bundle: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            charts: true,
            top_n: 20,
            bundle: false,
        }
    }
}

/// Write every output of a finished run and return the written paths.
///
/// Each file is first written next to its target with a `.partial`
/// suffix and renamed once complete.
pub fn write_outputs(
    paths: &OutputPaths,
    inputs: &InputPaths,
    run: &PipelineRun<'_>,
    columns: &ColumnNames,
    options: &WriteOptions,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&paths.dir).with_context(|| {
        format!("Failed to create output directory: {}", paths.dir.display())
    })?;

    let mut written = Vec::new();

    let annotated = paths.annotated();
    let mut df = annotated_frame(&run.rows, columns).context("Failed to build annotated table")?;
    write_atomically(&annotated, |tmp| write_tsv(&mut df, tmp))?;
    written.push(annotated);

    for dimension in Dimension::ALL {
        let path = paths.summary(dimension);
        let mut df = dimension_frame(&run.aggregates, dimension, columns)
            .with_context(|| format!("Failed to build {} summary table", dimension))?;
        write_atomically(&path, |tmp| write_tsv(&mut df, tmp))?;
        written.push(path);
    }

    if options.charts {
        let widest = run.aggregates.widest_dimension();
        for dimension in Dimension::ALL {
            let limit = (dimension == widest).then_some(options.top_n);
            let title = format!("Hits by {}", dimension);
            let doc = render_bar_chart(&title, &run.aggregates.bars(dimension), limit);
            let path = paths.chart(dimension);
            write_atomically(&path, |tmp| save_chart(&doc, tmp))?;
            written.push(path);
        }
    }

    let report_path = paths.run_report();
    let report = build_run_report(inputs, columns, &run.aggregates, &written);
    write_atomically(&report_path, |tmp| export_run_report(&report, tmp))?;
    written.push(report_path);

    if options.bundle {
        let bundle = paths.bundle();
        write_atomically(&bundle, |tmp| package_outputs(&written, tmp))?;
        written.push(bundle);
    }

    debug!("wrote {} output files to {}", written.len(), paths.dir.display());
    Ok(written)
}

fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    if let Err(e) = write(&partial) {
        std::fs::remove_file(&partial).ok();
        return Err(e);
    }
    std::fs::rename(&partial, path)
        .with_context(|| format!("Failed to move output into place: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::new("/out", "sample");
        assert_eq!(paths.annotated(), PathBuf::from("/out/sample_annotated.tsv"));
        assert_eq!(
            paths.summary(Dimension::Degradability),
            PathBuf::from("/out/sample_by_degradability.tsv")
        );
        assert_eq!(
            paths.chart(Dimension::PlasticType),
            PathBuf::from("/out/sample_by_plastic.svg")
        );
        assert_eq!(paths.bundle(), PathBuf::from("/out/sample_results.zip"));
    }

    #[test]
    fn test_planned_outputs_follow_options() {
        let paths = OutputPaths::new("/out", "s");
        let full = paths.planned(&WriteOptions {
            charts: true,
            top_n: 20,
            bundle: true,
        });
        assert_eq!(full.len(), 1 + 4 + 4 + 1 + 1);

        let minimal = paths.planned(&WriteOptions {
            charts: false,
            top_n: 20,
            bundle: false,
        });
        assert_eq!(minimal.len(), 6);
    }

    #[test]
    fn test_write_atomically_cleans_up_on_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("out.tsv");
        let result = write_atomically(&target, |tmp| {
            std::fs::write(tmp, "partial")?;
            anyhow::bail!("boom")
        });
        assert!(result.is_err());
        assert!(!target.exists());
        assert!(!dir.path().join("out.tsv.partial").exists());
    }
}
