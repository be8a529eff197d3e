//! Command-line argument definitions using clap

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Plastanno - annotate alignment hits against a plastic-degrading enzyme database
#[derive(Parser, Debug)]
#[command(name = "plastanno")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Tabular hit report from the aligner (12 columns, no header)
    #[arg(short = 'i', long)]
    pub hits: Option<PathBuf>,

    /// Gene-type annotation table (TSV with header)
    #[arg(short, long)]
    pub gene_types: Option<PathBuf>,

    /// Plastic classification table (TSV with header)
    #[arg(short = 'c', long)]
    pub plastic_classes: Option<PathBuf>,

    /// Output directory. Defaults to the directory of the hit report.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Prefix for output file names. Defaults to the hit report file stem.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Gene-type column holding the database label (joined to the hit target id)
    #[arg(long, default_value = "Label")]
    pub label_column: String,

    /// Gene-type column holding the comma-separated plastic types
    #[arg(long, default_value = "Plastic")]
    pub plastic_column: String,

    /// Classification column holding the plastic abbreviation
    #[arg(long, default_value = "Abbreviation")]
    pub abbreviation_column: String,

    /// Classification column holding the plastic's full name
    #[arg(long, default_value = "Name")]
    pub name_column: String,

    /// Classification column holding the backbone type
    #[arg(long, default_value = "Backbone")]
    pub backbone_column: String,

    /// Classification column holding the degradability category
    #[arg(long, default_value = "Degradability")]
    pub degradability_column: String,

    /// Classification column holding the feedstock category
    #[arg(long, default_value = "Feedstock")]
    pub feedstock_column: String,

    /// Number of groups charted for the dimension with the most groups
    #[arg(long, default_value = "20", value_parser = validate_top_n)]
    pub top_n: usize,

    /// Skip writing SVG charts
    #[arg(long, default_value = "false")]
    pub no_charts: bool,

    /// Also package all outputs into a zip archive
    #[arg(long, default_value = "false")]
    pub bundle: bool,

    /// Overwrite existing outputs without asking
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Increase diagnostic logging on stderr (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Align protein queries against the database with the external aligner
    Align {
        /// Query sequences (FASTA)
        #[arg(short, long)]
        query: PathBuf,

        /// Aligner database built with `makedb`
        #[arg(short, long)]
        db: PathBuf,

        /// Output hit report (tabular, 12 columns)
        #[arg(short, long)]
        out: PathBuf,

        /// Worker threads passed to the aligner
        #[arg(long)]
        threads: Option<usize>,

        /// Maximum e-value to report
        #[arg(long, default_value = "1e-5")]
        evalue: f64,

        /// Maximum number of target sequences per query
        #[arg(long, default_value = "1")]
        max_target_seqs: usize,

        /// Minimum percent identity to report
        #[arg(long, value_parser = validate_identity)]
        id: Option<f64>,

        /// Aligner executable
        #[arg(long, default_value = "diamond")]
        aligner: String,
    },

    /// Build the aligner database from the reference protein FASTA
    Makedb {
        /// Reference protein sequences (FASTA)
        #[arg(short, long)]
        fasta: PathBuf,

        /// Output database path
        #[arg(short, long)]
        db: PathBuf,

        /// Aligner executable
        #[arg(long, default_value = "diamond")]
        aligner: String,
    },
}

impl Cli {
    /// Output directory, deriving it from the hit report if not provided
    pub fn output_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.output_dir {
            return Some(dir.clone());
        }
        let hits = self.hits.as_ref()?;
        Some(
            hits.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")),
        )
    }

    /// Output file prefix, deriving it from the hit report if not provided
    pub fn prefix(&self) -> Option<String> {
        if let Some(prefix) = &self.prefix {
            return Some(prefix.clone());
        }
        let stem = self.hits.as_ref()?.file_stem()?.to_str()?;
        Some(stem.to_string())
    }
}

/// Validator for top_n parameter
fn validate_top_n(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value == 0 {
        Err("top_n must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for minimum identity parameter
fn validate_identity(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=100.0).contains(&value) {
        Err(format!("id must be between 0 and 100, got {}", value))
    } else {
        Ok(value)
    }
}
