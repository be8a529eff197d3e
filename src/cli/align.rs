//! External aligner invocation (DIAMOND-compatible command line)

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use log::{debug, info};

/// Tabular output format understood by the hit loader
pub const OUTFMT_TABULAR: &str = "6";

/// Settings for a protein search against a prebuilt database
#[derive(Debug, Clone, PartialEq)]
pub struct AlignOptions {
    pub threads: Option<usize>,
    pub evalue: f64,
    pub max_target_seqs: usize,
    pub min_identity: Option<f64>,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            threads: None,
            evalue: 1e-5,
            max_target_seqs: 1,
            min_identity: None,
        }
    }
}

/// Build `<aligner> makedb --in <fasta> --db <db>`
pub fn makedb_command(aligner: &str, fasta: &Path, db: &Path) -> Command {
    let mut cmd = Command::new(aligner);
    cmd.arg("makedb").arg("--in").arg(fasta).arg("--db").arg(db);
    cmd
}

/// Build the blastp search emitting the 12-column tabular report
pub fn align_command(
    aligner: &str,
    query: &Path,
    db: &Path,
    out: &Path,
    options: &AlignOptions,
) -> Command {
    let mut cmd = Command::new(aligner);
    cmd.arg("blastp")
        .arg("--db")
        .arg(db)
        .arg("--query")
        .arg(query)
        .arg("--out")
        .arg(out)
        .arg("--outfmt")
        .arg(OUTFMT_TABULAR)
        .arg("--evalue")
        .arg(options.evalue.to_string())
        .arg("--max-target-seqs")
        .arg(options.max_target_seqs.to_string());

    if let Some(threads) = options.threads {
        cmd.arg("--threads").arg(threads.to_string());
    }
    if let Some(id) = options.min_identity {
        cmd.arg("--id").arg(id.to_string());
    }
    cmd
}

/// Build the aligner database from a reference FASTA
pub fn run_makedb(aligner: &str, fasta: &Path, db: &Path) -> Result<()> {
    if !fasta.is_file() {
        anyhow::bail!("Reference FASTA not found: {}", fasta.display());
    }
    info!("building database {} from {}", db.display(), fasta.display());
    run(makedb_command(aligner, fasta, db), aligner)
}

/// Search `query` against `db`, writing the hit report to `out`
pub fn run_align(
    aligner: &str,
    query: &Path,
    db: &Path,
    out: &Path,
    options: &AlignOptions,
) -> Result<()> {
    if !query.is_file() {
        anyhow::bail!("Query FASTA not found: {}", query.display());
    }
    info!("aligning {} against {}", query.display(), db.display());
    run(align_command(aligner, query, db, out, options), aligner)
}

fn run(mut cmd: Command, aligner: &str) -> Result<()> {
    debug!("running {:?}", cmd);
    let output = cmd
        .output()
        .with_context(|| format!("Failed to launch aligner '{}'. Is it on PATH?", aligner))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "Aligner '{}' exited with {}: {}",
            aligner,
            output.status,
            stderr.trim()
        );
    }
    Ok(())
}
