//! Shared test utilities and fixture generators
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use plastanno::pipeline::{
    join_and_expand, ColumnNames, HitRecord, InputPaths, Inputs, PipelineRun,
};
use tempfile::TempDir;

pub const GENE_TYPE_HEADER: &str = "Label\tGene\tPlastic";
pub const PLASTIC_CLASS_HEADER: &str =
    "Abbreviation\tName\tBackbone\tDegradability\tFeedstock";

/// Join and aggregate loaded inputs the same way the binary does
pub fn run(inputs: &Inputs) -> PipelineRun<'_> {
    let joined = join_and_expand(&inputs.hits, &inputs.gene_types, &inputs.plastic_classes);
    PipelineRun::from_joined(&inputs.hits, joined)
}

/// Build a hit with fixed coordinates
pub fn hit(query: &str, target: &str, identity: f64, bit_score: f64) -> HitRecord {
    HitRecord {
        query_id: query.to_string(),
        target_id: target.to_string(),
        pct_identity: identity,
        alignment_length: 250,
        mismatches: 5,
        gap_opens: 0,
        query_start: 1,
        query_end: 250,
        target_start: 1,
        target_end: 250,
        evalue: 1e-50,
        bit_score,
    }
}

/// Format one 12-column hit line
pub fn hit_line(query: &str, target: &str, identity: f64, bit_score: f64) -> String {
    format!(
        "{}\t{}\t{}\t250\t5\t0\t1\t250\t1\t250\t1e-50\t{}",
        query, target, identity, bit_score
    )
}

/// Write a file into `dir` from lines
pub fn write_lines(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(&path, content).unwrap();
    path
}

/// Write a headed table; each row is `\t`-joined
pub fn write_table<R: AsRef<[&'static str]>>(
    dir: &Path,
    name: &str,
    header: &str,
    rows: &[R],
) -> PathBuf {
    let mut lines = vec![header.to_string()];
    lines.extend(rows.iter().map(|r| r.as_ref().join("\t")));
    write_lines(dir, name, &lines)
}

/// Standard classification rows used across the tests
pub fn standard_plastic_classes() -> Vec<[&'static str; 5]> {
    vec![
        ["PET", "Polyethylene terephthalate", "polyester", "non-biodegradable", "fossil"],
        ["PLA", "Polylactic acid", "polyester", "biodegradable", "bio-based"],
        ["PE", "Polyethylene", "C-C", "non-biodegradable", "fossil"],
        ["PHB", "Polyhydroxybutyrate", "polyester", "biodegradable", "bio-based"],
        ["PU", "Polyurethane", "urethane", "non-biodegradable", "NA"],
    ]
}

/// A temp directory with all three inputs for a small, fully-specified run.
///
/// Hits:
/// - q1 -> t1 (PET, PLA)
/// - q2 -> t2 (PE)
/// - q2 -> t3 (PET)
/// - q3 -> t4 (NYLON, unclassified)
/// - q4 -> t9 (no gene-type entry)
/// - q5 -> t5 (empty plastic field)
pub fn create_sample_inputs() -> (TempDir, InputPaths) {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let hits = write_lines(
        dir,
        "sample.tsv",
        &[
            hit_line("q1", "t1", 99.0, 500.0),
            hit_line("q2", "t2", 80.0, 300.0),
            hit_line("q2", "t3", 60.0, 100.0),
            hit_line("q3", "t4", 45.0, 90.0),
            hit_line("q4", "t9", 70.0, 200.0),
            hit_line("q5", "t5", 50.0, 80.0),
        ],
    );
    let gene_types = write_table(
        dir,
        "gene_types.tsv",
        GENE_TYPE_HEADER,
        &[
            &["t1", "petase", "PET,PLA"],
            &["t2", "alkB", "PE"],
            &["t3", "mhetase", "PET"],
            &["t4", "nylonase", "NYLON"],
            &["t5", "unknown", ""],
        ],
    );
    let plastic_classes = write_table(
        dir,
        "plastic_classes.tsv",
        PLASTIC_CLASS_HEADER,
        &standard_plastic_classes(),
    );

    (
        temp_dir,
        InputPaths {
            hits,
            gene_types,
            plastic_classes,
        },
    )
}

/// Default column names
pub fn columns() -> ColumnNames {
    ColumnNames::default()
}

/// Read a TSV output into rows of owned fields
pub fn read_tsv(path: &Path) -> Vec<Vec<String>> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| l.split('\t').map(str::to_string).collect())
        .collect()
}

/// Generate `n` random hits against `targets` labels
pub fn create_random_hits(n: usize, targets: usize) -> Vec<HitRecord> {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    (0..n)
        .map(|i| {
            hit(
                &format!("q{}", i % (n / 2 + 1)),
                &format!("t{}", rng.gen_range(0..targets)),
                rng.gen_range(30.0..100.0),
                rng.gen_range(50.0..800.0),
            )
        })
        .collect()
}
