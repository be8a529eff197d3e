//! Loaders for the hit report and the two annotation tables
//!
//! All three inputs are tab-separated. The hit report has no header and a
//! fixed column order; the annotation tables have a header and their
//! columns are located by name.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use log::debug;

use super::error::{PipelineError, PipelineResult};
use super::records::{
    ColumnNames, GeneTypeAnnotation, HitRecord, PlasticClassification, HIT_COLUMNS, NA,
};

const BOM: char = '\u{feff}';

/// Read the aligner's tabular hit report from a file
pub fn read_hits(path: &Path) -> PipelineResult<Vec<HitRecord>> {
    let source_name = path.display().to_string();
    let file = open(path, &source_name)?;
    parse_hits(file, &source_name)
}

/// Parse a hit report from any reader.
///
/// Blank lines and `#` comment lines are skipped, so reports written with
/// comment headers load the same way as plain ones.
pub fn parse_hits<R: Read>(reader: R, source_name: &str) -> PipelineResult<Vec<HitRecord>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(false)
        .comment(Some(b'#'))
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut hits = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| csv_error(source_name, e))?;
        let line = line_of(&record);

        // The reader only checks rows against the first one
        if record.len() != HIT_COLUMNS.len() {
            return Err(PipelineError::MalformedInput {
                source_name: source_name.to_string(),
                line,
                expected: HIT_COLUMNS.len(),
                found: record.len(),
            });
        }

        let field = FieldReader {
            source_name,
            line,
            fields: &record,
        };

        hits.push(HitRecord {
            query_id: field.text(0),
            target_id: field.text(1),
            pct_identity: field.percentage(2)?,
            alignment_length: field.count(3)?,
            mismatches: field.count(4)?,
            gap_opens: field.count(5)?,
            query_start: field.count(6)?,
            query_end: field.count(7)?,
            target_start: field.count(8)?,
            target_end: field.count(9)?,
            evalue: field.non_negative(10)?,
            bit_score: field.non_negative(11)?,
        });
    }

    debug!("{}: loaded {} hits", source_name, hits.len());
    Ok(hits)
}

/// Read the gene-type annotation table from a file
pub fn read_gene_types(path: &Path, columns: &ColumnNames) -> PipelineResult<Vec<GeneTypeAnnotation>> {
    let source_name = path.display().to_string();
    let file = open(path, &source_name)?;
    parse_gene_types(file, &source_name, columns)
}

/// Parse a gene-type annotation table with a header row
pub fn parse_gene_types<R: Read>(
    reader: R,
    source_name: &str,
    columns: &ColumnNames,
) -> PipelineResult<Vec<GeneTypeAnnotation>> {
    let required = [columns.label.as_str(), columns.plastic_type.as_str()];
    let rows = parse_table(reader, source_name, &required, |values| GeneTypeAnnotation {
        label: values[0].to_string(),
        plastic_type: categorical(values[1]),
    })?;

    debug!("{}: loaded {} gene-type annotations", source_name, rows.len());
    Ok(rows)
}

/// Read the plastic classification table from a file
pub fn read_plastic_classes(
    path: &Path,
    columns: &ColumnNames,
) -> PipelineResult<Vec<PlasticClassification>> {
    let source_name = path.display().to_string();
    let file = open(path, &source_name)?;
    parse_plastic_classes(file, &source_name, columns)
}

/// Parse a plastic classification table with a header row
pub fn parse_plastic_classes<R: Read>(
    reader: R,
    source_name: &str,
    columns: &ColumnNames,
) -> PipelineResult<Vec<PlasticClassification>> {
    let required = [
        columns.abbreviation.as_str(),
        columns.name.as_str(),
        columns.backbone.as_str(),
        columns.degradability.as_str(),
        columns.feedstock.as_str(),
    ];
    let rows = parse_table(reader, source_name, &required, |values| PlasticClassification {
        abbreviation: values[0].to_string(),
        name: categorical(values[1]),
        backbone: categorical(values[2]),
        degradability: categorical(values[3]),
        feedstock: categorical(values[4]),
    })?;

    debug!("{}: loaded {} plastic classifications", source_name, rows.len());
    Ok(rows)
}

/// Normalize a categorical cell: blank and `NA` both mean absent
pub fn categorical(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == NA {
        None
    } else {
        Some(value.to_string())
    }
}

fn open(path: &Path, source_name: &str) -> PipelineResult<File> {
    File::open(path).map_err(|e| PipelineError::io(source_name, e))
}

/// Parse a headed table, handing `build` the `required` columns of each row in order.
///
/// Every required column is resolved before the first data row is read.
fn parse_table<R, T, F>(
    reader: R,
    source_name: &str,
    required: &[&str],
    mut build: F,
) -> PipelineResult<Vec<T>>
where
    R: Read,
    F: FnMut(&[&str]) -> T,
{
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let header: Vec<String> = rdr
        .headers()
        .map_err(|e| csv_error(source_name, e))?
        .iter()
        .map(|h| h.trim_start_matches(BOM).trim().to_string())
        .collect();

    let indices = required
        .iter()
        .map(|name| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| PipelineError::MissingColumn {
                    source_name: source_name.to_string(),
                    column: name.to_string(),
                    available: header.clone(),
                })
        })
        .collect::<PipelineResult<Vec<usize>>>()?;

    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| csv_error(source_name, e))?;
        let values: Vec<&str> = indices.iter().map(|&i| &record[i]).collect();
        rows.push(build(&values));
    }

    Ok(rows)
}

/// Map a reader error onto the pipeline's error kinds
fn csv_error(source_name: &str, err: csv::Error) -> PipelineError {
    if let ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return PipelineError::MalformedInput {
            source_name: source_name.to_string(),
            line: pos.as_ref().map_or(0, |p| p.line() as usize),
            expected: *expected_len as usize,
            found: *len as usize,
        };
    }
    PipelineError::io(source_name, err.into())
}

fn line_of(record: &StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}

/// Typed access to the fields of one hit report line
struct FieldReader<'a> {
    source_name: &'a str,
    line: usize,
    fields: &'a StringRecord,
}

impl FieldReader<'_> {
    fn text(&self, index: usize) -> String {
        self.fields[index].trim_start_matches(BOM).to_string()
    }

    fn percentage(&self, index: usize) -> PipelineResult<f64> {
        self.bounded(index, "a percentage between 0 and 100", |v| {
            (0.0..=100.0).contains(&v)
        })
    }

    fn non_negative(&self, index: usize) -> PipelineResult<f64> {
        self.bounded(index, "a non-negative number", |v| v >= 0.0)
    }

    fn count(&self, index: usize) -> PipelineResult<u64> {
        self.parse(index, "a non-negative integer")
    }

    /// Parse a finite float and check it against `accept`
    fn bounded(
        &self,
        index: usize,
        expected: &'static str,
        accept: impl Fn(f64) -> bool,
    ) -> PipelineResult<f64> {
        let value: f64 = self.parse(index, expected)?;
        if value.is_finite() && accept(value) {
            Ok(value)
        } else {
            Err(self.mismatch(index, expected))
        }
    }

    fn parse<T: FromStr>(&self, index: usize, expected: &'static str) -> PipelineResult<T> {
        self.fields[index]
            .parse::<T>()
            .map_err(|_| self.mismatch(index, expected))
    }

    fn mismatch(&self, index: usize, expected: &'static str) -> PipelineError {
        PipelineError::TypeMismatch {
            source_name: self.source_name.to_string(),
            line: self.line,
            column: HIT_COLUMNS[index].to_string(),
            value: self.fields[index].to_string(),
            expected,
        }
    }
}
