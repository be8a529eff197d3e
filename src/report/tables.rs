//! Tab-separated output tables
//!
//! Rows are materialized as polars DataFrames and written without quoting,
//! with absent values as `NA`.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::pipeline::{
    Aggregates, ColumnNames, Dimension, ExpandedHit, GroupSummary, PlasticTypeSummary,
    HIT_COLUMNS, NA,
};

/// One row per expanded hit: hit fields, plastic-type token, classification fields
pub fn annotated_frame(rows: &[ExpandedHit<'_>], columns: &ColumnNames) -> PolarsResult<DataFrame> {
    let text = |f: for<'r> fn(&'r ExpandedHit<'r>) -> &'r str| -> Vec<String> {
        rows.iter().map(|r| f(r).to_string()).collect()
    };
    let count = |f: fn(&ExpandedHit<'_>) -> u64| -> Vec<u64> { rows.iter().map(f).collect() };
    let number = |f: fn(&ExpandedHit<'_>) -> f64| -> Vec<f64> { rows.iter().map(f).collect() };
    let category = |f: for<'r> fn(&'r ExpandedHit<'r>) -> Option<&'r str>| -> Vec<Option<String>> {
        rows.iter().map(|r| f(r).map(str::to_string)).collect()
    };

    DataFrame::new(vec![
        Column::new(HIT_COLUMNS[0].into(), text(|r| &r.hit.query_id)),
        Column::new(HIT_COLUMNS[1].into(), text(|r| &r.hit.target_id)),
        Column::new(HIT_COLUMNS[2].into(), number(|r| r.hit.pct_identity)),
        Column::new(HIT_COLUMNS[3].into(), count(|r| r.hit.alignment_length)),
        Column::new(HIT_COLUMNS[4].into(), count(|r| r.hit.mismatches)),
        Column::new(HIT_COLUMNS[5].into(), count(|r| r.hit.gap_opens)),
        Column::new(HIT_COLUMNS[6].into(), count(|r| r.hit.query_start)),
        Column::new(HIT_COLUMNS[7].into(), count(|r| r.hit.query_end)),
        Column::new(HIT_COLUMNS[8].into(), count(|r| r.hit.target_start)),
        Column::new(HIT_COLUMNS[9].into(), count(|r| r.hit.target_end)),
        Column::new(HIT_COLUMNS[10].into(), number(|r| r.hit.evalue)),
        Column::new(HIT_COLUMNS[11].into(), number(|r| r.hit.bit_score)),
        Column::new(columns.plastic_type.as_str().into(), text(|r| r.plastic_type)),
        Column::new(columns.name.as_str().into(), category(|r| r.name())),
        Column::new(columns.backbone.as_str().into(), category(|r| r.backbone())),
        Column::new(columns.degradability.as_str().into(), category(|r| r.degradability())),
        Column::new(columns.feedstock.as_str().into(), category(|r| r.feedstock())),
    ])
}

/// Group table for backbone, degradability or feedstock
pub fn group_frame(
    dimension: Dimension,
    groups: &[GroupSummary],
    columns: &ColumnNames,
) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new(
            dimension.column_name(columns).into(),
            groups.iter().map(|g| g.key.clone()).collect::<Vec<String>>(),
        ),
        Column::new("hits".into(), groups.iter().map(|g| g.hits as u64).collect::<Vec<u64>>()),
        Column::new(
            "queries".into(),
            groups.iter().map(|g| g.queries as u64).collect::<Vec<u64>>(),
        ),
    ])
}

/// Plastic-type table with means and classification metadata
pub fn plastic_type_frame(
    groups: &[PlasticTypeSummary],
    columns: &ColumnNames,
) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new(
            columns.plastic_type.as_str().into(),
            groups.iter().map(|g| g.key.clone()).collect::<Vec<String>>(),
        ),
        Column::new("hits".into(), groups.iter().map(|g| g.hits as u64).collect::<Vec<u64>>()),
        Column::new(
            "queries".into(),
            groups.iter().map(|g| g.queries as u64).collect::<Vec<u64>>(),
        ),
        Column::new(
            "mean_identity".into(),
            groups.iter().map(|g| g.mean_identity).collect::<Vec<f64>>(),
        ),
        Column::new(
            "mean_bitscore".into(),
            groups.iter().map(|g| g.mean_bit_score).collect::<Vec<f64>>(),
        ),
        Column::new(
            columns.name.as_str().into(),
            groups.iter().map(|g| g.name.clone()).collect::<Vec<Option<String>>>(),
        ),
        Column::new(
            columns.backbone.as_str().into(),
            groups.iter().map(|g| g.backbone.clone()).collect::<Vec<Option<String>>>(),
        ),
    ])
}

/// Summary table of one dimension
pub fn dimension_frame(
    aggregates: &Aggregates,
    dimension: Dimension,
    columns: &ColumnNames,
) -> PolarsResult<DataFrame> {
    match dimension {
        Dimension::PlasticType => plastic_type_frame(&aggregates.plastic_types, columns),
        other => group_frame(other, aggregates.groups(other), columns),
    }
}

/// Write a DataFrame as a header-first, unquoted TSV file
pub fn write_tsv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b'\t')
        .with_quote_style(QuoteStyle::Never)
        .with_null_value(NA.to_string())
        .finish(df)
        .with_context(|| format!("Failed to write TSV file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{HitRecord, PlasticClassification};

    fn sample_hit() -> HitRecord {
        HitRecord {
            query_id: "q1".to_string(),
            target_id: "t1".to_string(),
            pct_identity: 99.5,
            alignment_length: 200,
            mismatches: 1,
            gap_opens: 0,
            query_start: 1,
            query_end: 200,
            target_start: 3,
            target_end: 202,
            evalue: 1e-40,
            bit_score: 400.0,
        }
    }

    #[test]
    fn test_annotated_frame_shape_and_nulls() {
        let hit = sample_hit();
        let pet = PlasticClassification {
            abbreviation: "PET".to_string(),
            name: Some("Polyethylene terephthalate".to_string()),
            backbone: Some("polyester".to_string()),
            degradability: None,
            feedstock: Some("fossil".to_string()),
        };
        let rows = vec![
            ExpandedHit { hit: &hit, plastic_type: "PET", classification: Some(&pet) },
            ExpandedHit { hit: &hit, plastic_type: "XYZ", classification: None },
        ];
        let df = annotated_frame(&rows, &ColumnNames::default()).unwrap();
        assert_eq!(df.shape(), (2, 17));
        assert_eq!(df.column("Name").unwrap().null_count(), 1);
        assert_eq!(df.column("Degradability").unwrap().null_count(), 2);
        assert_eq!(df.get_column_names()[12].as_str(), "Plastic");
    }

    #[test]
    fn test_empty_group_frame_keeps_header() {
        let df = group_frame(Dimension::Backbone, &[], &ColumnNames::default()).unwrap();
        assert_eq!(df.height(), 0);
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["Backbone", "hits", "queries"]);
    }

    #[test]
    fn test_write_tsv_unquoted_with_na() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.tsv");
        let groups = vec![PlasticTypeSummary {
            key: "PET".to_string(),
            hits: 2,
            queries: 1,
            mean_identity: 95.0,
            mean_bit_score: 300.0,
            name: Some("Polyethylene terephthalate, bottle grade".to_string()),
            backbone: None,
        }];
        let mut df = plastic_type_frame(&groups, &ColumnNames::default()).unwrap();
        write_tsv(&mut df, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "Plastic\thits\tqueries\tmean_identity\tmean_bitscore\tName\tBackbone"
        );
        assert!(lines[1].starts_with("PET\t2\t1\t"));
        assert!(lines[1].contains("\tPolyethylene terephthalate, bottle grade\t"));
        assert!(lines[1].ends_with("\tNA"));
        assert!(!content.contains('"'));
    }
}
