//! Tests for grouped summaries and whole-run counts

mod common;

use common::*;
use plastanno::pipeline::{
    join_and_expand, load_inputs, summarize_dimension, Dimension, GeneTypeAnnotation, Inputs,
    PipelineRun, PlasticClassification, NA,
};
use plastanno::report::RunSummary;

fn sample_inputs() -> Inputs {
    let (_temp_dir, paths) = create_sample_inputs();
    load_inputs(&paths, &columns()).unwrap()
}

#[test]
fn test_plastic_type_summary() {
    let inputs = sample_inputs();
    let result = run(&inputs);
    let plastics = &result.aggregates.plastic_types;

    let keys: Vec<&str> = plastics.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["PET", "NYLON", "PE", "PLA"]);

    let pet = &plastics[0];
    assert_eq!(pet.hits, 2);
    assert_eq!(pet.queries, 2);
    assert!((pet.mean_identity - 79.5).abs() < 1e-9);
    assert!((pet.mean_bit_score - 300.0).abs() < 1e-9);
    assert_eq!(pet.name.as_deref(), Some("Polyethylene terephthalate"));
    assert_eq!(pet.backbone.as_deref(), Some("polyester"));

    let nylon = &plastics[1];
    assert_eq!(nylon.name, None);
    assert_eq!(nylon.backbone, None);
}

#[test]
fn test_categorical_dimensions_with_na_bucket() {
    let inputs = sample_inputs();
    let result = run(&inputs);
    let aggregates = &result.aggregates;

    assert_eq!(
        aggregates.bars(Dimension::Backbone),
        vec![("polyester", 3), ("C-C", 1), (NA, 1)]
    );
    assert_eq!(
        aggregates.bars(Dimension::Degradability),
        vec![("non-biodegradable", 3), (NA, 1), ("biodegradable", 1)]
    );
    assert_eq!(
        aggregates.bars(Dimension::Feedstock),
        vec![("fossil", 3), (NA, 1), ("bio-based", 1)]
    );

    let polyester = &aggregates.backbone[0];
    assert_eq!(polyester.queries, 2);
}

#[test]
fn test_group_hits_sum_to_expanded_rows() {
    let inputs = sample_inputs();
    let result = run(&inputs);

    for dimension in Dimension::ALL {
        let total: usize = result.aggregates.bars(dimension).iter().map(|(_, n)| n).sum();
        assert_eq!(total, result.rows.len(), "{} totals", dimension);
    }
}

#[test]
fn test_pipeline_counts() {
    let inputs = sample_inputs();
    let counts = run(&inputs).aggregates.counts;

    assert_eq!(counts.total_hits, 6);
    assert_eq!(counts.retained_rows, 4);
    assert_eq!(counts.retained_hits, 4);
    assert_eq!(counts.distinct_queries, 5);
    assert_eq!(counts.distinct_targets, 6);
    assert_eq!(counts.expanded_rows, 5);
    assert_eq!(counts.retained_queries, 3);
    assert_eq!(counts.unclassified_rows, 1);
    assert!(counts.empty_join_warning().is_none());
}

#[test]
fn test_empty_join_gives_empty_tables() {
    let hits = vec![hit("q1", "t9", 90.0, 100.0)];
    let gene_types = vec![GeneTypeAnnotation {
        label: "t1".to_string(),
        plastic_type: Some("PET".to_string()),
    }];
    let classes: Vec<PlasticClassification> = Vec::new();

    let joined = join_and_expand(&hits, &gene_types, &classes);
    let aggregates = PipelineRun::from_joined(&hits, joined).aggregates;

    for dimension in Dimension::ALL {
        assert_eq!(aggregates.group_count(dimension), 0);
    }
    assert_eq!(aggregates.counts.total_hits, 1);
    assert_eq!(aggregates.counts.retained_rows, 0);
    assert_eq!(aggregates.counts.distinct_targets, 1);
    assert!(aggregates.counts.empty_join_warning().is_some());
}

#[test]
fn test_ties_break_on_ascending_key() {
    let hits = vec![
        hit("q1", "t1", 90.0, 100.0),
        hit("q2", "t2", 90.0, 100.0),
        hit("q3", "t3", 90.0, 100.0),
    ];
    let gene_types = vec![
        GeneTypeAnnotation {
            label: "t1".to_string(),
            plastic_type: Some("PU".to_string()),
        },
        GeneTypeAnnotation {
            label: "t2".to_string(),
            plastic_type: Some("PE".to_string()),
        },
        GeneTypeAnnotation {
            label: "t3".to_string(),
            plastic_type: Some("PA".to_string()),
        },
    ];

    let joined = join_and_expand(&hits, &gene_types, &[]);
    let groups = summarize_dimension(&joined.rows, Dimension::PlasticType);
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["PA", "PE", "PU"]);
}

#[test]
fn test_widest_dimension_for_charts() {
    let inputs = sample_inputs();
    let result = run(&inputs);
    assert_eq!(result.aggregates.widest_dimension(), Dimension::PlasticType);
}

#[test]
fn test_duplicate_labels_keep_retention_within_hits() {
    let hits = vec![hit("q1", "t1", 90.0, 100.0), hit("q2", "t9", 90.0, 100.0)];
    let gene_types: Vec<GeneTypeAnnotation> = ["PET", "PLA", "PU"]
        .iter()
        .map(|plastic| GeneTypeAnnotation {
            label: "t1".to_string(),
            plastic_type: Some(plastic.to_string()),
        })
        .collect();

    let joined = join_and_expand(&hits, &gene_types, &[]);
    let counts = PipelineRun::from_joined(&hits, joined).aggregates.counts;
    assert_eq!(counts.retained_rows, 3);
    assert_eq!(counts.retained_hits, 1);

    let summary = RunSummary::new(counts);
    assert!((summary.retention_pct() - 50.0).abs() < 1e-9);
}
