//! Grouped summaries of the expanded hits
//!
//! Each dimension is summarized independently by a single accumulation
//! pass. Tables are sorted by hit count (descending), ties broken by key
//! (ascending), so repeated runs produce identical output.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use super::error::PipelineError;
use super::records::{ColumnNames, ExpandedHit, HitRecord, PlasticClassification, NA};

/// A categorical dimension the expanded hits are grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    PlasticType,
    Backbone,
    Degradability,
    Feedstock,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::PlasticType,
        Dimension::Backbone,
        Dimension::Degradability,
        Dimension::Feedstock,
    ];

    /// Short name used in output file names
    pub fn slug(&self) -> &'static str {
        match self {
            Dimension::PlasticType => "plastic",
            Dimension::Backbone => "backbone",
            Dimension::Degradability => "degradability",
            Dimension::Feedstock => "feedstock",
        }
    }

    /// Header of the key column for this dimension
    pub fn column_name<'c>(&self, columns: &'c ColumnNames) -> &'c str {
        match self {
            Dimension::PlasticType => &columns.plastic_type,
            Dimension::Backbone => &columns.backbone,
            Dimension::Degradability => &columns.degradability,
            Dimension::Feedstock => &columns.feedstock,
        }
    }

    /// Value of this dimension for one row, `None` when unclassified
    pub fn value<'a>(&self, row: &ExpandedHit<'a>) -> Option<&'a str> {
        match self {
            Dimension::PlasticType => Some(row.plastic_type),
            Dimension::Backbone => row.backbone(),
            Dimension::Degradability => row.degradability(),
            Dimension::Feedstock => row.feedstock(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::PlasticType => write!(f, "plastic type"),
            Dimension::Backbone => write!(f, "backbone type"),
            Dimension::Degradability => write!(f, "degradability"),
            Dimension::Feedstock => write!(f, "feedstock"),
        }
    }
}

/// Hit and distinct-query counts for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub hits: usize,
    pub queries: usize,
}

/// Per plastic type summary with score means and display metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlasticTypeSummary {
    pub key: String,
    pub hits: usize,
    pub queries: usize,
    pub mean_identity: f64,
    pub mean_bit_score: f64,
    pub name: Option<String>,
    pub backbone: Option<String>,
}

/// Whole-run counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineCounts {
    /// Hit rows loaded from the report
    pub total_hits: usize,
    /// Rows left after the gene-type join and plastic-type filter
    pub retained_rows: usize,
    /// Loaded hits with at least one row left after the join
    pub retained_hits: usize,
    /// Distinct query ids over all loaded hits
    pub distinct_queries: usize,
    /// Distinct target ids over all loaded hits
    pub distinct_targets: usize,
    /// Rows after plastic-type expansion and classification
    pub expanded_rows: usize,
    /// Distinct query ids among the expanded rows
    pub retained_queries: usize,
    /// Expanded rows whose token has no classification
    pub unclassified_rows: usize,
}

impl PipelineCounts {
    /// The informational empty-join condition, if it applies
    pub fn empty_join_warning(&self) -> Option<PipelineError> {
        (self.retained_rows == 0).then_some(PipelineError::EmptyJoinResult)
    }
}

/// All summary tables of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub plastic_types: Vec<PlasticTypeSummary>,
    pub backbone: Vec<GroupSummary>,
    pub degradability: Vec<GroupSummary>,
    pub feedstock: Vec<GroupSummary>,
    pub counts: PipelineCounts,
}

impl Aggregates {
    /// `(key, hits)` pairs of one dimension, in table order
    pub fn bars(&self, dimension: Dimension) -> Vec<(&str, usize)> {
        match dimension {
            Dimension::PlasticType => self
                .plastic_types
                .iter()
                .map(|g| (g.key.as_str(), g.hits))
                .collect(),
            other => self
                .groups(other)
                .iter()
                .map(|g| (g.key.as_str(), g.hits))
                .collect(),
        }
    }

    /// Generic group table for backbone, degradability or feedstock.
    ///
    /// The plastic-type table has its own shape; use `plastic_types`.
    pub fn groups(&self, dimension: Dimension) -> &[GroupSummary] {
        match dimension {
            Dimension::PlasticType => &[],
            Dimension::Backbone => &self.backbone,
            Dimension::Degradability => &self.degradability,
            Dimension::Feedstock => &self.feedstock,
        }
    }

    /// Number of groups in a dimension
    pub fn group_count(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::PlasticType => self.plastic_types.len(),
            other => self.groups(other).len(),
        }
    }

    /// Dimension with the most groups; the first one wins a tie
    pub fn widest_dimension(&self) -> Dimension {
        Dimension::ALL
            .into_iter()
            .rev()
            .max_by_key(|&d| self.group_count(d))
            .unwrap_or(Dimension::PlasticType)
    }
}

#[derive(Default)]
struct Accumulator<'a> {
    hits: usize,
    queries: HashSet<&'a str>,
    identity_sum: f64,
    bit_score_sum: f64,
    classification: Option<&'a PlasticClassification>,
}

impl<'a> Accumulator<'a> {
    fn add(&mut self, row: &ExpandedHit<'a>) {
        self.hits += 1;
        self.queries.insert(row.hit.query_id.as_str());
        self.identity_sum += row.hit.pct_identity;
        self.bit_score_sum += row.hit.bit_score;
        if self.classification.is_none() {
            self.classification = row.classification;
        }
    }
}

fn accumulate<'a>(rows: &[ExpandedHit<'a>], dimension: Dimension) -> HashMap<&'a str, Accumulator<'a>> {
    let mut groups: HashMap<&'a str, Accumulator<'a>> = HashMap::new();
    for row in rows {
        let key = dimension.value(row).unwrap_or(NA);
        groups.entry(key).or_default().add(row);
    }
    groups
}

/// Count hits and distinct queries per value of `dimension`.
///
/// Rows without a value for the dimension are counted under `NA`.
pub fn summarize_dimension(rows: &[ExpandedHit<'_>], dimension: Dimension) -> Vec<GroupSummary> {
    let mut summaries: Vec<GroupSummary> = accumulate(rows, dimension)
        .into_iter()
        .map(|(key, acc)| GroupSummary {
            key: key.to_string(),
            hits: acc.hits,
            queries: acc.queries.len(),
        })
        .collect();

    summaries.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.key.cmp(&b.key)));
    summaries
}

/// Summarize per plastic-type token with identity and bit score means.
///
/// Name and backbone come from the first classified row of each group.
pub fn summarize_plastic_types(rows: &[ExpandedHit<'_>]) -> Vec<PlasticTypeSummary> {
    let mut summaries: Vec<PlasticTypeSummary> = accumulate(rows, Dimension::PlasticType)
        .into_iter()
        .map(|(key, acc)| {
            let n = acc.hits as f64;
            PlasticTypeSummary {
                key: key.to_string(),
                hits: acc.hits,
                queries: acc.queries.len(),
                mean_identity: acc.identity_sum / n,
                mean_bit_score: acc.bit_score_sum / n,
                name: acc.classification.and_then(|c| c.name.clone()),
                backbone: acc.classification.and_then(|c| c.backbone.clone()),
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.key.cmp(&b.key)));
    summaries
}

/// Compute the whole-run counters
pub fn count_pipeline(
    hits: &[HitRecord],
    retained_rows: usize,
    rows: &[ExpandedHit<'_>],
) -> PipelineCounts {
    let distinct_queries: HashSet<&str> = hits.iter().map(|h| h.query_id.as_str()).collect();
    let distinct_targets: HashSet<&str> = hits.iter().map(|h| h.target_id.as_str()).collect();
    let retained_queries: HashSet<&str> = rows.iter().map(|r| r.hit.query_id.as_str()).collect();
    // Rows borrow their hit, so identity separates repeated hit lines
    let retained_hits: HashSet<*const HitRecord> =
        rows.iter().map(|r| r.hit as *const HitRecord).collect();

    PipelineCounts {
        total_hits: hits.len(),
        retained_rows,
        retained_hits: retained_hits.len(),
        distinct_queries: distinct_queries.len(),
        distinct_targets: distinct_targets.len(),
        expanded_rows: rows.len(),
        retained_queries: retained_queries.len(),
        unclassified_rows: rows.iter().filter(|r| r.classification.is_none()).count(),
    }
}

/// Build every summary table and the run counters
pub fn aggregate(hits: &[HitRecord], retained_rows: usize, rows: &[ExpandedHit<'_>]) -> Aggregates {
    Aggregates {
        plastic_types: summarize_plastic_types(rows),
        backbone: summarize_dimension(rows, Dimension::Backbone),
        degradability: summarize_dimension(rows, Dimension::Degradability),
        feedstock: summarize_dimension(rows, Dimension::Feedstock),
        counts: count_pipeline(hits, retained_rows, rows),
    }
}
