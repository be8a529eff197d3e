//! Typed rows for the three input tables and the expanded join output

use serde::Serialize;

/// Column names of the aligner's tabular report, in file order.
pub const HIT_COLUMNS: [&str; 12] = [
    "qseqid", "sseqid", "pident", "length", "mismatch", "gapopen", "qstart", "qend", "sstart",
    "send", "evalue", "bitscore",
];

/// Placeholder written for absent categorical values.
pub const NA: &str = "NA";

/// One pairwise alignment from the hit report
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    pub query_id: String,
    pub target_id: String,
    pub pct_identity: f64,
    pub alignment_length: u64,
    pub mismatches: u64,
    pub gap_opens: u64,
    pub query_start: u64,
    pub query_end: u64,
    pub target_start: u64,
    pub target_end: u64,
    pub evalue: f64,
    pub bit_score: f64,
}

/// One row of the gene-type table.
///
/// `plastic_type` holds the raw comma-delimited field; `None` when the
/// field was empty or `NA`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneTypeAnnotation {
    pub label: String,
    pub plastic_type: Option<String>,
}

/// One row of the plastic classification table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlasticClassification {
    pub abbreviation: String,
    pub name: Option<String>,
    pub backbone: Option<String>,
    pub degradability: Option<String>,
    pub feedstock: Option<String>,
}

/// A hit joined to one gene-type annotation row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedHit<'a> {
    pub hit: &'a HitRecord,
    /// Raw plastic-type field, guaranteed present
    pub plastic_type: &'a str,
}

/// A hit carrying exactly one plastic-type token and its classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandedHit<'a> {
    pub hit: &'a HitRecord,
    pub plastic_type: &'a str,
    /// `None` when the token has no row in the classification table
    pub classification: Option<&'a PlasticClassification>,
}

impl<'a> ExpandedHit<'a> {
    pub fn name(&self) -> Option<&'a str> {
        self.classification.and_then(|c| c.name.as_deref())
    }

    pub fn backbone(&self) -> Option<&'a str> {
        self.classification.and_then(|c| c.backbone.as_deref())
    }

    pub fn degradability(&self) -> Option<&'a str> {
        self.classification.and_then(|c| c.degradability.as_deref())
    }

    pub fn feedstock(&self) -> Option<&'a str> {
        self.classification.and_then(|c| c.feedstock.as_deref())
    }
}

/// Header names used to locate columns in the two annotation tables.
///
/// The same names are used as column headers in the written outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnNames {
    pub label: String,
    pub plastic_type: String,
    pub abbreviation: String,
    pub name: String,
    pub backbone: String,
    pub degradability: String,
    pub feedstock: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            label: "Label".to_string(),
            plastic_type: "Plastic".to_string(),
            abbreviation: "Abbreviation".to_string(),
            name: "Name".to_string(),
            backbone: "Backbone".to_string(),
            degradability: "Degradability".to_string(),
            feedstock: "Feedstock".to_string(),
        }
    }
}
