//! Gene-type join, plastic-type expansion and classification join
//!
//! Both joins use an explicit hash index from key to every matching row,
//! so duplicate keys fan out instead of being collapsed.

use std::collections::HashMap;

use log::debug;

use super::records::{
    AnnotatedHit, ExpandedHit, GeneTypeAnnotation, HitRecord, PlasticClassification,
};

/// Split a multi-value plastic-type field into tokens.
///
/// Splits on a comma followed by optional whitespace. Tokens are trimmed
/// and empty tokens are kept, so `"PET,,PLA"` yields three tokens and a
/// field without commas always yields exactly one.
pub fn split_plastic_types(field: &str) -> impl Iterator<Item = &str> {
    field.split(',').map(str::trim)
}

/// Index rows by a borrowed key, keeping every row for a repeated key.
///
/// Rows under one key stay in table order.
fn build_index<'a, T, F>(rows: &'a [T], key: F) -> HashMap<&'a str, Vec<&'a T>>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut index: HashMap<&'a str, Vec<&'a T>> = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(key(row)).or_default().push(row);
    }
    index
}

/// Join hits to gene-type annotations on target id = label.
///
/// A hit matching `k` annotation rows yields `k` rows. Hits with no match
/// and rows whose plastic-type field is absent are dropped.
pub fn join_gene_types<'a>(
    hits: &'a [HitRecord],
    gene_types: &'a [GeneTypeAnnotation],
) -> Vec<AnnotatedHit<'a>> {
    let index = build_index(gene_types, |g| g.label.as_str());
    let mut unmatched = 0usize;
    let mut unannotated = 0usize;

    let mut joined = Vec::with_capacity(hits.len());
    for hit in hits {
        let Some(matches) = index.get(hit.target_id.as_str()) else {
            unmatched += 1;
            continue;
        };
        for &annotation in matches {
            match annotation.plastic_type.as_deref() {
                Some(plastic_type) => joined.push(AnnotatedHit { hit, plastic_type }),
                None => unannotated += 1,
            }
        }
    }

    debug!(
        "gene-type join: {} hits in, {} rows out ({} without a label match, {} rows without a plastic type)",
        hits.len(),
        joined.len(),
        unmatched,
        unannotated
    );
    joined
}

/// Expand each joined row into one row per plastic-type token.
///
/// The returned pairs are `(hit, token)`; order follows the input rows,
/// then the token order within each field.
pub fn expand_plastic_types<'a>(rows: &[AnnotatedHit<'a>]) -> Vec<(&'a HitRecord, &'a str)> {
    let mut expanded = Vec::with_capacity(rows.len());
    for row in rows {
        expanded.extend(split_plastic_types(row.plastic_type).map(|token| (row.hit, token)));
    }
    expanded
}

/// Left-join expanded rows to the classification table on token = abbreviation.
///
/// Unmatched tokens keep their row with no classification; duplicate
/// abbreviations fan out.
pub fn classify<'a>(
    expanded: &[(&'a HitRecord, &'a str)],
    classes: &'a [PlasticClassification],
) -> Vec<ExpandedHit<'a>> {
    let index = build_index(classes, |c| c.abbreviation.as_str());

    let mut classified = Vec::with_capacity(expanded.len());
    for &(hit, plastic_type) in expanded {
        match index.get(plastic_type) {
            Some(matches) => classified.extend(matches.iter().map(|&c| ExpandedHit {
                hit,
                plastic_type,
                classification: Some(c),
            })),
            None => classified.push(ExpandedHit {
                hit,
                plastic_type,
                classification: None,
            }),
        }
    }
    classified
}

/// Classified rows of one join stage
#[derive(Debug, Clone)]
pub struct JoinedHits<'a> {
    pub rows: Vec<ExpandedHit<'a>>,
    /// Rows left after the gene-type join and filter, before expansion
    pub retained_rows: usize,
}

/// Run both joins and the expansion in order
pub fn join_and_expand<'a>(
    hits: &'a [HitRecord],
    gene_types: &'a [GeneTypeAnnotation],
    classes: &'a [PlasticClassification],
) -> JoinedHits<'a> {
    let joined = join_gene_types(hits, gene_types);
    let expanded = expand_plastic_types(&joined);
    JoinedHits {
        rows: classify(&expanded, classes),
        retained_rows: joined.len(),
    }
}
