//! Plastanno: plastic-degrading enzyme hit annotation
//!
//! Joins tabular alignment hits against a gene-type table and a plastic
//! classification table, expands multi-plastic labels and summarizes the
//! result by plastic type, backbone, degradability and feedstock.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
