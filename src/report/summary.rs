//! Run summary tables for the terminal

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{Aggregates, Dimension, PipelineCounts};

/// Counters and step timings of a finished run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub counts: PipelineCounts,
    pub load_time: Duration,
    pub join_time: Duration,
    pub aggregate_time: Duration,
    pub save_time: Duration,
}

impl RunSummary {
    pub fn new(counts: PipelineCounts) -> Self {
        Self {
            counts,
            ..Default::default()
        }
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_join_time(&mut self, elapsed: Duration) {
        self.join_time = elapsed;
    }

    pub fn set_aggregate_time(&mut self, elapsed: Duration) {
        self.aggregate_time = elapsed;
    }

    pub fn set_save_time(&mut self, elapsed: Duration) {
        self.save_time = elapsed;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.join_time + self.aggregate_time + self.save_time
    }

    /// Share of loaded hits with at least one annotated row, in percent
    pub fn retention_pct(&self) -> f64 {
        if self.counts.total_hits > 0 {
            (self.counts.retained_hits as f64 / self.counts.total_hits as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        let counts = &self.counts;
        table.add_row(vec![Cell::new("📁 Hits loaded"), Cell::new(counts.total_hits)]);
        table.add_row(vec![
            Cell::new("🔎 Distinct queries"),
            Cell::new(counts.distinct_queries),
        ]);
        table.add_row(vec![
            Cell::new("🎯 Distinct targets"),
            Cell::new(counts.distinct_targets),
        ]);
        table.add_row(vec![
            Cell::new("🔗 Rows after gene-type join"),
            Cell::new(counts.retained_rows).fg(if counts.retained_rows == 0 {
                Color::Red
            } else {
                Color::Green
            }),
        ]);
        table.add_row(vec![
            Cell::new("🧩 Rows after expansion"),
            Cell::new(counts.expanded_rows),
        ]);
        table.add_row(vec![
            Cell::new("❔ Unclassified rows"),
            Cell::new(counts.unclassified_rows).fg(if counts.unclassified_rows == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new("✅ Annotated queries"),
            Cell::new(counts.retained_queries)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        let retention = self.retention_pct();
        let color = if retention > 50.0 {
            Color::Green
        } else if retention > 10.0 {
            Color::Yellow
        } else {
            Color::Cyan
        };
        table.add_row(vec![
            Cell::new("📈 Hit retention"),
            Cell::new(format!("{:.1}%", retention))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("⏱  Total time"),
            Cell::new(format!("{:.2}s", self.total_time().as_secs_f64())),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

/// Print the leading groups of one dimension
pub fn display_top_groups(aggregates: &Aggregates, dimension: Dimension, limit: usize) {
    let bars = aggregates.bars(dimension);
    if bars.is_empty() {
        return;
    }

    println!();
    println!(
        "      {} {}",
        style(format!("By {}", dimension)).yellow(),
        style(format!("({} groups)", bars.len())).dim()
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Group").add_attribute(Attribute::Bold),
        Cell::new("Hits").add_attribute(Attribute::Bold),
    ]);
    for (key, hits) in bars.iter().take(limit) {
        table.add_row(vec![
            Cell::new(if key.is_empty() { "(empty)" } else { *key }),
            Cell::new(hits).set_alignment(CellAlignment::Right),
        ]);
    }

    for line in table.to_string().lines() {
        println!("      {}", line);
    }
}
