//! SVG bar charts of the summary tables

use std::path::Path;

use anyhow::{Context, Result};
use svg::node::element::{Line, Rectangle, Text};
use svg::Document;

const CHART_WIDTH: f64 = 760.0;
const LABEL_WIDTH: f64 = 200.0;
const COUNT_WIDTH: f64 = 60.0;
const TITLE_HEIGHT: f64 = 48.0;
const BAR_HEIGHT: f64 = 22.0;
const BAR_GAP: f64 = 6.0;
const MARGIN: f64 = 16.0;
const MAX_LABEL_CHARS: usize = 28;

/// Render `(key, count)` pairs as a horizontal bar chart.
///
/// Bars keep the given order; `limit` keeps only the first entries.
pub fn render_bar_chart(title: &str, bars: &[(&str, usize)], limit: Option<usize>) -> Document {
    let shown = &bars[..limit.map_or(bars.len(), |n| n.min(bars.len()))];
    let max_count = shown.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1) as f64;

    let plot_left = MARGIN + LABEL_WIDTH;
    let plot_width = CHART_WIDTH - plot_left - COUNT_WIDTH - MARGIN;
    let height = TITLE_HEIGHT + shown.len().max(1) as f64 * (BAR_HEIGHT + BAR_GAP) + MARGIN;

    let mut doc = Document::new()
        .set("viewBox", (0, 0, CHART_WIDTH, height))
        .set("width", CHART_WIDTH)
        .set("height", height)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", CHART_WIDTH)
                .set("height", height)
                .set("fill", "#ffffff"),
        )
        .add(
            Text::new(title)
                .set("x", MARGIN)
                .set("y", MARGIN + 14.0)
                .set("font-family", "sans-serif")
                .set("font-size", 16)
                .set("font-weight", "bold")
                .set("fill", "#111827"),
        )
        .add(
            Line::new()
                .set("x1", plot_left)
                .set("y1", TITLE_HEIGHT - BAR_GAP)
                .set("x2", plot_left)
                .set("y2", height - MARGIN)
                .set("stroke", "#9ca3af")
                .set("stroke-width", 1),
        );

    if shown.is_empty() {
        return doc.add(
            Text::new("no hits")
                .set("x", plot_left + 8.0)
                .set("y", TITLE_HEIGHT + BAR_HEIGHT * 0.7)
                .set("font-family", "sans-serif")
                .set("font-size", 12)
                .set("fill", "#6b7280"),
        );
    }

    for (i, (key, count)) in shown.iter().enumerate() {
        let y = TITLE_HEIGHT + i as f64 * (BAR_HEIGHT + BAR_GAP);
        let width = plot_width * (*count as f64 / max_count);
        let text_y = y + BAR_HEIGHT * 0.7;

        doc = doc
            .add(
                Text::new(truncate_label(key))
                    .set("x", plot_left - 8.0)
                    .set("y", text_y)
                    .set("text-anchor", "end")
                    .set("font-family", "sans-serif")
                    .set("font-size", 12)
                    .set("fill", "#1f2937"),
            )
            .add(
                Rectangle::new()
                    .set("x", plot_left)
                    .set("y", y)
                    .set("width", width)
                    .set("height", BAR_HEIGHT)
                    .set("fill", "#0e7490"),
            )
            .add(
                Text::new(count.to_string())
                    .set("x", plot_left + width + 6.0)
                    .set("y", text_y)
                    .set("font-family", "monospace")
                    .set("font-size", 12)
                    .set("fill", "#374151"),
            );
    }

    doc
}

/// Save a chart to disk
pub fn save_chart(doc: &Document, path: &Path) -> Result<()> {
    svg::save(path, doc).with_context(|| format!("Failed to write chart: {}", path.display()))
}

fn truncate_label(key: &str) -> String {
    if key.is_empty() {
        return "(empty)".to_string();
    }
    if key.chars().count() <= MAX_LABEL_CHARS {
        key.to_string()
    } else {
        let head: String = key.chars().take(MAX_LABEL_CHARS - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_bars(doc: &Document) -> usize {
        // One background rectangle plus one per bar
        doc.to_string().matches("<rect").count() - 1
    }

    /// Trimmed content of every `<text>` element, in document order
    fn text_nodes(doc: &Document) -> Vec<String> {
        doc.to_string()
            .split("</text>")
            .filter_map(|chunk| chunk.rsplit_once('>'))
            .map(|(_, text)| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }

    #[test]
    fn test_one_bar_per_entry() {
        let doc = render_bar_chart("Hits", &[("PET", 5), ("PLA", 2), ("NA", 1)], None);
        assert_eq!(count_bars(&doc), 3);
        let texts = text_nodes(&doc);
        assert!(texts.iter().any(|t| t == "PET"));
        assert!(texts.iter().any(|t| t == "5"));
    }

    #[test]
    fn test_limit_keeps_leading_entries() {
        let bars: Vec<(String, usize)> = (0..30).map(|i| (format!("P{i}"), 30 - i)).collect();
        let refs: Vec<(&str, usize)> = bars.iter().map(|(k, n)| (k.as_str(), *n)).collect();
        let doc = render_bar_chart("Hits", &refs, Some(20));
        assert_eq!(count_bars(&doc), 20);
        let texts = text_nodes(&doc);
        assert!(texts.iter().any(|t| t == "P19"));
        assert!(!texts.iter().any(|t| t == "P20"));
    }

    #[test]
    fn test_empty_chart_renders_placeholder() {
        let doc = render_bar_chart("Hits", &[], Some(20));
        assert_eq!(count_bars(&doc), 0);
        assert!(doc.to_string().contains("no hits"));
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label(""), "(empty)");
        assert_eq!(truncate_label("PET"), "PET");
        let long = "x".repeat(40);
        assert_eq!(truncate_label(&long).chars().count(), MAX_LABEL_CHARS);
    }
}
