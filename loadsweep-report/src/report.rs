//! Report Data Structures and Text Rendering

use loadsweep_core::{Measurement, SweepPoint};
use serde::Serialize;
use std::fmt::Write;

/// Column headers, matching the table the measurement scripts this harness
/// replaces used to print.
const HEADER: &str = "NITEMS\tALPHA\tTIME\tSPACE";

/// Width of the dash separator under the header.
const SEPARATOR_WIDTH: usize = 81;

/// Rendered in the value columns of a failed row.
const PLACEHOLDER: &str = "-";

/// What one invocation produced for its sweep point.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowOutcome {
    /// The pipeline ran and its output parsed.
    Measured(Measurement),
    /// The invocation failed; the reason is carried for the failure summary.
    Failed(String),
}

/// One sweep point paired with what its invocation produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    /// Item count of the measured point.
    pub items: u64,
    /// Load factor of the measured point.
    pub load_factor: f64,
    /// Measurement or recorded failure.
    pub outcome: RowOutcome,
}

/// Ordered, append-only collection of report rows.
///
/// Rows render in insertion order; the sweep executor inserts them in sweep
/// order, which is the only externally observable ordering invariant.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    /// Empty report.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append the outcome for one sweep point. O(1).
    pub fn push(&mut self, point: SweepPoint, outcome: RowOutcome) {
        self.rows.push(ReportRow {
            items: point.items,
            load_factor: point.load_factor,
            outcome,
        });
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Rows whose invocation failed, with their recorded reasons.
    pub fn failures(&self) -> impl Iterator<Item = (&ReportRow, &str)> {
        self.rows.iter().filter_map(|row| match &row.outcome {
            RowOutcome::Failed(reason) => Some((row, reason.as_str())),
            RowOutcome::Measured(_) => None,
        })
    }

    /// Render the final text: header, separator, one tab-delimited line per
    /// row. Rendering does not consume the report and is idempotent.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(HEADER);
        out.push('\n');
        out.push_str(&"-".repeat(SEPARATOR_WIDTH));
        out.push('\n');
        for row in &self.rows {
            let (time, space) = match &row.outcome {
                RowOutcome::Measured(m) => (m.elapsed.as_str(), m.peak_memory.as_str()),
                RowOutcome::Failed(_) => (PLACEHOLDER, PLACEHOLDER),
            };
            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}",
                row.items,
                format_load_factor(row.load_factor),
                time,
                space
            );
        }
        out
    }
}

/// Load factors print with at least one decimal place, so whole values render
/// as "1.0" rather than "1".
fn format_load_factor(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(elapsed: &str, peak: &str) -> RowOutcome {
        RowOutcome::Measured(Measurement {
            elapsed: elapsed.to_string(),
            peak_memory: peak.to_string(),
        })
    }

    fn point(items: u64, load_factor: f64) -> SweepPoint {
        SweepPoint { items, load_factor }
    }

    #[test]
    fn renders_header_separator_and_rows() {
        let mut report = Report::new();
        report.push(point(1, 0.5), measured("0.0021", "1024"));
        report.push(point(1, 0.75), measured("0.0030", "2048"));

        let text = report.render();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "NITEMS\tALPHA\tTIME\tSPACE");
        assert_eq!(lines[1], "-".repeat(81));
        assert_eq!(lines[2], "1\t0.5\t0.0021\t1024");
        assert_eq!(lines[3], "1\t0.75\t0.0030\t2048");
    }

    #[test]
    fn whole_load_factors_keep_a_decimal() {
        let mut report = Report::new();
        report.push(point(10, 1.0), measured("1", "2"));
        report.push(point(10, 16.0), measured("3", "4"));

        let text = report.render();
        assert!(text.contains("10\t1.0\t1\t2"));
        assert!(text.contains("10\t16.0\t3\t4"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut report = Report::new();
        report.push(point(1, 0.5), measured("0.1", "8"));
        report.push(point(1, 0.9), RowOutcome::Failed("boom".to_string()));

        assert_eq!(report.render(), report.render());
    }

    #[test]
    fn failed_rows_render_placeholders() {
        let mut report = Report::new();
        report.push(point(100, 2.0), RowOutcome::Failed("wrapper crashed".to_string()));

        let text = report.render();
        assert!(text.contains("100\t2.0\t-\t-"));

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].1, "wrapper crashed");
    }

    #[test]
    fn rows_keep_insertion_order() {
        let mut report = Report::new();
        for (i, &alpha) in loadsweep_core::LOAD_FACTORS.iter().enumerate() {
            report.push(point(10, alpha), measured(&format!("t{}", i), "1"));
        }

        let rendered = report.render();
        let data_lines: Vec<_> = rendered.lines().skip(2).collect();
        for (i, line) in data_lines.iter().enumerate() {
            assert!(
                line.contains(&format!("\tt{}\t", i)),
                "row {} out of order: {}",
                i,
                line
            );
        }
    }
}
