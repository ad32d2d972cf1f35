//! JSON Output

use crate::report::Report;

/// Generate a prettified JSON rendering of the report.
///
/// Serializes the same rows the text table shows, in the same order.
pub fn render_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RowOutcome;
    use loadsweep_core::{Measurement, SweepPoint};

    #[test]
    fn json_carries_rows_in_order() {
        let mut report = Report::new();
        report.push(
            SweepPoint { items: 1, load_factor: 0.5 },
            RowOutcome::Measured(Measurement {
                elapsed: "0.1".to_string(),
                peak_memory: "64".to_string(),
            }),
        );
        report.push(
            SweepPoint { items: 1, load_factor: 0.75 },
            RowOutcome::Failed("no such wrapper".to_string()),
        );

        let json = render_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let rows = value["rows"].as_array().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["items"], 1);
        assert_eq!(rows[0]["outcome"]["measured"]["elapsed"], "0.1");
        assert_eq!(rows[1]["outcome"]["failed"], "no such wrapper");
    }
}
