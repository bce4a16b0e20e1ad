//! Result tables
//!
//! Turns the backend's uniform record list into display cells and provides
//! the truncated preview and plain-text grid used by the front ends.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A rectangular view of query results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    /// Build a table from backend records
    ///
    /// Columns follow the key order of the first record. Keys missing from a
    /// later record render as empty cells; keys only present in later records
    /// are ignored.
    pub fn from_records(records: &[Map<String, Value>]) -> Self {
        let columns: Vec<String> = records
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).map(format_cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Column headers
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All body rows
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of body rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether an inline view limited to `limit` rows hides any rows
    pub fn is_truncated(&self, limit: usize) -> bool {
        self.rows.len() > limit
    }

    /// The first `limit` rows
    pub fn preview(&self, limit: usize) -> &[Vec<String>] {
        &self.rows[..self.rows.len().min(limit)]
    }

    /// Render the first `limit` rows as an aligned plain-text grid
    pub fn render_text(&self, limit: usize) -> String {
        let rows = self.preview(limit);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, header)| {
                rows.iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&render_line(&self.columns, &widths));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        for row in rows {
            out.push('\n');
            out.push_str(&render_line(row, &widths));
        }
        if self.is_truncated(limit) {
            out.push_str(&format!(
                "\n({} of {} rows shown)",
                rows.len(),
                self.rows.len()
            ));
        }
        out
    }
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

/// Display text of a single JSON value
fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Map<String, Value>> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_single_row_table() {
        let table = ResultTable::from_records(&records(json!([
            {"player_name": "Virat Kohli", "total_runs": 825}
        ])));

        assert_eq!(table.columns(), ["player_name", "total_runs"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows()[0], vec!["Virat Kohli", "825"]);
    }

    #[test]
    fn test_cells_formatting() {
        let table = ResultTable::from_records(&records(json!([
            {"name": "AB de Villiers", "strike_rate": 151.68, "retired": true, "team": null},
            {"name": "Chris Gayle", "strike_rate": 148.96}
        ])));

        assert_eq!(table.rows()[0], vec!["AB de Villiers", "151.68", "true", ""]);
        assert_eq!(table.rows()[1], vec!["Chris Gayle", "148.96", "", ""]);
    }

    #[test]
    fn test_preview_and_truncation() {
        let rows: Vec<Value> = (0..20)
            .map(|i| json!({"player_id": i, "player_name": format!("Player {}", i)}))
            .collect();
        let table = ResultTable::from_records(&records(Value::Array(rows)));

        assert_eq!(table.row_count(), 20);
        assert!(table.is_truncated(5));
        assert_eq!(table.preview(5).len(), 5);
        assert!(!table.is_truncated(20));
        assert_eq!(table.preview(50).len(), 20);
    }

    #[test]
    fn test_render_text() {
        let table = ResultTable::from_records(&records(json!([
            {"team_name": "Gujarat Titans", "matches_won": 10},
            {"team_name": "Rajasthan Royals", "matches_won": 9}
        ])));

        let text = table.render_text(1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format!("{:<14} | matches_won", "team_name"));
        assert_eq!(lines[1], format!("{}-+-{}", "-".repeat(14), "-".repeat(11)));
        assert_eq!(lines[2], "Gujarat Titans | 10");
        assert_eq!(lines[3], "(1 of 2 rows shown)");
        assert!(!text.contains("Rajasthan Royals"));
    }
}
