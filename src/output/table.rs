use comfy_table::{ContentArrangement, Table, presets::NOTHING};

use super::Report;

/// Space between columns
const COLUMN_GAP: u16 = 3;

pub struct TableFormatter;

impl TableFormatter {
    /// Borderless, left-aligned columns in the style of kubectl. Multi-line
    /// cells continue on the following lines within their column.
    pub fn format(report: &Report, no_headers: bool) -> String {
        let mut table = Table::new();
        table
            .load_preset(NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled);

        if !no_headers {
            table.set_header(&report.columns);
        }
        for row in &report.rows {
            table.add_row(row);
        }

        for column in table.column_iter_mut() {
            column.set_padding((0, COLUMN_GAP));
        }

        table
            .lines()
            .map(|line| line.trim_end().to_string())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
