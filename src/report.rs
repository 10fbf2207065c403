use std::collections::BTreeSet;

use tracing::info;

use crate::config;
use crate::data::filter::TaxonMatcher;
use crate::data::model::OccurrenceTable;

// ---------------------------------------------------------------------------
// Match reporting (log sink only)
// ---------------------------------------------------------------------------

/// Log, per candidate column, how many rows matched and which distinct
/// values triggered the match. Columns with no matches stay quiet.
pub fn log_column_summaries(table: &OccurrenceTable, matcher: &TaxonMatcher) {
    info!(
        "analyzing taxonomic columns for {} mentions",
        matcher.label()
    );
    for &col in matcher.candidate_columns() {
        if !table.has_column(col) {
            continue;
        }
        let mut count = 0usize;
        let mut values = BTreeSet::new();
        for row in &table.rows {
            if matcher.cell_matches(row.cell(col)) {
                count += 1;
                values.insert(row.cell(col).to_string());
            }
        }
        if count == 0 {
            continue;
        }
        info!(column = col, entries = count, "found {} related entries", matcher.label());
        for value in &values {
            info!("  - {value}");
        }
    }
}

/// One formatted block per matched record: taxonomy, discovery
/// location and coordinates, collector, date, specimen details.
pub fn log_record_details(matched: &OccurrenceTable, label: &str) {
    info!(
        "total number of potential {label} records: {}",
        matched.len()
    );
    for (idx, row) in matched.rows.iter().enumerate() {
        info!("{}", "=".repeat(80));
        info!("record {}:", idx + 1);

        info!("accepted name: {}", row.cell("accepted_name"));
        info!("genus: {}", row.cell("genus"));

        for (column, label) in config::DISCOVERY_COLUMNS {
            info!("{label}: {}", row.cell(column));
        }
        for (column, label) in config::INTERVAL_COLUMNS {
            info!("{label}: {}", row.cell(column));
        }

        for (column, label) in config::COMMENT_COLUMNS {
            let cell = row.cell(column);
            if !cell.is_null() {
                info!("{label}: {cell}");
            }
        }
    }
}
