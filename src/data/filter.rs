use anyhow::{Context, Result};
use regex::Regex;

use crate::config::TaxonQuery;

use super::model::{CellValue, Occurrence, OccurrenceTable};

// ---------------------------------------------------------------------------
// TaxonMatcher – compiled predicate over table rows
// ---------------------------------------------------------------------------

/// Compiled form of a [`TaxonQuery`]: one regex per spelling pattern,
/// applied to lower-cased cell text.
pub struct TaxonMatcher {
    label: &'static str,
    patterns: Vec<Regex>,
    candidate_columns: &'static [&'static str],
}

impl TaxonMatcher {
    pub fn compile(query: &TaxonQuery) -> Result<TaxonMatcher> {
        let patterns = query
            .patterns
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("compiling pattern {p:?}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(TaxonMatcher {
            label: query.label,
            patterns,
            candidate_columns: query.candidate_columns,
        })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn candidate_columns(&self) -> &'static [&'static str] {
        self.candidate_columns
    }

    /// Whether a single cell mentions the taxon. Non-text cells never
    /// match; text is lower-cased so the patterns stay lower-case.
    pub fn cell_matches(&self, cell: &CellValue) -> bool {
        let Some(text) = cell.as_text() else {
            return false;
        };
        let lowered = text.to_lowercase();
        self.patterns.iter().any(|p| p.is_match(&lowered))
    }

    /// Whether any candidate column of the row matches.
    pub fn row_matches(&self, row: &Occurrence) -> bool {
        self.candidate_columns
            .iter()
            .any(|col| self.cell_matches(row.cell(col)))
    }

    /// Boolean mask parallel to the table's rows.
    pub fn match_mask(&self, table: &OccurrenceTable) -> Vec<bool> {
        table.rows.iter().map(|row| self.row_matches(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> TaxonMatcher {
        TaxonMatcher::compile(&TaxonQuery::tyrannosaurus_rex()).unwrap()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn binomial_and_hyphenated_spellings_match() {
        let m = matcher();
        assert!(m.cell_matches(&text("Tyrannosaurus rex")));
        assert!(m.cell_matches(&text("T-Rex")));
        assert!(m.cell_matches(&text("t rex")));
        assert!(m.cell_matches(&text("tyrant lizard")));
    }

    #[test]
    fn token_pattern_has_no_word_boundary() {
        // "Trexus" carries an embedded t…rex prefix; the hyphen/space
        // pattern is a substring search, so it matches too.
        assert!(matcher().cell_matches(&text("Trexus")));
    }

    #[test]
    fn unrelated_taxa_do_not_match() {
        let m = matcher();
        assert!(!m.cell_matches(&text("Triceratops")));
        assert!(!m.cell_matches(&text("Edmontosaurus")));
    }

    #[test]
    fn non_text_cells_never_match() {
        let m = matcher();
        assert!(!m.cell_matches(&CellValue::Null));
        assert!(!m.cell_matches(&CellValue::Integer(1990)));
        assert!(!m.cell_matches(&CellValue::Float(45.5)));
    }

    #[test]
    fn mask_covers_candidate_columns_only() {
        let m = matcher();
        let mut hit = Occurrence::default();
        hit.cells
            .insert("genus".to_string(), text("Tyrannosaurus"));
        let mut miss = Occurrence::default();
        // A mention outside the candidate columns does not count.
        miss.cells
            .insert("occurrence_comments".to_string(), text("near the t-rex quarry"));

        let table = OccurrenceTable {
            columns: vec!["genus".to_string(), "occurrence_comments".to_string()],
            rows: vec![hit, miss],
        };
        assert_eq!(m.match_mask(&table), vec![true, false]);
    }
}
