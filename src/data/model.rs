use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the occurrence table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell. PBDB dumps mix free text, integer ids,
/// coordinates, and plenty of empty fields in the same table.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Guess the cell type from its raw CSV text.
    pub fn parse(raw: &str) -> CellValue {
        if raw.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(v) = raw.parse::<f64>() {
            return CellValue::Float(v);
        }
        CellValue::Text(raw.to_string())
    }

    /// Try to interpret the value as an `f64` (coordinates, ages).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Render for CSV output. Unlike [`fmt::Display`], a null cell maps
    /// back to the empty field it was read from.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Occurrence – one row of the table
// ---------------------------------------------------------------------------

/// Shared null for lookups of columns a row never had.
static NULL_CELL: CellValue = CellValue::Null;

/// A single occurrence record (one fossil find).
#[derive(Debug, Clone, Default)]
pub struct Occurrence {
    /// Dynamic columns: column_name → value.
    pub cells: BTreeMap<String, CellValue>,
}

impl Occurrence {
    /// Cell lookup. A column the row never had reads as null, the same
    /// as an empty field.
    pub fn cell(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&NULL_CELL)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.cell(column).as_f64()
    }
}

// ---------------------------------------------------------------------------
// OccurrenceTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dump. Column order is kept from the header so a
/// filtered table writes back with the same layout.
#[derive(Debug, Clone)]
pub struct OccurrenceTable {
    /// Column names in header order.
    pub columns: Vec<String>,
    /// All occurrence rows.
    pub rows: Vec<Occurrence>,
}

impl OccurrenceTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Keep the rows whose mask entry is true. Columns carry over
    /// unchanged; this is the only way rows ever leave a table.
    pub fn retain_rows(&self, mask: &[bool]) -> OccurrenceTable {
        let rows = self
            .rows
            .iter()
            .zip(mask.iter())
            .filter(|(_, keep)| **keep)
            .map(|(row, _)| row.clone())
            .collect();
        OccurrenceTable {
            columns: self.columns.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, CellValue)]) -> Occurrence {
        Occurrence {
            cells: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn parse_guesses_cell_types() {
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse("1204"), CellValue::Integer(1204));
        assert_eq!(CellValue::parse("45.5"), CellValue::Float(45.5));
        assert_eq!(
            CellValue::parse("Hell Creek"),
            CellValue::Text("Hell Creek".to_string())
        );
    }

    #[test]
    fn null_round_trips_to_empty_field() {
        assert_eq!(CellValue::Null.to_field(), "");
        assert_eq!(CellValue::Float(45.5).to_field(), "45.5");
    }

    #[test]
    fn missing_column_reads_as_null() {
        let r = row(&[("genus", CellValue::Text("Tyrannosaurus".into()))]);
        assert!(r.cell("collectors").is_null());
        assert_eq!(r.number("lat"), None);
    }

    #[test]
    fn retain_rows_filters_by_mask() {
        let table = OccurrenceTable {
            columns: vec!["genus".to_string()],
            rows: vec![
                row(&[("genus", CellValue::Text("Tyrannosaurus".into()))]),
                row(&[("genus", CellValue::Text("Triceratops".into()))]),
                row(&[("genus", CellValue::Null)]),
            ],
        };
        let kept = table.retain_rows(&[true, false, true]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.columns, table.columns);
        assert!(kept.rows[1].cell("genus").is_null());
    }
}
