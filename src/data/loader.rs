use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use thiserror::Error;
use tracing::debug;

use super::model::{CellValue, Occurrence, OccurrenceTable};

/// Literal token that opens the real header line of a PBDB download.
/// Everything above it is the metadata block the exporter prepends.
const HEADER_TOKEN: &str = "\"occurrence_no\"";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The dump never names its columns. Parsing from line 0 would
    /// silently treat the metadata block as data, so this is fatal.
    #[error("no header line starting with \"occurrence_no\" in {path}")]
    HeaderNotFound { path: String },
    #[error("malformed CSV record: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a PBDB occurrence dump, skipping the leading metadata block.
/// Invalid UTF-8 bytes are replaced rather than rejected.
pub fn load_occurrences(path: &Path) -> Result<OccurrenceTable, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    parse_dump(&content, path)
}

/// Parse dump text already in memory. Split from [`load_occurrences`]
/// so tests can feed literal fixtures.
pub fn parse_dump(content: &str, path: &Path) -> Result<OccurrenceTable, LoadError> {
    // Scan for the header line byte offset. The metadata block never
    // contains quoted multi-line fields, so a plain line walk is safe.
    let mut offset = 0;
    let mut header_line = None;
    for (line_no, line) in content.split_inclusive('\n').enumerate() {
        if line.starts_with(HEADER_TOKEN) {
            header_line = Some(line_no);
            break;
        }
        offset += line.len();
    }
    let header_line = header_line.ok_or_else(|| LoadError::HeaderNotFound {
        path: path.display().to_string(),
    })?;
    debug!(header_line, "found header row");

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(content[offset..].as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut cells = BTreeMap::new();
        for (idx, name) in columns.iter().enumerate() {
            let raw = record.get(idx).unwrap_or("");
            cells.insert(name.clone(), CellValue::parse(raw));
        }
        rows.push(Occurrence { cells });
    }

    Ok(OccurrenceTable { columns, rows })
}
