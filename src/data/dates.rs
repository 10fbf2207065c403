use once_cell::sync::Lazy;
use regex::Regex;

use super::model::CellValue;

/// Year formats seen in PBDB `collection_dates` free text, tried in
/// order. The first captured group wins.
static YEAR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d{4})",       // bare four-digit year
        r"(\d{4})-\d{4}", // year range, keep the first
        r"(\d{4})–\d{4}", // year range with en dash
        r"(\d{4})\s*,",   // year followed by a comma
    ]
    .iter()
    .map(|p| Regex::new(p).expect("hard-coded year pattern"))
    .collect()
});

/// Pull a four-digit discovery year out of a free-text date cell.
/// Null cells and text without a recognizable year yield `None`.
pub fn extract_year(cell: &CellValue) -> Option<i32> {
    if cell.is_null() {
        return None;
    }
    let text = cell.to_string();
    for pattern in YEAR_PATTERNS.iter() {
        if let Some(m) = pattern.captures(&text).and_then(|caps| caps.get(1)) {
            if let Ok(year) = m.as_str().parse::<i32>() {
                return Some(year);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn recognized_formats_yield_the_first_year() {
        assert_eq!(extract_year(&text("1990")), Some(1990));
        assert_eq!(extract_year(&text("1990-1992")), Some(1990));
        assert_eq!(extract_year(&text("1990–1992")), Some(1990));
        assert_eq!(extract_year(&text("1990, summer")), Some(1990));
        assert_eq!(extract_year(&text("July 1, 1988")), Some(1988));
    }

    #[test]
    fn unparseable_dates_yield_none() {
        assert_eq!(extract_year(&text("unknown")), None);
        assert_eq!(extract_year(&text("summer, no year")), None);
        assert_eq!(extract_year(&CellValue::Null), None);
    }

    #[test]
    fn numeric_cells_are_coerced_to_text_first() {
        assert_eq!(extract_year(&CellValue::Integer(1905)), Some(1905));
    }
}
