use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::color::ColorMap;
use crate::config;
use crate::data::model::OccurrenceTable;

// ---------------------------------------------------------------------------
// Fossil location map (Leaflet HTML document)
// ---------------------------------------------------------------------------

/// Map view: the record cluster sits in western North America.
const MAP_CENTER: (f64, f64) = (45.0, -100.0);
const MAP_ZOOM: u8 = 4;

/// One map marker, serialized into the page as JSON.
#[derive(Debug, Serialize)]
struct Marker {
    lat: f64,
    lng: f64,
    name: String,
    location: String,
    date: String,
    collector: String,
    color: String,
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Fossil discovery locations</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  html, body, #map { height: 100%; margin: 0; }
  .legend { background: white; padding: 8px 10px; line-height: 1.5; border-radius: 4px; box-shadow: 0 1px 4px rgba(0,0,0,0.3); }
  .legend .swatch { display: inline-block; width: 10px; height: 10px; border-radius: 5px; margin-right: 6px; }
</style>
</head>
<body>
<div id="map"></div>
<script>
const markers = __MARKERS__;
const map = L.map('map').setView([__CENTER_LAT__, __CENTER_LNG__], __ZOOM__);
L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
  attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);
for (const m of markers) {
  L.circleMarker([m.lat, m.lng], {
    radius: 7, color: m.color, fillColor: m.color, fillOpacity: 0.85, weight: 1
  }).bindPopup(
    '<b>Specimen:</b> ' + m.name + '<br>' +
    '<b>Location:</b> ' + m.location + '<br>' +
    '<b>Date:</b> ' + m.date + '<br>' +
    '<b>Collector:</b> ' + m.collector,
    { maxWidth: 300 }
  ).addTo(map);
}
const legend = L.control({ position: 'bottomright' });
legend.onAdd = function () {
  const div = L.DomUtil.create('div', 'legend');
  div.innerHTML = __LEGEND__;
  return div;
};
legend.addTo(map);
</script>
</body>
</html>
"#;

/// Write the interactive marker map for every row with coordinates.
/// Returns `false` (and writes nothing) when no row has both a
/// latitude and a longitude.
pub fn render_map(table: &OccurrenceTable, path: &Path) -> Result<bool> {
    debug!("creating fossil map");
    let colors = ColorMap::from_column(table, config::MARKER_COLOR_COLUMN);
    let markers = collect_markers(table, &colors);
    debug!(
        placed = markers.len(),
        skipped = table.len() - markers.len(),
        "placed markers on the map"
    );

    if markers.is_empty() {
        warn!("no records with usable coordinates; map not written");
        return Ok(false);
    }

    let payload = serde_json::to_string(&markers).context("serializing map markers")?;
    let html = PAGE_TEMPLATE
        .replace("__MARKERS__", &payload)
        .replace("__CENTER_LAT__", &MAP_CENTER.0.to_string())
        .replace("__CENTER_LNG__", &MAP_CENTER.1.to_string())
        .replace("__ZOOM__", &MAP_ZOOM.to_string())
        .replace("__LEGEND__", &legend_markup(&colors));
    fs::write(path, html).with_context(|| format!("writing map to {}", path.display()))?;

    info!("map saved to {}", path.display());
    Ok(true)
}

/// One marker per row that has both coordinates; the rest are skipped.
fn collect_markers(table: &OccurrenceTable, colors: &ColorMap) -> Vec<Marker> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            let lat = row.number("lat")?;
            let lng = row.number("lng")?;
            let state = row.cell(&colors.column).to_string();
            Some(Marker {
                lat,
                lng,
                name: row.cell("accepted_name").to_string(),
                location: row.cell("collection_name").to_string(),
                date: row.cell("collection_dates").to_string(),
                collector: row.cell("collectors").to_string(),
                color: colors.color_for(&state).to_string(),
            })
        })
        .collect()
}

/// Legend body: a colour swatch per distinct value, as a JS string
/// literal ready for the template.
fn legend_markup(colors: &ColorMap) -> String {
    let mut body = String::new();
    for (value, color) in colors.legend_entries() {
        let _ = write!(
            body,
            "<span class=\\\"swatch\\\" style=\\\"background:{color}\\\"></span>{value}<br>"
        );
    }
    format!("\"{body}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Occurrence};

    fn row(lat: Option<f64>, lng: Option<f64>, name: &str) -> Occurrence {
        let mut cells = std::collections::BTreeMap::new();
        cells.insert(
            "lat".to_string(),
            lat.map_or(CellValue::Null, CellValue::Float),
        );
        cells.insert(
            "lng".to_string(),
            lng.map_or(CellValue::Null, CellValue::Float),
        );
        cells.insert(
            "accepted_name".to_string(),
            CellValue::Text(name.to_string()),
        );
        cells.insert(
            "state".to_string(),
            CellValue::Text("Montana".to_string()),
        );
        Occurrence { cells }
    }

    fn table(rows: Vec<Occurrence>) -> OccurrenceTable {
        OccurrenceTable {
            columns: vec![
                "lat".to_string(),
                "lng".to_string(),
                "accepted_name".to_string(),
                "state".to_string(),
            ],
            rows,
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("trex_atlas_map_test");
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn rows_without_coordinates_are_skipped() {
        let t = table(vec![
            row(Some(47.6), Some(-106.2), "Tyrannosaurus rex"),
            row(None, Some(-104.0), "no latitude"),
            row(Some(44.0), None, "no longitude"),
        ]);
        let colors = ColorMap::from_column(&t, "state");
        let markers = collect_markers(&t, &colors);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].name, "Tyrannosaurus rex");
    }

    #[test]
    fn no_file_when_every_row_lacks_coordinates() {
        let path = temp_path("empty_map.html");
        let _ = fs::remove_file(&path);
        let wrote = render_map(&table(vec![row(None, None, "x")]), &path).unwrap();
        assert!(!wrote);
        assert!(!path.exists());
    }

    #[test]
    fn map_document_embeds_the_markers() {
        let path = temp_path("map.html");
        let t = table(vec![row(Some(47.6), Some(-106.2), "Tyrannosaurus rex")]);
        let wrote = render_map(&t, &path).unwrap();
        assert!(wrote);
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("Tyrannosaurus rex"));
        assert!(html.contains("L.circleMarker"));
        assert!(!html.contains("__MARKERS__"));
    }
}
