//! Fixed paths and the taxon search definition. The tool takes no
//! command-line arguments; everything it reads or writes is named here.

pub const DATA_DIR: &str = "data";
pub const OUTPUT_DIR: &str = "outputs";

pub const INPUT_CSV: &str = "data/pbdb_data.csv";
pub const MAP_HTML: &str = "outputs/trex_locations.html";
pub const TIMELINE_PNG: &str = "outputs/trex_timeline.png";
pub const FILTERED_CSV: &str = "outputs/trex_analysis.csv";
pub const LOG_PREFIX: &str = "analysis_log";

/// Discovery metadata echoed per matched record, with the label each
/// column is logged under.
pub const DISCOVERY_COLUMNS: &[(&str, &str)] = &[
    ("collection_name", "location"),
    ("cc", "country"),
    ("state", "state"),
    ("lat", "latitude"),
    ("lng", "longitude"),
    ("collection_dates", "collection date"),
    ("collectors", "discovered by"),
    ("collection_type", "collection type"),
    ("collection_size", "collection size"),
    ("collection_methods", "methods used"),
];

/// Geological context appended to each record block.
pub const INTERVAL_COLUMNS: &[(&str, &str)] = &[
    ("early_interval", "early interval"),
    ("late_interval", "late interval"),
    ("max_ma", "max age (Ma)"),
    ("min_ma", "min age (Ma)"),
];

/// Free-text comment columns echoed in the per-record report when
/// non-null, with the label each one is logged under.
pub const COMMENT_COLUMNS: &[(&str, &str)] = &[
    ("occurrence_comments", "specimen details"),
    ("preservation_comments", "preservation"),
    ("collection_comments", "additional notes"),
];

/// Column the map markers are colored by.
pub const MARKER_COLOR_COLUMN: &str = "state";

// ---------------------------------------------------------------------------
// TaxonQuery – which spellings to hunt for, and where
// ---------------------------------------------------------------------------

/// A taxon search: lower-case spelling patterns plus the columns
/// likely to carry identification text.
#[derive(Debug, Clone)]
pub struct TaxonQuery {
    pub label: &'static str,
    pub patterns: &'static [&'static str],
    pub candidate_columns: &'static [&'static str],
}

impl TaxonQuery {
    /// Tyrannosaurus rex and the spellings that show up in PBDB free text.
    pub fn tyrannosaurus_rex() -> TaxonQuery {
        TaxonQuery {
            label: "T-Rex",
            patterns: &[
                r"t[-\s]?rex",   // T-Rex, T Rex, TRex
                r"tyrannosaurus",
                r"t\.*\s*rexus", // loose spelling variant
                r"tyrant",       // broad common-name token
            ],
            candidate_columns: &[
                "identified_name",
                "identified_rank",
                "accepted_name",
                "accepted_rank",
                "phylum",
                "class",
                "order",
                "family",
                "genus",
            ],
        }
    }
}
