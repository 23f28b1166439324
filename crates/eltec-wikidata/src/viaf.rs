//! VIAF identifier extraction from free-text/URL cells

use std::sync::LazyLock;

use regex::Regex;

static VIAF_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"viaf\.org/viaf/(\d+)").expect("valid VIAF regex"));

/// Pull the numeric VIAF id out of a cell like `https://viaf.org/viaf/12345/`.
///
/// Missing, empty and `NA` cells, and anything without a VIAF URL, give `None`.
pub fn extract_viaf_id(cell: Option<&str>) -> Option<&str> {
    let cell = cell?.trim();
    if cell.is_empty() || cell == "NA" {
        return None;
    }
    VIAF_URL
        .captures(cell)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
