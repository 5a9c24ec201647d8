use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

/// Renders an optional field, greyed out as "unknown" when missing.
pub fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => Cell::new("unknown").fg(TableColor::DarkGrey),
    }
}

/// Base images are only set on dependent jobs, so level 0 shows a dash.
pub fn base_image_cell(base_image: Option<&str>) -> Cell {
    match base_image {
        Some(text) => Cell::new(text).fg(TableColor::Yellow),
        None => Cell::new("-").fg(TableColor::DarkGrey),
    }
}
