use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

const HIGHLIGHT_MARKER: &str = "▶ ";

pub(super) fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table
}

pub(super) fn header(titles: &[&str]) -> Vec<Cell> {
    titles.iter().map(|title| Cell::new(title).add_attribute(Attribute::Bold)).collect()
}

/// Two column label/value table. Rows are identified by their label; the row
/// matching `highlight` is marked and colored.
pub(super) fn parameter_table(rows: &[(&str, String)], highlight: Option<&str>) -> Table {
    let mut table = new_table();

    for (id, value) in rows {
        if highlight == Some(*id) {
            table.add_row(vec![
                Cell::new(format!("{}{}", HIGHLIGHT_MARKER, id)).fg(Color::Blue).add_attribute(Attribute::Bold),
                Cell::new(value).fg(Color::Blue).add_attribute(Attribute::Bold),
            ]);
        } else {
            table.add_row(vec![Cell::new(id), Cell::new(value)]);
        }
    }

    table
}
