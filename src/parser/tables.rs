use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::element_text;
use crate::model::Table;

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td, th").unwrap());

/// Every `table` in document order.
///
/// Headers are all `th` cells anywhere in the table. Rows take both `td` and
/// `th` cells, so a header row shows up in `rows` as well.
pub fn extract(doc: &Html) -> Vec<Table> {
    doc.select(&TABLE)
        .map(|table| {
            let headers = table.select(&HEADER_CELL).map(|th| element_text(&th)).collect();
            let rows = table
                .select(&ROW)
                .map(|tr| tr.select(&CELL).map(|c| element_text(&c)).collect::<Vec<_>>())
                .filter(|cells| !cells.is_empty())
                .collect();
            Table { headers, rows }
        })
        .collect()
}

// ── Tests ──
