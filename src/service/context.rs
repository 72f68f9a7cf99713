use crate::types::sheets::{FetchedSheet, SheetTable};

/// Rows per sheet, header row included, that make it into the prompt digest.
pub const DIGEST_ROW_LIMIT: usize = 50;
const CELL_SEPARATOR: &str = " | ";

/// Plain-text digest of the sheets for prompt injection.
///
/// Each sheet becomes `"\n\nPlanilha: {name}\nDados:\n"` followed by the first
/// [`DIGEST_ROW_LIMIT`] rows of its range. Empty input gives `""`.
pub fn text_digest(sheets: &[FetchedSheet]) -> String {
    sheets
        .iter()
        .map(sheet_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn sheet_block(sheet: &FetchedSheet) -> String {
    let rows = sheet
        .values
        .iter()
        .take(DIGEST_ROW_LIMIT)
        .map(|row| row.join(CELL_SEPARATOR))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n\nPlanilha: {}\nDados:\n{}", sheet.name(), rows)
}

/// Header-keyed tables for chart widgets. Nothing is truncated.
pub fn structured_tables(sheets: &[FetchedSheet]) -> Vec<SheetTable> {
    sheets
        .iter()
        .map(|sheet| SheetTable::from_values(sheet.name(), &sheet.values))
        .collect()
}
