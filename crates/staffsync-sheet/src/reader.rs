use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};

use crate::cell::{RawCell, RawRow};
use crate::errors::SheetError;

/// Parse the first worksheet of a workbook into raw rows.
///
/// Row 1 is the header row; headers are matched by their exact trimmed
/// label. Data rows keep their 1-based spreadsheet indices, so the first
/// data row reports index 2. Rows whose cells are all empty are skipped.
pub fn read_first_sheet(contents: &[u8]) -> Result<Vec<RawRow>, SheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(contents))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoSheets)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| SheetError::MissingHeaderRow(sheet_name.clone()))?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut parsed = Vec::new();
    for (offset, row) in rows.enumerate() {
        let mut raw = RawRow::new(offset + 2);
        for (idx, cell) in row.iter().enumerate() {
            let Some(header) = headers.get(idx) else {
                continue;
            };
            if header.is_empty() {
                continue;
            }
            raw.insert(header.clone(), RawCell::from(cell));
        }
        if raw.is_blank() {
            continue;
        }
        parsed.push(raw);
    }

    Ok(parsed)
}
