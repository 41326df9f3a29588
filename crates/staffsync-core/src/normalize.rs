use chrono::{DateTime, NaiveDate, Utc};
use staffsync_sheet::{RawCell, RawRow};

use crate::record::{clean, Record};
use crate::schema::{EntityKind, FieldType};

/// Days between the Excel serial epoch (1899-12-30) and 1970-01-01.
const EXCEL_UNIX_EPOCH_OFFSET_DAYS: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86400.0;

/// Convert one raw spreadsheet row into a canonical record.
///
/// Total over every [`RawCell`] variant: a cell that cannot be interpreted
/// for its field degrades to `None`, it never aborts the import. Columns
/// absent from the sheet yield `None` as well.
pub fn normalize_row(kind: EntityKind, row: &RawRow) -> Record {
    let mut record = Record::new();
    for spec in kind.importable_fields() {
        let value = match row.get(spec.header) {
            Some(cell) => normalize_cell(cell, spec.field_type),
            None => None,
        };
        record.set(spec.name, value);
    }
    record
}

fn normalize_cell(cell: &RawCell, field_type: FieldType) -> Option<String> {
    match field_type {
        FieldType::Text => match cell {
            RawCell::Text(s) => clean(Some(s)),
            RawCell::Number(n) => Some(format_number(*n)),
            RawCell::DateTime(serial) => {
                serial_to_date(*serial).map(|d| d.format("%Y-%m-%d").to_string())
            }
            RawCell::Empty => None,
        },
        FieldType::Date => parse_date_cell(cell),
    }
}

/// Render numeric cells without the trailing `.0` Excel attaches to
/// integral values; employee numbers arrive as floats.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Resolve a date cell to a full ISO-8601 timestamp at UTC midnight of the
/// calendar date, or `None` when the value is unparseable.
fn parse_date_cell(cell: &RawCell) -> Option<String> {
    let date = match cell {
        RawCell::Number(serial) | RawCell::DateTime(serial) => serial_to_date(*serial),
        RawCell::Text(s) => parse_date_text(s.trim()),
        RawCell::Empty => None,
    };
    date.map(|d| format!("{}T00:00:00Z", d.format("%Y-%m-%d")))
}

fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    let secs = ((serial - EXCEL_UNIX_EPOCH_OFFSET_DAYS) * SECONDS_PER_DAY).round() as i64;
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

/// Strict `YYYY-MM-DD` and RFC 3339 inputs resolve as UTC calendar dates;
/// the remaining formats cover the local entry conventions seen in the
/// source spreadsheets.
fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    for format in ["%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee_row(cells: &[(&str, RawCell)]) -> RawRow {
        let mut row = RawRow::new(2);
        for (header, cell) in cells {
            row.insert(*header, cell.clone());
        }
        row
    }

    #[test]
    fn trims_text_and_collapses_empty_to_none() {
        let row = employee_row(&[
            ("الرقم الوظيفي", RawCell::Text(" 1001 ".to_string())),
            ("الاسم باللغة العربية", RawCell::Text("   ".to_string())),
        ]);
        let record = normalize_row(EntityKind::Employee, &row);
        assert_eq!(record.get("employee_id"), Some("1001"));
        assert_eq!(record.get("full_name_ar"), None);
        // column absent from the sheet entirely
        assert_eq!(record.get("email"), None);
    }

    #[test]
    fn numeric_cells_render_without_trailing_zero() {
        let row = employee_row(&[("الرقم الوظيفي", RawCell::Number(1001.0))]);
        let record = normalize_row(EntityKind::Employee, &row);
        assert_eq!(record.get("employee_id"), Some("1001"));
    }

    #[test]
    fn serial_date_resolves_to_utc_midnight() {
        // 43831 is the Excel serial for 2020-01-01.
        let row = employee_row(&[("تاريخ الميلاد", RawCell::Number(43831.0))]);
        let record = normalize_row(EntityKind::Employee, &row);
        assert_eq!(record.get("date_of_birth"), Some("2020-01-01T00:00:00Z"));
    }

    #[test]
    fn native_date_cell_uses_the_serial_path() {
        let row = employee_row(&[("تاريخ الميلاد", RawCell::DateTime(43831.5))]);
        let record = normalize_row(EntityKind::Employee, &row);
        assert_eq!(record.get("date_of_birth"), Some("2020-01-01T00:00:00Z"));
    }

    #[test]
    fn strict_iso_string_is_a_utc_calendar_date() {
        let row = employee_row(&[("تاريخ الميلاد", RawCell::Text("1990-06-15".to_string()))]);
        let record = normalize_row(EntityKind::Employee, &row);
        assert_eq!(record.get("date_of_birth"), Some("1990-06-15T00:00:00Z"));
    }

    #[test]
    fn local_format_date_strings_parse() {
        let row = employee_row(&[("تاريخ الميلاد", RawCell::Text("15/06/1990".to_string()))]);
        let record = normalize_row(EntityKind::Employee, &row);
        assert_eq!(record.get("date_of_birth"), Some("1990-06-15T00:00:00Z"));
    }

    #[test]
    fn unparseable_date_degrades_to_none() {
        let row = employee_row(&[("تاريخ الميلاد", RawCell::Text("غير معروف".to_string()))]);
        let record = normalize_row(EntityKind::Employee, &row);
        assert_eq!(record.get("date_of_birth"), None);
    }

    #[test]
    fn server_managed_fields_are_not_read_from_the_sheet() {
        let row = employee_row(&[("الإدارة", RawCell::Text("تقنية المعلومات".to_string()))]);
        let record = normalize_row(EntityKind::Employee, &row);
        assert_eq!(record.get("department"), None);
    }
}
