use chrono::NaiveDate;

use crate::diff::date_part;
use crate::record::Record;
use crate::schema::{EntityKind, FieldType};

/// A collection projected back into tabular form, headers matching the
/// import template so an export round-trips through the importer.
#[derive(Debug)]
pub struct ExportSheet {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

/// Project a collection for download. Every schema field is included,
/// server-managed ones too: exports reflect the directory as displayed,
/// not the import payload.
pub fn project_collection(kind: EntityKind, records: &[Record]) -> ExportSheet {
    let fields = kind.fields();
    let headers = fields.iter().map(|spec| spec.header).collect();
    let rows = records
        .iter()
        .map(|record| {
            fields
                .iter()
                .map(|spec| {
                    let value = record.get(spec.name).unwrap_or("");
                    match spec.field_type {
                        FieldType::Text => value.to_string(),
                        FieldType::Date => render_date(value),
                    }
                })
                .collect()
        })
        .collect();

    ExportSheet { headers, rows }
}

/// Dates export as the bare calendar day; anything unparseable passes
/// through untouched.
fn render_date(value: &str) -> String {
    date_part(value)
        .as_ref()
        .map(NaiveDate::to_string)
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_headers_match_the_import_template() {
        let sheet = project_collection(EntityKind::OfficeContact, &[]);
        assert_eq!(
            sheet.headers,
            vec!["الاسم", "التحويلة", "الموقع", "البريد الإلكتروني"]
        );
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn dates_render_as_calendar_days() {
        let mut record = Record::new();
        record.set("employee_id", Some("1".to_string()));
        record.set("date_of_birth", Some("1990-05-17T00:00:00Z".to_string()));
        record.set("department", Some("الموارد البشرية".to_string()));

        let sheet = project_collection(EntityKind::Employee, &[record]);
        let row = &sheet.rows[0];
        assert_eq!(row[0], "1");
        let dob_index = sheet
            .headers
            .iter()
            .position(|h| *h == "تاريخ الميلاد")
            .unwrap();
        assert_eq!(row[dob_index], "1990-05-17");
        let dept_index = sheet.headers.iter().position(|h| *h == "الإدارة").unwrap();
        assert_eq!(row[dept_index], "الموارد البشرية");
    }
}
