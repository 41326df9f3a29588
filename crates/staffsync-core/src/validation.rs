use serde::Serialize;

use crate::dedupe::SourceRow;
use crate::schema::EntityKind;

/// One advisory finding tied to a spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// 1-based spreadsheet row number (the header row is 1, so the first
    /// data row reports 2).
    pub row_index: usize,
    pub message: String,
}

/// Scan the deduplicated batch for missing required display fields.
///
/// Purely informational: every issue is reported (several per row if
/// warranted) and none of them blocks the commit.
pub fn collect_issues(kind: EntityKind, rows: &[SourceRow]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for row in rows {
        for spec in kind.fields().iter().filter(|spec| spec.required) {
            let value = row.record.get(spec.name).map(str::trim).unwrap_or("");
            if value.is_empty() {
                issues.push(ValidationIssue {
                    row_index: row.row_index,
                    message: format!("missing required value for '{}'", spec.header),
                });
            }
        }
    }
    issues
}
