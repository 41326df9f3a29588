use std::collections::HashMap;

use crate::record::Record;
use crate::schema::EntityKind;

/// One normalized record still carrying its 1-based spreadsheet row index.
#[derive(Debug, Clone)]
pub struct SourceRow {
    pub row_index: usize,
    /// Trimmed natural-key value; guaranteed non-empty after dedup.
    pub key: String,
    pub record: Record,
}

#[derive(Debug)]
pub struct DedupedRows {
    pub rows: Vec<SourceRow>,
    /// Rows whose natural key was empty; they cannot be matched or imported
    /// and are dropped without a validation issue.
    pub dropped_missing_key: usize,
}

/// Collapse rows sharing a natural key, keeping the last occurrence in
/// source order. A later duplicate replaces the earlier one in place, so
/// the output keeps first-seen positions.
pub fn dedupe_last_wins(kind: EntityKind, rows: Vec<(usize, Record)>) -> DedupedRows {
    let mut out: Vec<SourceRow> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0usize;

    for (row_index, record) in rows {
        let Some(key) = record.natural_key(kind) else {
            dropped += 1;
            continue;
        };
        match index_by_key.get(&key) {
            Some(&position) => {
                out[position] = SourceRow {
                    row_index,
                    key,
                    record,
                };
            }
            None => {
                index_by_key.insert(key.clone(), out.len());
                out.push(SourceRow {
                    row_index,
                    key,
                    record,
                });
            }
        }
    }

    DedupedRows {
        rows: out,
        dropped_missing_key: dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: &str, name: &str) -> Record {
        let mut record = Record::new();
        record.set("employee_id", Some(id.to_string()));
        record.set("full_name_ar", Some(name.to_string()));
        record
    }

    #[test]
    fn last_occurrence_wins() {
        let rows = vec![
            (2, employee("1", "أحمد")),
            (3, employee("1", "محمد")),
            (4, employee("2", "سارة")),
        ];
        let deduped = dedupe_last_wins(EntityKind::Employee, rows);

        assert_eq!(deduped.rows.len(), 2);
        assert_eq!(deduped.rows[0].key, "1");
        assert_eq!(deduped.rows[0].row_index, 3);
        assert_eq!(deduped.rows[0].record.get("full_name_ar"), Some("محمد"));
        assert_eq!(deduped.rows[1].key, "2");
    }

    #[test]
    fn rows_without_a_key_are_dropped_and_counted() {
        let mut keyless = Record::new();
        keyless.set("employee_id", Some("  ".to_string()));
        keyless.set("full_name_ar", Some("بدون رقم".to_string()));

        let rows = vec![(2, keyless), (3, employee("7", "هدى"))];
        let deduped = dedupe_last_wins(EntityKind::Employee, rows);

        assert_eq!(deduped.rows.len(), 1);
        assert_eq!(deduped.rows[0].key, "7");
        assert_eq!(deduped.dropped_missing_key, 1);
    }
}
