use std::collections::BTreeMap;

use serde::Serialize;

use crate::schema::EntityKind;

/// Surrogate key, assigned by the database. Never client-supplied.
pub const ID: &str = "id";
/// Creation timestamp, assigned by the database. Never overwritten.
pub const CREATED_AT: &str = "created_at";
/// Stamped by the commit orchestrator on every update.
pub const UPDATED_AT: &str = "updated_at";

/// Trim a cell value; a whitespace-only result collapses to `None`.
pub fn clean(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// One directory record as a canonical field-name → value map.
///
/// Values are trimmed strings or `None`; date fields hold an ISO-8601
/// timestamp string anchored at UTC midnight. The same shape serves
/// normalized spreadsheet rows and persisted database rows, which is what
/// lets the diff engine and the commit merge treat them uniformly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    fields: BTreeMap<&'static str, Option<String>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|value| value.as_deref())
    }

    pub fn set(&mut self, name: &'static str, value: Option<String>) {
        self.fields.insert(name, value);
    }

    pub fn remove(&mut self, name: &str) {
        self.fields.remove(name);
    }

    /// Field names present on this record, in stable order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    /// The trimmed natural-key value, if the record carries one.
    pub fn natural_key(&self, kind: EntityKind) -> Option<String> {
        clean(self.get(kind.natural_key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_collapses_whitespace_to_none() {
        assert_eq!(clean(Some("  أحمد ")), Some("أحمد".to_string()));
        assert_eq!(clean(Some("   ")), None);
        assert_eq!(clean(Some("")), None);
        assert_eq!(clean(None), None);
    }

    #[test]
    fn natural_key_is_trimmed() {
        let mut record = Record::new();
        record.set("employee_id", Some(" 1001 ".to_string()));
        assert_eq!(
            record.natural_key(EntityKind::Employee),
            Some("1001".to_string())
        );

        record.set("employee_id", Some("  ".to_string()));
        assert_eq!(record.natural_key(EntityKind::Employee), None);
    }
}
