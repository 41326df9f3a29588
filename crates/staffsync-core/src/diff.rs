use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::record::{clean, Record};
use crate::schema::{EntityKind, FieldType};

/// Tri-state classification of one incoming record against the store.
/// Derived on every run, never persisted.
#[derive(Debug, Clone)]
pub enum Outcome {
    Create(Record),
    /// Carries the full old and new records so the operator can review the
    /// whole record, not just the deltas.
    Update {
        old: Record,
        new: Record,
        changed: Vec<&'static str>,
    },
    Ignore,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Create(_) => "create",
            Outcome::Update { .. } => "update",
            Outcome::Ignore => "ignore",
        }
    }
}

/// Read-only projection over a set of outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub create: usize,
    pub update: usize,
    pub ignored: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created: {} | updated: {} | ignored: {}",
            self.create, self.update, self.ignored
        )
    }
}

/// Classify one incoming record against its persisted counterpart.
///
/// No counterpart means `Create`. Otherwise every importable field is
/// compared; "any field differs" makes the classification independent of
/// comparison order.
pub fn classify(kind: EntityKind, incoming: &Record, persisted: Option<&Record>) -> Outcome {
    let Some(old) = persisted else {
        return Outcome::Create(incoming.clone());
    };

    let mut changed = Vec::new();
    for spec in kind.importable_fields() {
        if !values_equal(spec.field_type, old.get(spec.name), incoming.get(spec.name)) {
            changed.push(spec.name);
        }
    }

    if changed.is_empty() {
        Outcome::Ignore
    } else {
        Outcome::Update {
            old: old.clone(),
            new: incoming.clone(),
            changed,
        }
    }
}

/// Null-aware equality: both sides trim to `None` before comparing, so an
/// empty cell and an absent column never produce a spurious update. Date
/// fields compare at calendar-day granularity.
pub fn values_equal(field_type: FieldType, left: Option<&str>, right: Option<&str>) -> bool {
    match (clean(left), clean(right)) {
        (None, None) => true,
        (Some(a), Some(b)) => match field_type {
            FieldType::Text => a == b,
            FieldType::Date => match (date_part(&a), date_part(&b)) {
                (Some(da), Some(db)) => da == db,
                _ => a == b,
            },
        },
        _ => false,
    }
}

/// Calendar date of a stored timestamp-ish string, time-of-day discarded.
pub fn date_part(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    let prefix = trimmed.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}
