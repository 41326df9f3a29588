use std::collections::HashMap;

use staffsync_sheet::RawRow;

use crate::dedupe::{dedupe_last_wins, DedupedRows, SourceRow};
use crate::diff::{classify, ImportSummary, Outcome};
use crate::normalize::normalize_row;
use crate::record::Record;
use crate::schema::EntityKind;
use crate::validation::{collect_issues, ValidationIssue};

/// Normalized, deduplicated rows plus everything the operator sees before
/// reconciliation runs.
#[derive(Debug)]
pub struct PreparedRows {
    pub kind: EntityKind,
    pub rows: Vec<SourceRow>,
    pub issues: Vec<ValidationIssue>,
    pub dropped_missing_key: usize,
}

impl PreparedRows {
    /// Nothing survived normalization and dedup — the "no valid data" case.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Natural keys to fetch persisted counterparts for.
    pub fn natural_keys(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.key.clone()).collect()
    }
}

/// Normalize and deduplicate a parsed sheet.
///
/// Pure and synchronous; the caller fetches the persisted set for matching
/// before handing the batch to [`reconcile`].
pub fn prepare_rows(kind: EntityKind, raw_rows: &[RawRow]) -> PreparedRows {
    let normalized: Vec<(usize, Record)> = raw_rows
        .iter()
        .map(|row| (row.row_index, normalize_row(kind, row)))
        .collect();

    let DedupedRows {
        rows,
        dropped_missing_key,
    } = dedupe_last_wins(kind, normalized);
    let issues = collect_issues(kind, &rows);

    PreparedRows {
        kind,
        rows,
        issues,
        dropped_missing_key,
    }
}

#[derive(Debug)]
pub struct RowOutcome {
    pub row_index: usize,
    pub key: String,
    pub outcome: Outcome,
}

/// The reviewed unit of one import session: every outcome in source order,
/// the advisory issues, and the silently dropped-row count.
#[derive(Debug)]
pub struct ImportPlan {
    pub kind: EntityKind,
    pub outcomes: Vec<RowOutcome>,
    pub issues: Vec<ValidationIssue>,
    pub dropped_missing_key: usize,
}

impl ImportPlan {
    pub fn summary(&self) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for row in &self.outcomes {
            match row.outcome {
                Outcome::Create(_) => summary.create += 1,
                Outcome::Update { .. } => summary.update += 1,
                Outcome::Ignore => summary.ignored += 1,
            }
        }
        summary
    }

    pub fn updates(&self) -> impl Iterator<Item = &RowOutcome> {
        self.outcomes
            .iter()
            .filter(|row| matches!(row.outcome, Outcome::Update { .. }))
    }
}

/// Run the diff engine over a prepared batch against the persisted set.
pub fn reconcile(prepared: PreparedRows, persisted: &[Record]) -> ImportPlan {
    let PreparedRows {
        kind,
        rows,
        issues,
        dropped_missing_key,
    } = prepared;

    let by_key: HashMap<String, &Record> = persisted
        .iter()
        .filter_map(|record| record.natural_key(kind).map(|key| (key, record)))
        .collect();

    let outcomes = rows
        .into_iter()
        .map(|row| {
            let outcome = classify(kind, &row.record, by_key.get(row.key.as_str()).copied());
            RowOutcome {
                row_index: row.row_index,
                key: row.key,
                outcome,
            }
        })
        .collect();

    ImportPlan {
        kind,
        outcomes,
        issues,
        dropped_missing_key,
    }
}
