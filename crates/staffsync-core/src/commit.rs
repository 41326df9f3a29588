use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::diff::{ImportSummary, Outcome};
use crate::error::{ImportError, Result};
use crate::plan::ImportPlan;
use crate::record::{clean, Record, CREATED_AT, ID, UPDATED_AT};
use crate::schema::EntityKind;
use crate::selection::FieldSelection;
use crate::store::DirectoryStore;

/// Records per upsert batch. Batches are issued strictly in order; a
/// failure leaves earlier batches committed and later ones untouched.
pub const CHUNK_SIZE: usize = 50;

/// Identity of the uploaded spreadsheet, carried through progress events.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub file_name: String,
    pub file_size: u64,
}

/// One progress event, emitted after each committed batch.
#[derive(Debug, Clone, Serialize)]
pub struct CommitProgress {
    pub file_name: String,
    pub file_size: u64,
    pub progress_percent: f64,
}

#[derive(Debug)]
pub enum CommitOutcome {
    /// Every row classified as ignore, or the operator deselected every
    /// field. Distinct from an error: there was nothing to write.
    NothingToImport,
    Committed(CommitReport),
}

#[derive(Debug)]
pub struct CommitReport {
    pub summary: ImportSummary,
    pub records_written: usize,
    /// Full post-commit reload of the collection, in natural-key order.
    pub collection: Vec<Record>,
}

/// Apply a reviewed plan to the store.
///
/// Creates go through verbatim. Updates are rebuilt as the persisted record
/// with only the operator-selected fields overwritten; an update whose
/// selection is empty degrades to ignored. Batches are written sequentially
/// so that on failure the committed prefix is well defined.
pub async fn commit_plan<F>(
    store: &dyn DirectoryStore,
    source: &SourceFile,
    plan: &ImportPlan,
    selection: &FieldSelection,
    mut on_progress: F,
) -> Result<CommitOutcome>
where
    F: FnMut(CommitProgress),
{
    let kind = plan.kind;
    let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut summary = ImportSummary::default();
    let mut batch: Vec<Record> = Vec::new();

    for row in &plan.outcomes {
        match &row.outcome {
            Outcome::Create(record) => {
                summary.create += 1;
                batch.push(outbound(kind, record.clone(), None));
            }
            Outcome::Update { old, new, .. } => {
                let selected = selection
                    .fields_for(&row.key)
                    .map(|fields| fields.iter().copied().collect::<Vec<_>>())
                    .unwrap_or_default();
                if selected.is_empty() {
                    summary.ignored += 1;
                    continue;
                }
                summary.update += 1;
                let mut merged = old.clone();
                for field in selected {
                    merged.set(field, clean(new.get(field)));
                }
                batch.push(outbound(kind, merged, Some(stamp.clone())));
            }
            Outcome::Ignore => summary.ignored += 1,
        }
    }

    if batch.is_empty() {
        return Ok(CommitOutcome::NothingToImport);
    }

    let total = batch.len();
    let mut committed = 0usize;
    for (chunk_index, chunk) in batch.chunks(CHUNK_SIZE).enumerate() {
        store
            .upsert(kind, chunk, kind.natural_key())
            .await
            .map_err(|source| ImportError::ChunkFailed {
                chunk: chunk_index + 1,
                committed,
                total,
                source: Box::new(source),
            })?;
        committed += chunk.len();
        info!(
            entity = kind.as_str(),
            chunk = chunk_index + 1,
            committed,
            total,
            "committed batch"
        );
        on_progress(CommitProgress {
            file_name: source.file_name.clone(),
            file_size: source.file_size,
            progress_percent: committed as f64 / total as f64 * 100.0,
        });
    }

    let collection = store.fetch_all(kind).await?;
    Ok(CommitOutcome::Committed(CommitReport {
        summary,
        records_written: total,
        collection,
    }))
}

/// Strip a record down to the wire shape: importable fields plus the
/// update stamp. The server keeps ownership of ids, creation timestamps,
/// and server-managed fields.
fn outbound(kind: EntityKind, mut record: Record, updated_at: Option<String>) -> Record {
    record.remove(ID);
    record.remove(CREATED_AT);
    for spec in kind.fields().iter().filter(|spec| spec.server_managed) {
        record.remove(spec.name);
    }
    record.set(UPDATED_AT, updated_at);
    record
}
