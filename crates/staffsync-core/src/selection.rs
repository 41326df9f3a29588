use std::collections::{BTreeMap, BTreeSet};

use crate::diff::Outcome;
use crate::plan::ImportPlan;
use crate::record::clean;

/// Per-record set of update fields the operator has approved.
///
/// Session-scoped: built fresh from one plan, mutated only by operator
/// actions, consumed exactly once at commit time.
#[derive(Debug, Clone, Default)]
pub struct FieldSelection {
    selected: BTreeMap<String, BTreeSet<&'static str>>,
}

impl FieldSelection {
    /// Default selection: every changed field whose incoming value is
    /// non-empty. Fields that would clear persisted data start unselected
    /// and must be opted into explicitly.
    pub fn default_for_plan(plan: &ImportPlan) -> Self {
        let mut selection = Self::default();
        for row in &plan.outcomes {
            if let Outcome::Update { new, changed, .. } = &row.outcome {
                let fields = changed
                    .iter()
                    .copied()
                    .filter(|field| clean(new.get(field)).is_some())
                    .collect();
                selection.selected.insert(row.key.clone(), fields);
            }
        }
        selection
    }

    pub fn fields_for(&self, key: &str) -> Option<&BTreeSet<&'static str>> {
        self.selected.get(key)
    }

    pub fn is_selected(&self, key: &str, field: &str) -> bool {
        self.selected
            .get(key)
            .map(|fields| fields.contains(field))
            .unwrap_or(false)
    }

    /// Flip one field in or out of the selection for one record.
    pub fn toggle(&mut self, key: &str, field: &'static str) {
        let fields = self.selected.entry(key.to_string()).or_default();
        if !fields.remove(field) {
            fields.insert(field);
        }
    }

    /// Select every changed field for one record, including fields that
    /// clear persisted data.
    pub fn select_all(&mut self, key: &str, changed: &[&'static str]) {
        self.selected
            .insert(key.to_string(), changed.iter().copied().collect());
    }

    /// Deselect everything for one record; at commit time the record
    /// becomes a no-op.
    pub fn clear(&mut self, key: &str) {
        self.selected.insert(key.to_string(), BTreeSet::new());
    }
}

/// Changed fields whose incoming value is empty. Applying one erases
/// persisted data, so the review surface marks them with a warning.
pub fn clearing_fields(outcome: &Outcome) -> Vec<&'static str> {
    match outcome {
        Outcome::Update { new, changed, .. } => changed
            .iter()
            .copied()
            .filter(|field| clean(new.get(field)).is_none())
            .collect(),
        _ => Vec::new(),
    }
}
