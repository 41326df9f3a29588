use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use staffsync_core::diff::Outcome;
use staffsync_core::plan::ImportPlan;
use staffsync_core::selection::{clearing_fields, FieldSelection};

/// Print the reviewed plan: the create/update/ignore summary, a per-field
/// table for the pending updates, and the advisory issue list.
pub fn print_plan(plan: &ImportPlan, selection: &FieldSelection) {
    println!("{}", plan.summary());
    if plan.dropped_missing_key > 0 {
        println!("rows dropped for missing key: {}", plan.dropped_missing_key);
    }

    if let Some(table) = updates_table(plan, selection) {
        println!("{table}");
    }

    for issue in &plan.issues {
        println!("row {}: {}", issue.row_index, issue.message);
    }
}

fn updates_table(plan: &ImportPlan, selection: &FieldSelection) -> Option<Table> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["row", "key", "field", "current", "incoming", "action"]);

    let mut any = false;
    for row in plan.updates() {
        let Outcome::Update { old, new, changed } = &row.outcome else {
            continue;
        };
        let clearing = clearing_fields(&row.outcome);
        for field in changed {
            any = true;
            let action = match (selection.is_selected(&row.key, field), clearing.contains(field)) {
                (true, true) => "apply (clears value)",
                (true, false) => "apply",
                (false, true) => "skip (would clear)",
                (false, false) => "skip",
            };
            table.add_row(vec![
                Cell::new(row.row_index),
                Cell::new(&row.key),
                Cell::new(field),
                Cell::new(old.get(field).unwrap_or("")),
                Cell::new(new.get(field).unwrap_or("")),
                Cell::new(action),
            ]);
        }
    }

    any.then_some(table)
}
