use staffsync_core::commit::{commit_plan, CommitOutcome, SourceFile};
use staffsync_core::diff::Outcome;
use staffsync_core::plan::{prepare_rows, reconcile};
use staffsync_core::schema::EntityKind;
use staffsync_core::selection::FieldSelection;
use staffsync_core::store::{DirectoryStore, MemoryStore};
use staffsync_sheet::{RawCell, RawRow};

fn employee_row(row_index: usize, id: &str, name: &str, title: Option<&str>) -> RawRow {
    let mut row = RawRow::new(row_index);
    row.insert("الرقم الوظيفي", RawCell::Text(id.to_string()));
    row.insert("الاسم باللغة العربية", RawCell::Text(name.to_string()));
    if let Some(title) = title {
        row.insert("المسمى الوظيفي", RawCell::Text(title.to_string()));
    }
    row
}

fn source() -> SourceFile {
    SourceFile {
        file_name: "staff.xlsx".to_string(),
        file_size: 1024,
    }
}

async fn run_import(store: &MemoryStore, raw: &[RawRow]) -> CommitOutcome {
    let prepared = prepare_rows(EntityKind::Employee, raw);
    let keys = prepared.natural_keys();
    let persisted = store
        .fetch_by_keys(EntityKind::Employee, &keys)
        .await
        .expect("fetch persisted");
    let plan = reconcile(prepared, &persisted);
    let selection = FieldSelection::default_for_plan(&plan);
    commit_plan(store, &source(), &plan, &selection, |_| {})
        .await
        .expect("commit")
}

#[tokio::test]
async fn importing_the_same_sheet_twice_is_idempotent() {
    let store = MemoryStore::new();
    let raw = vec![
        employee_row(2, "1", "أحمد", Some("محلل")),
        employee_row(3, "2", "سارة", None),
    ];

    match run_import(&store, &raw).await {
        CommitOutcome::Committed(report) => {
            assert_eq!(report.summary.create, 2);
            assert_eq!(report.collection.len(), 2);
        }
        CommitOutcome::NothingToImport => panic!("first import must write"),
    }

    // Second pass: every row matches what was just written, so the diff
    // engine classifies everything as ignore and nothing reaches the store.
    match run_import(&store, &raw).await {
        CommitOutcome::NothingToImport => {}
        CommitOutcome::Committed(_) => panic!("re-import must be a no-op"),
    }
    assert_eq!(store.upsert_chunk_sizes(), vec![2]);
}

#[tokio::test]
async fn duplicate_keys_collapse_and_only_the_last_row_lands() {
    let store = MemoryStore::new();
    let raw = vec![
        employee_row(2, "1", "أحمد", None),
        employee_row(3, "1", "محمد", None),
        employee_row(4, "2", "سارة", None),
    ];

    match run_import(&store, &raw).await {
        CommitOutcome::Committed(report) => {
            assert_eq!(report.summary.create, 2);
            let names: Vec<_> = report
                .collection
                .iter()
                .filter_map(|record| record.get("full_name_ar"))
                .collect();
            assert_eq!(names, vec!["محمد", "سارة"]);
        }
        CommitOutcome::NothingToImport => panic!("expected writes"),
    }
}

#[tokio::test]
async fn advisory_issues_never_block_the_commit() {
    let store = MemoryStore::new();
    let mut row = RawRow::new(2);
    row.insert("الرقم الوظيفي", RawCell::Text("7".to_string()));
    // required Arabic name left blank

    let prepared = prepare_rows(EntityKind::Employee, &[row]);
    assert_eq!(prepared.issues.len(), 1);

    let plan = reconcile(prepared, &[]);
    let selection = FieldSelection::default_for_plan(&plan);
    let outcome = commit_plan(&store, &source(), &plan, &selection, |_| {})
        .await
        .expect("commit");

    match outcome {
        CommitOutcome::Committed(report) => assert_eq!(report.summary.create, 1),
        CommitOutcome::NothingToImport => panic!("flagged rows still import"),
    }
}

#[tokio::test]
async fn updates_apply_only_selected_fields() {
    let store = MemoryStore::new();
    let first = vec![employee_row(2, "1", "أحمد", Some("محلل"))];
    run_import(&store, &first).await;

    // Incoming sheet renames and clears the title. The default selection
    // takes the rename but refuses the clear.
    let mut second = RawRow::new(2);
    second.insert("الرقم الوظيفي", RawCell::Text("1".to_string()));
    second.insert("الاسم باللغة العربية", RawCell::Text("أحمد علي".to_string()));

    let prepared = prepare_rows(EntityKind::Employee, &[second]);
    let keys = prepared.natural_keys();
    let persisted = store
        .fetch_by_keys(EntityKind::Employee, &keys)
        .await
        .expect("fetch persisted");
    let plan = reconcile(prepared, &persisted);

    match &plan.outcomes[0].outcome {
        Outcome::Update { changed, .. } => {
            assert!(changed.contains(&"full_name_ar"));
            assert!(changed.contains(&"job_title"));
        }
        other => panic!("expected update, got {}", other.label()),
    }

    let selection = FieldSelection::default_for_plan(&plan);
    let outcome = commit_plan(&store, &source(), &plan, &selection, |_| {})
        .await
        .expect("commit");

    match outcome {
        CommitOutcome::Committed(report) => {
            let record = &report.collection[0];
            assert_eq!(record.get("full_name_ar"), Some("أحمد علي"));
            // The clearing change stayed unselected.
            assert_eq!(record.get("job_title"), Some("محلل"));
        }
        CommitOutcome::NothingToImport => panic!("expected an update"),
    }
}
