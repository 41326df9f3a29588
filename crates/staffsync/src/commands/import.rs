use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use staffsync_core::commit::{commit_plan, CommitOutcome, SourceFile};
use staffsync_core::db::DbPool;
use staffsync_core::diff::Outcome;
use staffsync_core::plan::{prepare_rows, reconcile};
use staffsync_core::selection::FieldSelection;
use staffsync_core::store::{DirectoryStore, PgDirectoryStore};
use tracing::{info, warn};

use super::EntityArg;
use crate::review;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the spreadsheet (.xlsx or .csv)
    pub file: PathBuf,
    /// Collection to import into
    #[arg(long, value_enum, default_value = "employee")]
    pub entity: EntityArg,
    /// Review the plan without writing anything
    #[arg(long)]
    pub dry_run: bool,
    /// Also apply changes that clear persisted values
    #[arg(long)]
    pub include_clearing: bool,
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub async fn run(args: ImportArgs, pool: &DbPool) -> Result<()> {
    let contents = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());
    let source = SourceFile {
        file_name,
        file_size: contents.len() as u64,
    };

    let kind = args.entity.kind();
    let raw_rows = staffsync_sheet::read_first_sheet(&contents)?;
    let prepared = prepare_rows(kind, &raw_rows);

    if prepared.dropped_missing_key > 0 {
        warn!(
            dropped = prepared.dropped_missing_key,
            "rows without a value in the key column were dropped"
        );
    }
    if prepared.is_empty() {
        println!("no valid data to import");
        return Ok(());
    }

    let store = PgDirectoryStore::new(pool.clone());
    let persisted = store.fetch_by_keys(kind, &prepared.natural_keys()).await?;
    let plan = reconcile(prepared, &persisted);

    let mut selection = FieldSelection::default_for_plan(&plan);
    if args.include_clearing {
        for row in plan.updates() {
            if let Outcome::Update { changed, .. } = &row.outcome {
                selection.select_all(&row.key, changed);
            }
        }
    }

    review::print_plan(&plan, &selection);

    if args.dry_run {
        println!("dry run: nothing written");
        return Ok(());
    }
    if !args.yes && !confirm()? {
        println!("import aborted");
        return Ok(());
    }

    let outcome = commit_plan(&store, &source, &plan, &selection, |progress| {
        info!(
            file = %progress.file_name,
            percent = progress.progress_percent,
            "import progress"
        );
    })
    .await?;

    match outcome {
        CommitOutcome::NothingToImport => println!("nothing to import"),
        CommitOutcome::Committed(report) => {
            println!("{}", report.summary);
            info!(
                entity = kind.as_str(),
                records_written = report.records_written,
                collection_size = report.collection.len(),
                "import committed"
            );
        }
    }
    Ok(())
}

fn confirm() -> Result<bool> {
    print!("apply these changes? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
