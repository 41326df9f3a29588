use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use staffsync_core::db::DbPool;
use staffsync_core::export::project_collection;
use staffsync_core::store::{DirectoryStore, PgDirectoryStore};
use tracing::info;

use super::EntityArg;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Collection to export
    #[arg(long, value_enum, default_value = "employee")]
    pub entity: EntityArg,
    /// Destination file
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

pub async fn run(args: ExportArgs, pool: &DbPool) -> Result<()> {
    let kind = args.entity.kind();
    let store = PgDirectoryStore::new(pool.clone());
    let records = store.fetch_all(kind).await?;
    let sheet = project_collection(kind, &records);

    let bytes = staffsync_sheet::write_table(&sheet.headers, &sheet.rows)?;
    std::fs::write(&args.output, bytes)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(
        entity = kind.as_str(),
        records = records.len(),
        path = %args.output.display(),
        "export written"
    );
    Ok(())
}
