use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spreadsheet error: {0}")]
    Sheet(#[from] staffsync_sheet::SheetError),

    #[error("import aborted at chunk {chunk}: {committed} of {total} records were committed: {source}")]
    ChunkFailed {
        chunk: usize,
        committed: usize,
        total: usize,
        #[source]
        source: Box<ImportError>,
    },

    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
