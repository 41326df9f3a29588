use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook contains no sheets")]
    NoSheets,

    #[error("worksheet '{0}' has no header row")]
    MissingHeaderRow(String),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
