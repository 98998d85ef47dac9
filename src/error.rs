use thiserror::Error;

use crate::executor::ImportAborted;

#[derive(Error, Debug)]
pub enum KassaError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not read spreadsheet: {0}")]
    SheetDecode(String),

    #[error("No import profile named '{0}'")]
    UnknownProfile(String),

    #[error("An import profile named '{0}' already exists")]
    ProfileNameConflict(String),

    #[error("Column '{0}' not found in the sheet")]
    MissingColumn(String),

    #[error("{0}")]
    Import(#[from] ImportAborted),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, KassaError>;
