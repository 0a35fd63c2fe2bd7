use thiserror::Error;

/// Boxed error returned by a service implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by worksheet and spreadsheet operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// The fetched range has no rows, so there is no header to index
    #[error("no header row in range {range} of spreadsheet {key}")]
    EmptyRange { key: String, range: String },

    /// A sheet title is missing from the spreadsheet metadata
    #[error("sheet {title} not found in spreadsheet {key}")]
    SheetNotFound { key: String, title: String },

    /// Two header cells carry the same name
    #[error("duplicate header {name:?} in columns {first} and {second}")]
    DuplicateHeader {
        name: String,
        first: usize,
        second: usize,
    },

    /// A record was given a field that is not in the header row
    #[error("unknown field {0:?}")]
    UnknownField(String),

    /// A projected row was replaced with a record built for another header
    #[error("row {row} holds a record from a different header")]
    StaleRecord { row: usize },

    /// The remote service call failed; local state was left untouched
    #[error("remote call failed: {0}")]
    RemoteCall(#[source] BoxError),
}

impl SyncError {
    pub fn remote(err: impl Into<BoxError>) -> Self {
        SyncError::RemoteCall(err.into())
    }
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
