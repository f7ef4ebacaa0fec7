//! I/O error types for ddtw-io.

use std::path::PathBuf;

use ddtw_core::{PathError, SignalError};

/// Errors from file I/O, CSV parsing, and result serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a row has an empty id cell.
    #[error("missing signal id in {path}: row {row_index}")]
    MissingSignalId {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
    },

    /// Returned when a row carries an id but no samples.
    #[error("signal \"{signal_id}\" in {path} has no samples")]
    EmptySignal {
        /// Path to the CSV file.
        path: PathBuf,
        /// Id of the offending row.
        signal_id: String,
    },

    /// Returned when a cell value is NaN, Inf, or otherwise not a finite float.
    #[error("non-finite value in {path}: row {row_index}, column {col_index}, raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Zero-based column index (excluding the id column).
        col_index: usize,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned when the same signal id appears more than once.
    #[error("duplicate signal id \"{signal_id}\" in {path}: first at row {first_row}, again at row {second_row}")]
    DuplicateSignalId {
        /// Path to the CSV file.
        path: PathBuf,
        /// The duplicated id.
        signal_id: String,
        /// Zero-based row index of the first occurrence.
        first_row: usize,
        /// Zero-based row index of the second occurrence.
        second_row: usize,
    },

    /// Returned when a row's samples do not form a valid signal.
    #[error("signal \"{signal_id}\" in {path} is invalid")]
    InvalidSignal {
        /// Path to the CSV file.
        path: PathBuf,
        /// Id of the offending row.
        signal_id: String,
        /// Underlying validation error.
        source: SignalError,
    },

    /// Returned when a requested signal id is not in the dataset.
    #[error("unknown signal id \"{signal_id}\"")]
    UnknownSignalId {
        /// The id that was requested.
        signal_id: String,
    },

    /// Returned when an operation needs more signals than the dataset holds.
    #[error("need at least {needed} signals, dataset has {got}")]
    TooFewSignals {
        /// Number of signals required.
        needed: usize,
        /// Number of signals available.
        got: usize,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when an artifact cannot be serialized to JSON.
    #[error("cannot serialize {path}")]
    Serialize {
        /// Destination path of the artifact.
        path: PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors from building figures.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// The warping path does not fit the sequences being resampled.
    #[error("cannot resample along path: {0}")]
    Path(#[from] PathError),
}
