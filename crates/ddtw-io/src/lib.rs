//! File I/O, validation, serialization, and figures for the ddtw pipeline.

mod domain;
mod error;
mod plot;
mod reader;
mod writer;

pub use domain::{Dataset, ExperimentName, SignalId};
pub use error::{IoError, PlotError};
pub use plot::{
    ALIGNED_SIGNALS_TITLE, ALIGNMENT_PATH_TITLE, Figure, LineSeries, RAW_SIGNALS_TITLE,
    plot_aligned_signals, plot_alignment_path, plot_raw_signals,
};
pub use reader::SignalReader;
pub use writer::ResultWriter;
