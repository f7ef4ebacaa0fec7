//! CSV signal reader with full input validation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ddtw_core::{Signal, SignalError};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{Dataset, SignalId};

/// Reads named signals from a CSV file.
///
/// Expected CSV format:
/// - Header row required (first column is the signal id, remaining are positional samples)
/// - `id,t0,t1,...,tn`
/// - One row per signal. Rows may be shorter than the header; trailing empty
///   cells are ignored so signals of different lengths can share a file.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::MissingSignalId`] | Row has an empty id cell |
/// | [`IoError::EmptySignal`] | Row has an id but no samples |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, unparseable, or an interior blank |
/// | [`IoError::DuplicateSignalId`] | Same id appears twice |
/// | [`IoError::InvalidSignal`] | Samples are rejected by [`Signal::new`] for another reason |
pub struct SignalReader {
    path: PathBuf,
}

impl SignalReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) lets ragged rows through; lengths are validated per row below.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?;
        debug!(header_cols = header.len(), "read CSV header");

        let mut ids = Vec::new();
        let mut signals = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            let id = record.get(0).unwrap_or("").to_string();
            if id.is_empty() {
                return Err(IoError::MissingSignalId {
                    path: self.path.clone(),
                    row_index,
                });
            }

            if let Some(&first_row) = seen.get(&id) {
                return Err(IoError::DuplicateSignalId {
                    path: self.path.clone(),
                    signal_id: id,
                    first_row,
                    second_row: row_index,
                });
            }
            seen.insert(id.clone(), row_index);

            let cells: Vec<&str> = record.iter().skip(1).collect();
            let n_samples = cells.len() - cells.iter().rev().take_while(|c| c.is_empty()).count();
            if n_samples == 0 {
                return Err(IoError::EmptySignal {
                    path: self.path.clone(),
                    signal_id: id,
                });
            }

            let cells = &cells[..n_samples];
            let non_finite = |col_index: usize| IoError::NonFiniteValue {
                path: self.path.clone(),
                row_index,
                col_index,
                raw: cells[col_index].to_string(),
            };

            let values = cells
                .iter()
                .enumerate()
                .map(|(col_index, raw)| raw.parse::<f64>().map_err(|_| non_finite(col_index)))
                .collect::<Result<Vec<_>, _>>()?;

            // "NaN" and "inf" parse as floats; Signal rejects them.
            let signal = Signal::new(values).map_err(|source| match source {
                SignalError::NonFiniteValue { index } => non_finite(index),
                source => IoError::InvalidSignal {
                    path: self.path.clone(),
                    signal_id: id.clone(),
                    source,
                },
            })?;

            ids.push(SignalId::new(id));
            signals.push(signal);
        }

        if ids.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_signals = ids.len(),
            max_len = signals.iter().map(Signal::len).max().unwrap_or(0),
            "dataset loaded"
        );

        Ok(Dataset { ids, signals })
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_ragged_rows() {
        let file = write_csv("id,t0,t1,t2,t3\na,1,2,3,4\nb,5,6,7,\n");
        let ds = SignalReader::new(file.path()).read().unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.signals[0].as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(ds.signals[1].as_slice(), &[5.0, 6.0, 7.0]);
    }

    #[test]
    fn short_rows_without_trailing_commas() {
        let file = write_csv("id,t0,t1,t2\na,1,2,3\nb,4,5\n");
        let ds = SignalReader::new(file.path()).read().unwrap();
        assert_eq!(ds.signals[1].len(), 2);
    }

    #[test]
    fn missing_file() {
        let result = SignalReader::new(Path::new("/definitely/not/here.csv")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn header_only_is_empty() {
        let file = write_csv("id,t0,t1\n");
        let result = SignalReader::new(file.path()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn duplicate_id() {
        let file = write_csv("id,t0,t1,t2\na,1,2,3\na,4,5,6\n");
        let result = SignalReader::new(file.path()).read();
        assert!(matches!(
            result,
            Err(IoError::DuplicateSignalId {
                first_row: 0,
                second_row: 1,
                ..
            })
        ));
    }

    #[test]
    fn non_finite_cell() {
        let file = write_csv("id,t0,t1,t2\na,1,NaN,3\n");
        let result = SignalReader::new(file.path()).read();
        assert!(matches!(
            result,
            Err(IoError::NonFiniteValue {
                row_index: 0,
                col_index: 1,
                ..
            })
        ));
    }

    #[test]
    fn infinite_cell() {
        let file = write_csv("id,t0,t1,t2\na,1,2,3\nb,4,5,-inf\n");
        let result = SignalReader::new(file.path()).read();
        match result {
            Err(IoError::NonFiniteValue {
                row_index,
                col_index,
                raw,
                ..
            }) => {
                assert_eq!((row_index, col_index), (1, 2));
                assert_eq!(raw, "-inf");
            }
            other => panic!("expected NonFiniteValue, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_cell() {
        let file = write_csv("id,t0,t1,t2\na,1,two,3\n");
        let result = SignalReader::new(file.path()).read();
        assert!(matches!(
            result,
            Err(IoError::NonFiniteValue { col_index: 1, .. })
        ));
    }

    #[test]
    fn interior_blank_cell() {
        let file = write_csv("id,t0,t1,t2\na,1,,3\n");
        let result = SignalReader::new(file.path()).read();
        assert!(matches!(
            result,
            Err(IoError::NonFiniteValue { col_index: 1, .. })
        ));
    }

    #[test]
    fn row_without_samples() {
        let file = write_csv("id,t0,t1\na,,\n");
        let result = SignalReader::new(file.path()).read();
        assert!(matches!(result, Err(IoError::EmptySignal { .. })));
    }

    #[test]
    fn blank_id() {
        let file = write_csv("id,t0,t1\n,1,2\n");
        let result = SignalReader::new(file.path()).read();
        assert!(matches!(
            result,
            Err(IoError::MissingSignalId { row_index: 0, .. })
        ));
    }
}
