//! Domain types for ddtw-io.

use std::fmt;

use ddtw_core::Signal;

use crate::IoError;

/// Identifier of a signal, taken from the first column of the input CSV.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalId(String);

impl SignalId {
    pub(crate) fn new(id: String) -> Self {
        debug_assert!(!id.is_empty(), "signal ID must not be empty");
        Self(id)
    }

    /// Return the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named signals read from a CSV file. `ids[i]` labels `signals[i]`.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Signal ids in file order.
    pub ids: Vec<SignalId>,
    /// Signals in file order. Lengths may differ.
    pub signals: Vec<Signal>,
}

impl Dataset {
    /// Number of signals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Return true if the dataset holds no signals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Look up a signal by id.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownSignalId`] if no row carries `id`.
    pub fn get(&self, id: &str) -> Result<(&SignalId, &Signal), IoError> {
        self.ids
            .iter()
            .position(|s| s.as_str() == id)
            .map(|i| (&self.ids[i], &self.signals[i]))
            .ok_or_else(|| IoError::UnknownSignalId {
                signal_id: id.to_string(),
            })
    }

    /// Pick two signals by id, defaulting to the first two rows when an id is `None`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::UnknownSignalId`] | A requested id is absent |
    /// | [`IoError::TooFewSignals`] | A default is needed but the dataset has fewer than two rows |
    pub fn pair(
        &self,
        first: Option<&str>,
        second: Option<&str>,
    ) -> Result<[(&SignalId, &Signal); 2], IoError> {
        let by_row = |row: usize| {
            self.ids
                .get(row)
                .zip(self.signals.get(row))
                .ok_or(IoError::TooFewSignals {
                    needed: 2,
                    got: self.len(),
                })
        };
        let a = match first {
            Some(id) => self.get(id)?,
            None => by_row(0)?,
        };
        let b = match second {
            Some(id) => self.get(id)?,
            None => by_row(1)?,
        };
        Ok([a, b])
    }
}
