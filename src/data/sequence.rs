//! Datasets of symbol sequences
//!
//! JSON input is an array of sequences. Sequences of vectors look like
//! `[[[0.0, 1.0], [0.5, 1.5]], [[2.0, 0.0]]]`; sequences of labels look like
//! `[[0, 1, 0], [1, 1]]`.

use crate::core::{KernelError, Result, Sequence};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Non-empty list of non-empty sequences
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDataset<S> {
    sequences: Vec<Sequence<S>>,
}

impl<S> SequenceDataset<S> {
    /// Wrap already loaded sequences
    ///
    /// # Errors
    /// Returns `InvalidInput` if there are no sequences or one of them is empty
    pub fn new(sequences: Vec<Sequence<S>>) -> Result<Self> {
        if sequences.is_empty() {
            return Err(KernelError::InvalidInput(
                "dataset doesn't contain any sequence".to_string(),
            ));
        }
        if let Some(i) = sequences.iter().position(|s| s.is_empty()) {
            return Err(KernelError::InvalidInput(format!("sequence {i} is empty")));
        }
        Ok(Self { sequences })
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Always false, datasets are never empty
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn sequences(&self) -> &[Sequence<S>] {
        &self.sequences
    }

    /// Length of the longest sequence
    pub fn max_length(&self) -> usize {
        self.sequences.iter().map(|s| s.len()).max().unwrap_or(0)
    }

    /// Total number of symbols over all sequences
    pub fn total_symbols(&self) -> usize {
        self.sequences.iter().map(|s| s.len()).sum()
    }

    pub fn into_sequences(self) -> Vec<Sequence<S>> {
        self.sequences
    }
}

impl<S: DeserializeOwned> SequenceDataset<S> {
    /// Load a dataset from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(KernelError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_json_reader(reader)
    }

    /// Load a dataset from a JSON reader
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let sequences: Vec<Sequence<S>> = serde_json::from_reader(reader)
            .map_err(|e| KernelError::ParseError(format!("Invalid sequence data: {e}")))?;
        Self::new(sequences)
    }

    /// Load a dataset from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json_reader(json.as_bytes())
    }
}

impl SequenceDataset<Vec<f64>> {
    /// Common length of every symbol vector
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if two symbols differ in length
    pub fn symbol_dimension(&self) -> Result<usize> {
        let dim = self.sequences[0][0].len();
        for symbol in self.sequences.iter().flatten() {
            if symbol.len() != dim {
                return Err(KernelError::DimensionMismatch {
                    expected: dim,
                    actual: symbol.len(),
                });
            }
        }
        Ok(dim)
    }
}
