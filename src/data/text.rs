//! Plain-text label sequences
//!
//! One sequence per line, symbols separated by whitespace:
//!
//! ```text
//! # weather
//! sun sun rain
//! rain cloud sun sun
//! ```
//!
//! Every distinct token becomes a label, numbered in order of first
//! appearance. Blank lines and lines starting with `#` are skipped.

use crate::core::{KernelError, Result};
use crate::data::SequenceDataset;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Mapping between symbol tokens and integer labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelAlphabet {
    labels: HashMap<String, usize>,
    tokens: Vec<String>,
}

impl LabelAlphabet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label of `token`, assigning the next free one if unseen
    pub fn intern(&mut self, token: &str) -> usize {
        if let Some(&label) = self.labels.get(token) {
            return label;
        }
        let label = self.tokens.len();
        self.labels.insert(token.to_string(), label);
        self.tokens.push(token.to_string());
        label
    }

    pub fn label(&self, token: &str) -> Option<usize> {
        self.labels.get(token).copied()
    }

    pub fn token(&self, label: usize) -> Option<&str> {
        self.tokens.get(label).map(String::as_str)
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Load labeled sequences from a text file
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<(Self, SequenceDataset<usize>)> {
        let file = File::open(path).map_err(KernelError::IoError)?;
        let reader = BufReader::new(file);
        Self::read(reader)
    }

    /// Load labeled sequences from a reader
    pub fn read<R: BufRead>(reader: R) -> Result<(Self, SequenceDataset<usize>)> {
        let mut alphabet = Self::new();
        let mut sequences = Vec::new();

        for line in reader.lines() {
            let line = line.map_err(KernelError::IoError)?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let sequence: Vec<usize> = line
                .split_whitespace()
                .map(|token| alphabet.intern(token))
                .collect();
            sequences.push(sequence);
        }

        let dataset = SequenceDataset::new(sequences)?;
        Ok((alphabet, dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_intern_in_order_of_appearance() {
        let mut alphabet = LabelAlphabet::new();
        assert!(alphabet.is_empty());

        assert_eq!(alphabet.intern("b"), 0);
        assert_eq!(alphabet.intern("a"), 1);
        assert_eq!(alphabet.intern("b"), 0);

        assert_eq!(alphabet.len(), 2);
        assert_eq!(alphabet.label("a"), Some(1));
        assert_eq!(alphabet.label("c"), None);
        assert_eq!(alphabet.token(0), Some("b"));
        assert_eq!(alphabet.token(2), None);
    }

    #[test]
    fn test_read_sequences() {
        let data = "# weather\nsun sun rain\n\n  rain cloud sun sun  \n";
        let (alphabet, dataset) = LabelAlphabet::read(Cursor::new(data)).unwrap();

        assert_eq!(alphabet.len(), 3);
        let expected: Vec<Vec<usize>> = vec![vec![0, 0, 1], vec![1, 2, 0, 0]];
        assert_eq!(dataset.into_sequences(), expected);
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "a b a b").expect("Failed to write");
        writeln!(file, "b a b a b").expect("Failed to write");
        file.flush().expect("Failed to flush");

        let (alphabet, dataset) = LabelAlphabet::read_file(file.path()).unwrap();
        assert_eq!(alphabet.len(), 2);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.max_length(), 5);
    }

    #[test]
    fn test_only_comments_is_empty_dataset() {
        let data = "# nothing here\n\n";
        let result = LabelAlphabet::read(Cursor::new(data));
        assert!(matches!(result, Err(KernelError::InvalidInput(_))));
    }
}
