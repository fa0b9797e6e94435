//! On-disk cache of Path Kernel weight tables
//!
//! Each `(CHV, CD)` pair owns one record in the cache directory, named
//! `wmat_CHV_{chv}_CD_{cd}.bin` with both costs printed in scientific notation
//! with 10 fractional digits (`3.0000000000e-01`), so that kernels with equal
//! parameters address the same file.
//!
//! Record layout, little-endian:
//! - dimension `D` as `u64`
//! - `D * D` entries as `f64`, row-major
//!
//! Records are only ever replaced by larger tables. There is no locking: callers
//! sharing a directory between processes must serialize access themselves.

use crate::kernel::WeightTable;
use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

const HEADER_LEN: u64 = 8;
const ENTRY_LEN: u64 = 8;

/// State of the record on disk for one parameter pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// No file exists
    Missing,
    /// A well-formed record of the given dimension
    Valid(usize),
    /// The file is shorter or longer than its header declares
    Corrupt,
}

/// Weight-table cache rooted at a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightCache {
    location: PathBuf,
    writable: bool,
}

impl WeightCache {
    /// Create a cache over `location`. Reading is always allowed; writing only
    /// when `writable` is set.
    pub fn new<P: Into<PathBuf>>(location: P, writable: bool) -> Self {
        Self {
            location: location.into(),
            writable,
        }
    }

    /// Cache directory
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Whether records may be written
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Path of the record for a parameter pair
    pub fn record_path(&self, chv: f64, cd: f64) -> PathBuf {
        self.location.join(record_file_name(chv, cd))
    }

    /// Inspect the record for a parameter pair without reading its entries
    pub fn inspect(&self, chv: f64, cd: f64) -> io::Result<RecordState> {
        inspect_record(&self.record_path(chv, cd))
    }

    /// Write `table` unless an equal or larger record already exists
    ///
    /// Returns whether a record was written. Fails only on I/O errors; a read-only
    /// cache returns `Ok(false)`.
    pub fn save_table(&self, table: &WeightTable) -> io::Result<bool> {
        if !self.writable {
            debug!("Weight cache {:?} is read-only, not saving", self.location);
            return Ok(false);
        }

        let path = self.record_path(table.chv(), table.cd());
        match inspect_record(&path)? {
            RecordState::Valid(stored) if stored >= table.dimension() => {
                debug!(
                    "Record {:?} already holds dimension {} >= {}, not saving",
                    path,
                    stored,
                    table.dimension()
                );
                return Ok(false);
            }
            RecordState::Corrupt => {
                warn!("Overwriting corrupt weight record {path:?}");
            }
            _ => {}
        }

        write_record(&path, table.rows())?;
        debug!(
            "Saved weight table of dimension {} to {:?}",
            table.dimension(),
            path
        );
        Ok(true)
    }

    /// Read the record for `(chv, cd)` if it is larger than `current_dim`
    pub fn load_table(
        &self,
        chv: f64,
        cd: f64,
        current_dim: usize,
    ) -> io::Result<Option<WeightTable>> {
        let path = self.record_path(chv, cd);
        match inspect_record(&path)? {
            RecordState::Missing => {
                debug!("No weight record at {path:?}");
                Ok(None)
            }
            RecordState::Corrupt => {
                warn!("Ignoring corrupt weight record {path:?}");
                Ok(None)
            }
            RecordState::Valid(stored) if stored <= current_dim => {
                debug!("Record {path:?} holds dimension {stored} <= {current_dim}, not loading");
                Ok(None)
            }
            RecordState::Valid(_) => {
                let rows = read_record(&path)?;
                debug!(
                    "Loaded weight table of dimension {} from {:?}",
                    rows.len(),
                    path
                );
                Ok(Some(WeightTable::from_rows(chv, cd, rows)))
            }
        }
    }
}

/// File name of the record for a parameter pair
pub fn record_file_name(chv: f64, cd: f64) -> String {
    format!("wmat_CHV_{}_CD_{}.bin", scientific(chv), scientific(cd))
}

/// Format like C's `%.10e`: ten fractional digits, signed exponent of at least two digits
fn scientific(value: f64) -> String {
    let formatted = format!("{value:.10e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => formatted,
    }
}

fn expected_len(dim: u64) -> Option<u64> {
    dim.checked_mul(dim)?
        .checked_mul(ENTRY_LEN)?
        .checked_add(HEADER_LEN)
}

fn inspect_record(path: &Path) -> io::Result<RecordState> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RecordState::Missing),
        Err(e) => return Err(e),
    };
    let len = file.metadata()?.len();

    let mut header = [0u8; HEADER_LEN as usize];
    match file.read_exact(&mut header) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(RecordState::Corrupt),
        Err(e) => return Err(e),
    }
    let dim = u64::from_le_bytes(header);

    if dim == 0 || expected_len(dim) != Some(len) {
        return Ok(RecordState::Corrupt);
    }
    match usize::try_from(dim) {
        Ok(dim) => Ok(RecordState::Valid(dim)),
        Err(_) => Ok(RecordState::Corrupt),
    }
}

fn read_record(path: &Path) -> io::Result<Vec<Vec<f64>>> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    let dim = usize::try_from(u64::from_le_bytes(buf))
        .map_err(|_| io::Error::new(ErrorKind::InvalidData, "record dimension overflows usize"))?;

    let mut rows = Vec::with_capacity(dim);
    for _ in 0..dim {
        let mut row = Vec::with_capacity(dim);
        for _ in 0..dim {
            reader.read_exact(&mut buf)?;
            row.push(f64::from_le_bytes(buf));
        }
        rows.push(row);
    }
    Ok(rows)
}

fn write_record(path: &Path, rows: &[Vec<f64>]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&(rows.len() as u64).to_le_bytes())?;
    for row in rows {
        for value in row {
            writer.write_all(&value.to_le_bytes())?;
        }
    }
    writer.flush()
}
