//! Loading of sequence datasets
//!
//! Sequences of vectors and sequences of labels can be read from JSON; label
//! sequences can also be read from plain text, one sequence per line.

pub mod sequence;
pub mod text;

pub use self::sequence::*;
pub use self::text::*;
