//! Sequence file input

pub mod fasta;

pub use fasta::{read_sequences, read_sequences_from, FastaError};
