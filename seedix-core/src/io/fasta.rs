//! FASTA/FASTQ input
//!
//! Loads sequence files into a [`SequenceSet`] using the needletail parser.
//! Gzipped input is detected by the `.gz` extension.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use needletail::{parse_fastx_file, parse_fastx_reader, FastxReader};
use thiserror::Error;

use crate::error::IndexError;
use crate::sequence::SequenceSet;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty file or no sequences found")]
    EmptyFile,
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Read every record of a FASTA/FASTQ file
pub fn read_sequences<P: AsRef<Path>>(path: P) -> Result<SequenceSet, FastaError> {
    let path = path.as_ref();
    log::debug!("Reading sequences from {}", path.display());
    let reader = if path.to_string_lossy().ends_with(".gz") {
        let decoder = GzDecoder::new(File::open(path)?);
        parse_fastx_reader(BufReader::new(decoder))
    } else {
        parse_fastx_file(path)
    }
    .map_err(|e| FastaError::Parse(e.to_string()))?;

    collect(reader)
}

/// Read FASTA/FASTQ data from any readable source
pub fn read_sequences_from<R: Read + Send + 'static>(reader: R) -> Result<SequenceSet, FastaError> {
    let reader = parse_fastx_reader(reader).map_err(|e| FastaError::Parse(e.to_string()))?;
    collect(reader)
}

fn collect(mut reader: Box<dyn FastxReader>) -> Result<SequenceSet, FastaError> {
    let mut seqs = SequenceSet::new();
    while let Some(record) = reader.next() {
        let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;
        let id = String::from_utf8_lossy(record.id());
        // keep only the first word of the header
        let name = id.split_whitespace().next().unwrap_or_default().to_string();
        seqs.push(name, &record.seq())?;
    }

    if seqs.is_empty() {
        return Err(FastaError::EmptyFile);
    }
    log::debug!("Read {} sequences, {} letters", seqs.len(), seqs.letters());
    Ok(seqs)
}
