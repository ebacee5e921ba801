//! Readers for the design inputs.
//!
//! - **Genomic records**: tab-separated candidate probes (OligoMiner-style BED,
//!   `chrom  start  end  sequence  ...`), plain or gzip-compressed
//! - **Barcodes/RTs**: `name,sequence` per line, consumed in file order
//! - **Universal primers**: `set,fw_name,fw_seq,rev_name,rev_seq` per line
//!
//! ## Example
//!
//! ```rust,no_run
//! use probe_designer::parsing::{barcodes, genomic, primers};
//! use std::path::Path;
//!
//! let records = genomic::parse_genomic_file(Path::new("chr3L.bed")).unwrap();
//! let barcodes = barcodes::parse_barcode_file(Path::new("Barcodes.csv")).unwrap();
//! let table = primers::parse_primer_file(Path::new("Primer_univ.csv")).unwrap();
//! let pair = table.select("primer1").unwrap();
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

pub mod barcodes;
pub mod genomic;
pub mod primers;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format on line {line}: {message}")]
    InvalidLine { line: usize, message: String },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl ParseError {
    pub(crate) fn line(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidLine {
            line,
            message: message.into(),
        }
    }
}

/// Check if a file is gzip-compressed based on extension
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// Open a text file, decompressing it on the fly when it ends in `.gz`
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn open_text(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = File::open(path)?;
    let reader: Box<dyn Read> = if is_gzipped(path) {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(reader)))
}

/// Read the whole (possibly compressed) file into a string
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or is not UTF-8.
pub fn read_text(path: &Path) -> Result<String, ParseError> {
    let mut content = String::new();
    open_text(path)?.read_to_string(&mut content)?;
    Ok(content)
}

/// Non-empty, non-comment lines with their 1-based line numbers
pub(crate) fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
}
