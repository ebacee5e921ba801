//! Core data types for probe library design.
//!
//! - [`GenomicRecord`](types::GenomicRecord): a candidate binding site `(start, end, sequence)`
//! - [`Barcode`](types::Barcode): a barcode or readout (RT) sequence, one per locus
//! - [`PrimerPair`](types::PrimerPair): the universal primers shared by the whole library
//! - [`Locus`](locus::Locus): one genomic locus and its probes, tagged with its construction stage
//! - [`Library`](library::Library): the ordered collection of loci
//!
//! ## Probe Layout
//!
//! A finished primary probe reads, 5' to 3':
//!
//! ```text
//! <fw primer> <barcode x L> <genomic core> <barcode x R> <rev primer> [<completion>]
//! ```
//!
//! where `L`/`R` depend on the number of barcodes per probe and the optional
//! completion is only present when probe lengths had to be equalized.

pub mod library;
pub mod locus;
pub mod types;
