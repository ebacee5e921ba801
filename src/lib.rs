//! # probe-designer
//!
//! A library for designing oligo-pool libraries of barcoded FISH probes.
//!
//! Multiplexed DNA-FISH experiments image many genomic loci of one chromosome
//! with a single pool of oligonucleotides. Every locus gets its own barcode/RT
//! (readout) sequence so it can be revealed independently, and every probe in
//! the pool carries the same universal primers so the pool can be amplified.
//!
//! `probe-designer` takes pre-computed genomic candidate probes (for example
//! OligoMiner output), a barcode/RT list and a universal primer set, and
//! builds the synthesis-ready library:
//!
//! - **Partitioning**: fixed-length loci (`locus_length`) or fixed probe-count
//!   loci (`nbr_probes`) starting at a library start coordinate
//! - **Selection**: random subsampling of each locus' candidates, genomic order kept
//! - **Assembly**: barcode/RT copies around each core, primers on both sides
//! - **Length normalization**: random 3' padding when the length spread is too large
//!
//! ## Example
//!
//! ```rust
//! use probe_designer::{design_library, Barcode, DesignSettings, DesignType};
//! use probe_designer::{GenomicRecord, Multiplicity, PrimerPair};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let settings = DesignSettings {
//!     chromosome_name: "chr3L".to_string(),
//!     start_lib: 100,
//!     nbr_loci_total: 1,
//!     resolution: Some(300),
//!     nbr_probe_by_locus: 3,
//!     nbr_bcd_rt_by_probe: Multiplicity::Two,
//!     max_diff_percent: 10.0,
//!     design_type: DesignType::LocusLength,
//! };
//! let records = vec![
//!     GenomicRecord::new(100, 130, "A".repeat(30)),
//!     GenomicRecord::new(200, 230, "C".repeat(30)),
//!     GenomicRecord::new(300, 330, "G".repeat(30)),
//! ];
//! let barcodes = vec![Barcode::new("Bcd1", "TTTT")];
//! let primers = PrimerPair::new("primer1", "F", "PPPP", "R", "QQQQ");
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let outcome = design_library(&settings, &records, &barcodes, primers, &mut rng).unwrap();
//!
//! for probe in outcome.library.probes() {
//!     println!("{probe}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Library, locus and input record types
//! - [`design`]: Partitioning, selection, assembly and length normalization
//! - [`config`]: Run parameters file
//! - [`parsing`]: Readers for genomic records, barcodes/RTs and primer tables
//! - [`output`]: Result files
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod design;
pub mod output;
pub mod parsing;

// Re-export commonly used types for convenience
pub use config::DesignParameters;
pub use core::library::Library;
pub use core::locus::{Locus, LocusStage};
pub use core::types::*;
pub use design::normalize::LengthStats;
pub use design::pipeline::{design_library, DesignOutcome, DesignSettings};
pub use design::DesignError;
