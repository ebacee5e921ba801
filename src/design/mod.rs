//! The probe library design engine.
//!
//! A design runs these stages, in order, over every locus of a [`Library`]:
//!
//! 1. [`partition`]: reduce the genomic records to the library region and
//!    cut it into loci, either by fixed locus length or by fixed probe count
//! 2. [`selection`]: keep at most `nbr_probe_by_locus` records per locus,
//!    randomly subsampled and returned in genomic order
//! 3. [`assembly`]: wrap each genomic core with the locus barcode/RT, then
//!    with the universal primers
//! 4. [`normalize`]: measure the probe length spread and, above the
//!    threshold, complete short probes at their 3' end with random nucleotides
//!
//! [`pipeline::design_library`] chains the stages. The only random draws are
//! made in stages 2 and 4, from the generator passed by the caller.
//!
//! [`Library`]: crate::core::library::Library

pub mod assembly;
pub mod error;
pub mod normalize;
pub mod partition;
pub mod pipeline;
pub mod selection;

pub use error::DesignError;
