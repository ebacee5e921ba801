use crate::core::library::Library;
use crate::core::locus::LocusStage;
use crate::core::types::{Barcode, Multiplicity, PrimerPair};
use crate::design::DesignError;

/// Wrap a genomic core sequence with barcode copies: `"<left> <core> <right>"`
#[must_use]
pub fn wrap_with_barcode(core: &str, barcode: &str, multiplicity: Multiplicity) -> String {
    let (left, right) = multiplicity.flank_repeats();
    format!("{} {core} {}", barcode.repeat(left), barcode.repeat(right))
}

/// Flank a barcoded sequence with the universal primers: `"<fw> <seq> <rev>"`
#[must_use]
pub fn flank_with_primers(seq: &str, primers: &PrimerPair) -> String {
    format!("{} {seq} {}", primers.fw_seq, primers.rev_seq)
}

/// Pair each locus (in order) with its own barcode/RT.
///
/// # Errors
///
/// Returns `DesignError::InsufficientBarcodes` when fewer barcodes/RTs than
/// loci are available.
pub fn pair_barcodes(
    nbr_loci_total: usize,
    barcodes: &[Barcode],
) -> Result<Vec<(usize, Barcode)>, DesignError> {
    if barcodes.len() < nbr_loci_total {
        return Err(DesignError::InsufficientBarcodes {
            requested: nbr_loci_total,
            available: barcodes.len(),
        });
    }

    Ok((1..=nbr_loci_total).zip(barcodes.iter().cloned()).collect())
}

/// Insert each locus' barcode/RT around all its core sequences
///
/// # Errors
///
/// Returns `DesignError::StageOrder` if a locus is not at `CoreSelected`.
pub fn add_rt_bcd_to_primary_seq(
    library: &mut Library,
    multiplicity: Multiplicity,
) -> Result<(), DesignError> {
    for locus in library.loci_mut() {
        let barcode = locus.barcode().sequence.clone();
        locus.transform_probes(LocusStage::CoreSelected, LocusStage::Barcoded, |core| {
            wrap_with_barcode(core, &barcode, multiplicity)
        })?;
    }
    Ok(())
}

/// Add the universal primers on both sides of every probe
///
/// # Errors
///
/// Returns `DesignError::StageOrder` if a locus is not at `Barcoded`.
pub fn add_univ_primer_each_side(library: &mut Library) -> Result<(), DesignError> {
    for locus in library.loci_mut() {
        let primers = locus.primers_univ().clone();
        locus.transform_probes(LocusStage::Barcoded, LocusStage::Primered, |seq| {
            flank_with_primers(seq, &primers)
        })?;
    }
    Ok(())
}
