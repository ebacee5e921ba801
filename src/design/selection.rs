use rand::seq::index;
use rand::Rng;
use tracing::debug;

use crate::core::library::Library;
use crate::core::types::GenomicRecord;
use crate::design::DesignError;

/// Reduce the candidates of a locus to at most `nbr_probe_by_locus` records.
///
/// When there are more candidates than needed, a uniform sample without
/// replacement is drawn and returned in genomic order. Otherwise every
/// candidate is kept, which leaves the locus under-filled.
///
/// `candidates` must be sorted by start.
pub fn select_probes<R: Rng + ?Sized>(
    candidates: Vec<GenomicRecord>,
    nbr_probe_by_locus: usize,
    rng: &mut R,
) -> Vec<GenomicRecord> {
    if candidates.len() <= nbr_probe_by_locus {
        return candidates;
    }

    let mut picked = index::sample(rng, candidates.len(), nbr_probe_by_locus).into_vec();
    picked.sort_unstable();

    let mut candidates: Vec<Option<GenomicRecord>> = candidates.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|i| candidates[i].take())
        .collect()
}

/// Select the core sequences of every locus of the library
///
/// # Errors
///
/// Returns `DesignError::StageOrder` if a locus has no candidates assigned.
pub fn select_library_probes<R: Rng + ?Sized>(
    library: &mut Library,
    nbr_probe_by_locus: usize,
    rng: &mut R,
) -> Result<(), DesignError> {
    for locus in library.loci_mut() {
        let available = locus.candidates().len();
        locus.set_core_sequences(|candidates| {
            select_probes(candidates, nbr_probe_by_locus, &mut *rng)
        })?;

        if available < nbr_probe_by_locus {
            debug!(
                locus = locus.locus_n,
                available,
                requested = nbr_probe_by_locus,
                "Locus is under-filled"
            );
        }
    }
    Ok(())
}
