use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::locus::{Locus, LocusStage};
use crate::design::DesignError;

/// Alphabet used for 3' completion
const COMPLETION_NUCLEOTIDES: &[u8; 4] = b"atgc";

/// Probe length spread over a whole library
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthStats {
    pub min_len: usize,
    pub max_len: usize,
    pub diff_bp: usize,
    pub diff_percent: f64,
}

/// Nucleotide length of a probe, ignoring segment delimiters
#[must_use]
pub fn probe_length(seq: &str) -> usize {
    seq.bytes().filter(|&b| b != b' ').count()
}

/// Min and max probe length, their difference, and `100 - min * 100 / max`
///
/// # Errors
///
/// Returns `DesignError::DegenerateLength` when there is no probe or the
/// longest probe is empty.
pub fn check_length_seq_diff<'a>(
    probes: impl IntoIterator<Item = &'a str>,
) -> Result<LengthStats, DesignError> {
    let (min_len, max_len) = probes
        .into_iter()
        .map(probe_length)
        .fold(None, |acc: Option<(usize, usize)>, len| match acc {
            None => Some((len, len)),
            Some((lo, hi)) => Some((lo.min(len), hi.max(len))),
        })
        .ok_or_else(|| DesignError::DegenerateLength("the library contains no probes".to_string()))?;

    if max_len == 0 {
        return Err(DesignError::DegenerateLength(
            "all probes are empty".to_string(),
        ));
    }

    #[allow(clippy::cast_precision_loss)] // probe lengths are far below 2^52
    let diff_percent = 100.0 - (min_len as f64 * 100.0 / max_len as f64);

    Ok(LengthStats {
        min_len,
        max_len,
        diff_bp: max_len - min_len,
        diff_percent,
    })
}

/// `len` uniformly drawn nucleotides from `{a, t, g, c}`
pub fn random_nucleotides<R: Rng + ?Sized>(len: usize, rng: &mut R) -> String {
    (0..len)
        .map(|_| char::from(COMPLETION_NUCLEOTIDES[rng.gen_range(0..COMPLETION_NUCLEOTIDES.len())]))
        .collect()
}

/// Complete a probe at its 3' end so it reaches `max_len` nucleotides
pub fn complete_probe<R: Rng + ?Sized>(seq: &str, max_len: usize, rng: &mut R) -> String {
    let missing = max_len.saturating_sub(probe_length(seq));
    if missing == 0 {
        seq.to_string()
    } else {
        format!("{seq} {}", random_nucleotides(missing, rng))
    }
}

/// Pad every probe of every locus to `max_len` when `diff_percent` reaches
/// `max_diff_percent`; otherwise leave the probes untouched. All loci end at
/// `LengthNormalized` either way. Returns whether padding was applied.
///
/// # Errors
///
/// Returns `DesignError::StageOrder` if a locus has not received its primers.
pub fn completion<R: Rng + ?Sized>(
    loci: &mut [Locus],
    diff_percent: f64,
    max_len: usize,
    max_diff_percent: f64,
    rng: &mut R,
) -> Result<bool, DesignError> {
    let apply = diff_percent >= max_diff_percent;

    for locus in loci.iter_mut() {
        let from = match locus.stage() {
            LocusStage::LengthNormalized => LocusStage::LengthNormalized,
            _ => LocusStage::Primered,
        };
        locus.transform_probes(from, LocusStage::LengthNormalized, |seq| {
            if apply {
                complete_probe(seq, max_len, &mut *rng)
            } else {
                seq.to_string()
            }
        })?;
    }

    if apply {
        info!(
            diff_percent,
            max_len, "Completion finished: probes padded at the 3' end"
        );
    } else {
        info!(diff_percent, "No completion required");
    }
    Ok(apply)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;
    use crate::core::types::{Barcode, GenomicRecord, PrimerPair};

    fn primered_locus(cores: &[&str]) -> Locus {
        let mut locus = Locus::new(
            1,
            "chr2R",
            0,
            1000,
            Arc::new(PrimerPair::new("primer1", "F", "PPPP", "R", "QQQQ")),
            Barcode::new("Bcd1", "TT"),
        );
        let records = cores
            .iter()
            .enumerate()
            .map(|(i, core)| GenomicRecord::new(i as u64 * 10, i as u64 * 10 + 5, *core))
            .collect();
        locus.assign_candidates(records).unwrap();
        locus.set_core_sequences(|r| r).unwrap();
        locus
            .transform_probes(LocusStage::CoreSelected, LocusStage::Barcoded, str::to_string)
            .unwrap();
        locus
            .transform_probes(LocusStage::Barcoded, LocusStage::Primered, str::to_string)
            .unwrap();
        locus
    }

    #[test]
    fn test_probe_length_ignores_delimiters() {
        assert_eq!(probe_length("PPPP TTTT ACGT TTTT QQQQ"), 20);
        assert_eq!(probe_length(""), 0);
    }

    #[test]
    fn test_check_length_seq_diff() {
        let stats = check_length_seq_diff(["AAAA AAAA", "CCCC CC", "GG GG GG GG"]).unwrap();
        assert_eq!(stats.min_len, 6);
        assert_eq!(stats.max_len, 8);
        assert_eq!(stats.diff_bp, 2);
        assert!((stats.diff_percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_check_length_seq_diff_degenerate() {
        let none: [&str; 0] = [];
        assert!(matches!(
            check_length_seq_diff(none),
            Err(DesignError::DegenerateLength(_))
        ));
        assert!(matches!(
            check_length_seq_diff(["", " "]),
            Err(DesignError::DegenerateLength(_))
        ));
    }

    #[test]
    fn test_completion_pads_at_three_prime_end() {
        let mut loci = vec![primered_locus(&["ACGTACGTAC", "ACGTAC"])];
        let originals: Vec<String> = loci[0].seq_probe().to_vec();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let applied = completion(&mut loci, 40.0, 10, 10.0, &mut rng).unwrap();
        assert!(applied);

        let padded = loci[0].seq_probe();
        assert_eq!(padded[0], originals[0]);
        let (prefix, suffix) = padded[1].split_at(originals[1].len());
        assert_eq!(prefix, originals[1]);
        assert!(suffix.starts_with(' '));
        let padding = &suffix[1..];
        assert_eq!(padding.len(), 4);
        assert!(padding.chars().all(|c| "atgc".contains(c)));
        assert!(loci[0].seq_probe().iter().all(|s| probe_length(s) == 10));
        assert_eq!(loci[0].stage(), LocusStage::LengthNormalized);
    }

    #[test]
    fn test_completion_below_threshold_is_noop() {
        let mut loci = vec![primered_locus(&["ACGTACGTAC", "ACGTACGTA"])];
        let before = loci[0].seq_probe().to_vec();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let applied = completion(&mut loci, 10.0 - 1e-9, 10, 10.0, &mut rng).unwrap();
        assert!(!applied);
        assert_eq!(loci[0].seq_probe(), before.as_slice());
        assert_eq!(loci[0].stage(), LocusStage::LengthNormalized);
    }

    #[test]
    fn test_completion_is_idempotent() {
        let mut loci = vec![primered_locus(&["ACGTACGTACGTACGTACGT", "ACGT"])];
        let mut rng = ChaCha20Rng::seed_from_u64(9);

        let stats = check_length_seq_diff(loci[0].seq_probe().iter().map(String::as_str)).unwrap();
        assert!(completion(&mut loci, stats.diff_percent, stats.max_len, 10.0, &mut rng).unwrap());
        let once = loci[0].seq_probe().to_vec();

        let stats = check_length_seq_diff(loci[0].seq_probe().iter().map(String::as_str)).unwrap();
        assert_eq!(stats.diff_bp, 0);
        assert!(!completion(&mut loci, stats.diff_percent, stats.max_len, 10.0, &mut rng).unwrap());
        assert_eq!(loci[0].seq_probe(), once.as_slice());
    }

    #[test]
    fn test_completion_requires_primers() {
        let mut locus = Locus::new(
            1,
            "chr2R",
            0,
            10,
            Arc::new(PrimerPair::new("primer1", "F", "PPPP", "R", "QQQQ")),
            Barcode::new("Bcd1", "TT"),
        );
        locus.assign_candidates(Vec::new()).unwrap();
        let mut loci = vec![locus];
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(matches!(
            completion(&mut loci, 50.0, 10, 10.0, &mut rng),
            Err(DesignError::StageOrder { .. })
        ));
    }

    #[test]
    fn test_random_nucleotides_alphabet() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let seq = random_nucleotides(500, &mut rng);
        assert_eq!(seq.len(), 500);
        assert!(seq.chars().all(|c| matches!(c, 'a' | 't' | 'g' | 'c')));
    }
}
