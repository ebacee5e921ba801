use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::library::Library;
use crate::core::locus::Locus;
use crate::core::types::{Barcode, DesignType, GenomicRecord, Multiplicity, PrimerPair};
use crate::design::assembly::{add_rt_bcd_to_primary_seq, add_univ_primer_each_side, pair_barcodes};
use crate::design::normalize::LengthStats;
use crate::design::partition::{library_end, Partitioner};
use crate::design::selection::select_library_probes;
use crate::design::DesignError;

/// Validated settings driving one library design run
#[derive(Debug, Clone)]
pub struct DesignSettings {
    pub chromosome_name: String,
    pub start_lib: u64,
    pub nbr_loci_total: usize,
    /// Locus length (bp); required for `locus_length` designs
    pub resolution: Option<u64>,
    pub nbr_probe_by_locus: usize,
    pub nbr_bcd_rt_by_probe: Multiplicity,
    pub max_diff_percent: f64,
    pub design_type: DesignType,
}

impl DesignSettings {
    /// Check the numeric settings
    ///
    /// # Errors
    ///
    /// Returns `DesignError::InvalidConfig` for a zero locus or probe count, an
    /// invalid threshold or a library end past `u64::MAX`, and
    /// `DesignError::MissingResolution` when a `locus_length` design has no
    /// resolution.
    pub fn validate(&self) -> Result<(), DesignError> {
        if self.nbr_loci_total == 0 {
            return Err(DesignError::InvalidConfig(
                "nbr_loci_total must be greater than 0".to_string(),
            ));
        }
        if self.nbr_probe_by_locus == 0 {
            return Err(DesignError::InvalidConfig(
                "nbr_probe_by_locus must be greater than 0".to_string(),
            ));
        }
        if !self.max_diff_percent.is_finite() || self.max_diff_percent < 0.0 {
            return Err(DesignError::InvalidConfig(format!(
                "max_diff_percent must be a non-negative number, got {}",
                self.max_diff_percent
            )));
        }
        if self.design_type == DesignType::LocusLength && !matches!(self.resolution, Some(r) if r > 0) {
            return Err(DesignError::MissingResolution);
        }
        if let Some(resolution) = self.resolution {
            if library_end(self.start_lib, self.nbr_loci_total, resolution).is_none() {
                return Err(DesignError::InvalidConfig(format!(
                    "library end start_lib + nbr_loci_total * resolution \
                     ({} + {} * {resolution}) does not fit in a genomic coordinate",
                    self.start_lib, self.nbr_loci_total
                )));
            }
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DesignError::MissingResolution` as [`Partitioner::new`] does.
    pub fn partitioner(&self) -> Result<Partitioner, DesignError> {
        Partitioner::new(
            self.design_type,
            self.start_lib,
            self.nbr_loci_total,
            self.resolution,
            self.nbr_probe_by_locus,
        )
    }
}

/// A finished library and the length checks made on it
#[derive(Debug, Clone)]
pub struct DesignOutcome {
    pub library: Library,

    /// Probe length spread before completion
    pub initial_stats: LengthStats,

    /// Probe length spread of the delivered library
    pub final_stats: LengthStats,

    pub completion_applied: bool,
}

/// Compact description of a design run, for reporting
#[derive(Debug, Clone, Serialize)]
pub struct DesignReport {
    pub nbr_loci: usize,
    pub nbr_probes: usize,
    pub underfilled_loci: Vec<usize>,
    pub initial_stats: LengthStats,
    pub final_stats: LengthStats,
    pub completion_applied: bool,
}

impl DesignOutcome {
    #[must_use]
    pub fn report(&self, nbr_probe_by_locus: usize) -> DesignReport {
        DesignReport {
            nbr_loci: self.library.len(),
            nbr_probes: self.library.nbr_probes_total(),
            underfilled_loci: self
                .library
                .loci()
                .iter()
                .filter(|locus| locus.nbr_probes() < nbr_probe_by_locus)
                .map(|locus| locus.locus_n)
                .collect(),
            initial_stats: self.initial_stats,
            final_stats: self.final_stats,
            completion_applied: self.completion_applied,
        }
    }
}

/// Build the loci of a library up to the `CandidatesAssigned` stage.
///
/// Checks the settings and the barcode supply before any locus is created.
///
/// # Errors
///
/// Returns configuration errors from [`DesignSettings::validate`] and
/// `DesignError::InsufficientBarcodes` when there are fewer barcodes/RTs
/// than loci.
pub fn build_library(
    settings: &DesignSettings,
    records: &[GenomicRecord],
    barcodes: &[Barcode],
    primers: PrimerPair,
) -> Result<Library, DesignError> {
    settings.validate()?;
    let pairs = pair_barcodes(settings.nbr_loci_total, barcodes)?;
    let partitioner = settings.partitioner()?;

    let reduced = partitioner.reduce_list_seq(records);
    let windows = partitioner.partition(&reduced);
    let primers = Arc::new(primers);

    let mut library = Library::new(
        settings.chromosome_name.clone(),
        settings.start_lib,
        settings.nbr_loci_total,
        settings.max_diff_percent,
        settings.design_type,
    );

    for (window, (locus_n, barcode)) in windows.into_iter().zip(pairs) {
        debug_assert_eq!(window.locus_n, locus_n);
        let mut locus = Locus::new(
            locus_n,
            settings.chromosome_name.clone(),
            window.start_seq,
            window.end_seq,
            Arc::clone(&primers),
            barcode,
        );
        locus.assign_candidates(window.candidates)?;
        debug!(
            locus = locus_n,
            start = locus.start_seq,
            end = locus.end_seq,
            candidates = locus.candidates().len(),
            "Locus partitioned"
        );
        library.add_locus(locus)?;
    }

    Ok(library)
}

/// Run the whole design: partition, select, barcode, add primers, equalize lengths.
///
/// `records` must be sorted by start. `rng` is the single random source for
/// probe subsampling and 3' completion.
///
/// # Errors
///
/// Fails with the first fatal [`DesignError`]; nothing is returned on failure.
pub fn design_library<R: Rng + ?Sized>(
    settings: &DesignSettings,
    records: &[GenomicRecord],
    barcodes: &[Barcode],
    primers: PrimerPair,
    rng: &mut R,
) -> Result<DesignOutcome, DesignError> {
    let mut library = build_library(settings, records, barcodes, primers)?;

    select_library_probes(&mut library, settings.nbr_probe_by_locus, rng)?;
    add_rt_bcd_to_primary_seq(&mut library, settings.nbr_bcd_rt_by_probe)?;
    add_univ_primer_each_side(&mut library)?;
    if let Some(first) = library.loci().first() {
        debug!("Example locus:\n{first}");
    }

    let initial_stats = library.check_length_seq_diff()?;
    info!(
        min = initial_stats.min_len,
        max = initial_stats.max_len,
        diff_bp = initial_stats.diff_bp,
        "Probe length spread {:.1}%",
        initial_stats.diff_percent
    );

    let completion_applied =
        library.completion(initial_stats.diff_percent, initial_stats.max_len, rng)?;
    let final_stats = if completion_applied {
        library.check_length_seq_diff()?
    } else {
        initial_stats
    };

    info!(
        loci = library.len(),
        probes = library.nbr_probes_total(),
        "Library design finished"
    );

    Ok(DesignOutcome {
        library,
        initial_stats,
        final_stats,
        completion_applied,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;
    use crate::core::locus::LocusStage;

    fn settings(design_type: DesignType) -> DesignSettings {
        DesignSettings {
            chromosome_name: "chr3L".to_string(),
            start_lib: 1000,
            nbr_loci_total: 3,
            resolution: Some(500),
            nbr_probe_by_locus: 4,
            nbr_bcd_rt_by_probe: Multiplicity::Two,
            max_diff_percent: 10.0,
            design_type,
        }
    }

    fn records() -> Vec<GenomicRecord> {
        (0..60)
            .map(|i| {
                let start = 1000 + i * 40;
                // shorter cores in the last locus force a completion
                let len = if start >= 2000 { 20 } else { 30 };
                GenomicRecord::new(start, start + 30, "g".repeat(len))
            })
            .collect()
    }

    fn barcodes(n: usize) -> Vec<Barcode> {
        (1..=n)
            .map(|i| Barcode::new(format!("Bcd_{i:03}"), "CCCCC"))
            .collect()
    }

    fn primers() -> PrimerPair {
        PrimerPair::new("primer1", "BB297.Fw", "AAAAA", "BB299.Rev", "TTTTT")
    }

    #[test]
    fn test_design_locus_length() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let outcome = design_library(
            &settings(DesignType::LocusLength),
            &records(),
            &barcodes(3),
            primers(),
            &mut rng,
        )
        .unwrap();

        let library = &outcome.library;
        assert!(library.is_complete());
        for (i, locus) in library.loci().iter().enumerate() {
            assert_eq!(locus.locus_n, i + 1);
            assert_eq!(locus.start_seq, 1000 + i as u64 * 500);
            assert_eq!(locus.end_seq, 1500 + i as u64 * 500);
            assert_eq!(locus.nbr_probes(), 4);
            assert_eq!(locus.bcd_locus(), format!("Bcd_{:03}", i + 1));
            assert_eq!(locus.stage(), LocusStage::LengthNormalized);
            for probe in locus.seq_probe() {
                assert!(probe.starts_with("AAAAA CCCCC "));
            }
        }

        assert!(outcome.completion_applied);
        assert_eq!(outcome.final_stats.diff_bp, 0);
        assert_eq!(outcome.final_stats.max_len, outcome.initial_stats.max_len);
    }

    #[test]
    fn test_design_nbr_probes() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut settings = settings(DesignType::NbrProbes);
        settings.resolution = None;
        let outcome =
            design_library(&settings, &records(), &barcodes(5), primers(), &mut rng).unwrap();

        let loci = outcome.library.loci();
        assert_eq!(loci.len(), 3);
        assert_eq!(loci[0].start_seq, 1000);
        assert_eq!(loci[0].end_seq, 1000 + 3 * 40 + 30);
        assert_eq!(loci[1].start_seq, 1000 + 4 * 40);
        assert!(loci.iter().all(|l| l.nbr_probes() == 4));
    }

    #[test]
    fn test_design_nbr_probes_with_overlapping_records() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut settings = settings(DesignType::NbrProbes);
        settings.resolution = None;
        settings.nbr_loci_total = 2;
        settings.nbr_probe_by_locus = 5;
        // 30 bp records every 20 bp
        let records: Vec<GenomicRecord> = (0..20)
            .map(|i| GenomicRecord::new(1000 + i * 20, 1030 + i * 20, "t".repeat(30)))
            .collect();

        let outcome =
            design_library(&settings, &records, &barcodes(2), primers(), &mut rng).unwrap();
        let loci = outcome.library.loci();
        assert_eq!((loci[0].start_seq, loci[0].end_seq), (1000, 1110));
        assert_eq!((loci[1].start_seq, loci[1].end_seq), (1100, 1210));
        assert!(loci.iter().all(|l| l.nbr_probes() == 5));
    }

    #[test]
    fn test_insufficient_barcodes_fails_first() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let err = design_library(
            &settings(DesignType::LocusLength),
            &records(),
            &barcodes(2),
            primers(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DesignError::InsufficientBarcodes {
                requested: 3,
                available: 2
            }
        ));
    }

    #[test]
    fn test_no_probes_fails_explicitly() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let err = design_library(
            &settings(DesignType::LocusLength),
            &[],
            &barcodes(3),
            primers(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, DesignError::DegenerateLength(_)));
    }

    #[test]
    fn test_validate_settings() {
        let mut s = settings(DesignType::LocusLength);
        s.resolution = None;
        assert!(matches!(s.validate(), Err(DesignError::MissingResolution)));

        let mut s = settings(DesignType::LocusLength);
        s.nbr_loci_total = 0;
        assert!(matches!(s.validate(), Err(DesignError::InvalidConfig(_))));

        let mut s = settings(DesignType::NbrProbes);
        s.resolution = None;
        assert!(s.validate().is_ok());

        let mut s = settings(DesignType::LocusLength);
        s.max_diff_percent = 0.0;
        assert!(s.validate().is_ok());
        s.max_diff_percent = -1.0;
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_validate_rejects_library_end_overflow() {
        let mut s = settings(DesignType::LocusLength);
        s.resolution = Some(u64::MAX / 2);
        let err = s.validate().unwrap_err();
        assert!(matches!(err, DesignError::InvalidConfig(_)));
        assert!(err.to_string().contains(&(u64::MAX / 2).to_string()));

        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let err = design_library(&s, &records(), &barcodes(3), primers(), &mut rng).unwrap_err();
        assert!(matches!(err, DesignError::InvalidConfig(_)));
    }

    #[test]
    fn test_report_lists_underfilled_loci() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let records = vec![
            GenomicRecord::new(1000, 1030, "a".repeat(30)),
            GenomicRecord::new(1600, 1630, "c".repeat(30)),
        ];
        let outcome = design_library(
            &settings(DesignType::LocusLength),
            &records,
            &barcodes(3),
            primers(),
            &mut rng,
        )
        .unwrap();
        let report = outcome.report(4);
        assert_eq!(report.nbr_probes, 2);
        assert_eq!(report.underfilled_loci, vec![1, 2, 3]);
        assert_eq!(outcome.library.loci()[2].nbr_probes(), 0);
    }
}
