use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::locus::Locus;
use crate::core::types::DesignType;
use crate::design::normalize::{self, LengthStats};
use crate::design::DesignError;

/// Default tolerated spread between the shortest and the longest probe (%)
pub const DEFAULT_MAX_DIFF_PERCENT: f64 = 10.0;

/// An oligo-pool library: the ordered collection of loci and the run-level settings
#[derive(Debug, Clone)]
pub struct Library {
    pub chromosome_name: String,

    /// Library start coordinate (bp)
    pub start_lib: u64,

    /// Number of loci the library is designed with
    pub nbr_loci_total: usize,

    /// Tolerated probe length spread before 3' completion (%)
    pub max_diff_percent: f64,

    pub design_type: DesignType,

    loci_list: Vec<Locus>,
}

/// One row of the library summary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocusSummary {
    pub chromosome: String,
    pub locus_n: usize,
    pub start: u64,
    pub end: u64,
    pub region_size: u64,
    pub barcode: String,
    pub primer_fw: String,
    pub primer_rev: String,
    pub nbr_probes: usize,
}

impl Library {
    pub fn new(
        chromosome_name: impl Into<String>,
        start_lib: u64,
        nbr_loci_total: usize,
        max_diff_percent: f64,
        design_type: DesignType,
    ) -> Self {
        Self {
            chromosome_name: chromosome_name.into(),
            start_lib,
            nbr_loci_total,
            max_diff_percent,
            design_type,
            loci_list: Vec::with_capacity(nbr_loci_total),
        }
    }

    /// Append the next locus.
    ///
    /// Loci must arrive in increasing `locus_n` order (1, 2, ...). Fixed-length
    /// loci must not overlap the previous locus. Fixed-count loci take their
    /// bounds from overlapping candidate records, so they only need a start
    /// at or after the previous start.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::InvalidLocus` if the locus number is out of
    /// sequence, the library is already full, or the coordinates are out of order.
    pub fn add_locus(&mut self, locus: Locus) -> Result<(), DesignError> {
        let expected_n = self.loci_list.len() + 1;
        let locus_n = locus.locus_n;
        let invalid = move |reason: String| DesignError::InvalidLocus { locus_n, reason };

        if self.loci_list.len() >= self.nbr_loci_total {
            return Err(invalid(format!(
                "library already holds {} loci",
                self.nbr_loci_total
            )));
        }
        if locus_n != expected_n {
            return Err(invalid(format!("expected locus number {expected_n}")));
        }
        if locus.start_seq > locus.end_seq {
            return Err(invalid(format!(
                "start {} is after end {}",
                locus.start_seq, locus.end_seq
            )));
        }
        if let Some(previous) = self.loci_list.last() {
            match self.design_type {
                DesignType::LocusLength if locus.start_seq < previous.end_seq => {
                    return Err(invalid(format!(
                        "start {} overlaps locus {} ending at {}",
                        locus.start_seq, previous.locus_n, previous.end_seq
                    )));
                }
                DesignType::NbrProbes if locus.start_seq < previous.start_seq => {
                    return Err(invalid(format!(
                        "start {} is before the start {} of locus {}",
                        locus.start_seq, previous.start_seq, previous.locus_n
                    )));
                }
                _ => {}
            }
        }

        self.loci_list.push(locus);
        Ok(())
    }

    #[must_use]
    pub fn loci(&self) -> &[Locus] {
        &self.loci_list
    }

    pub(crate) fn loci_mut(&mut self) -> &mut [Locus] {
        &mut self.loci_list
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.loci_list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loci_list.is_empty()
    }

    /// True once every requested locus has been added
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.loci_list.len() == self.nbr_loci_total
    }

    /// Total number of probes across all loci
    #[must_use]
    pub fn nbr_probes_total(&self) -> usize {
        self.loci_list.iter().map(Locus::nbr_probes).sum()
    }

    /// All probe sequences of the library, in locus order
    pub fn probes(&self) -> impl Iterator<Item = &str> {
        self.loci_list
            .iter()
            .flat_map(|locus| locus.seq_probe().iter().map(String::as_str))
    }

    /// Min/max probe length over the whole library and their spread
    ///
    /// # Errors
    ///
    /// Returns `DesignError::DegenerateLength` if the library holds no probe
    /// or only empty probes.
    pub fn check_length_seq_diff(&self) -> Result<LengthStats, DesignError> {
        normalize::check_length_seq_diff(self.probes())
    }

    /// Pad every probe to `max_len` with random nucleotides at the 3' end when
    /// `diff_percent` reaches the library threshold. Returns whether padding
    /// was applied.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::StageOrder` if a locus has not received its
    /// universal primers yet.
    pub fn completion<R: Rng + ?Sized>(
        &mut self,
        diff_percent: f64,
        max_len: usize,
        rng: &mut R,
    ) -> Result<bool, DesignError> {
        let threshold = self.max_diff_percent;
        normalize::completion(self.loci_mut(), diff_percent, max_len, threshold, rng)
    }

    /// Summary rows, one per locus
    #[must_use]
    pub fn summary(&self) -> Vec<LocusSummary> {
        self.loci_list
            .iter()
            .map(|locus| LocusSummary {
                chromosome: locus.chr_name.clone(),
                locus_n: locus.locus_n,
                start: locus.start_seq,
                end: locus.end_seq,
                region_size: locus.region_size(),
                barcode: locus.bcd_locus().to_string(),
                primer_fw: locus.primers_univ().fw_name.clone(),
                primer_rev: locus.primers_univ().rev_name.clone(),
                nbr_probes: locus.nbr_probes(),
            })
            .collect()
    }
}
