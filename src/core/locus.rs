use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::types::{Barcode, GenomicRecord, PrimerPair};
use crate::design::DesignError;

/// Construction stage of a locus. Stages only move forward, one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocusStage {
    /// Coordinates, primers and barcode known, no genomic records yet
    Empty,
    /// Candidate genomic records falling inside the locus are attached
    CandidatesAssigned,
    /// Probe list holds the selected genomic core sequences
    CoreSelected,
    /// Barcode/RT motifs wrapped around every core sequence
    Barcoded,
    /// Universal primers added on both ends
    Primered,
    /// Length completion has been evaluated (terminal)
    LengthNormalized,
}

impl std::fmt::Display for LocusStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::CandidatesAssigned => "candidates-assigned",
            Self::CoreSelected => "core-selected",
            Self::Barcoded => "barcoded",
            Self::Primered => "primered",
            Self::LengthNormalized => "length-normalized",
        };
        write!(f, "{name}")
    }
}

/// A genomic locus and its primary probes.
///
/// Probe sequences keep a single space between segments (primer, barcode,
/// genomic core, completion) so that the segment boundaries can still be
/// read from the details file. The flat synthesis file strips them.
#[derive(Debug, Clone)]
pub struct Locus {
    /// Locus number (1-based, contiguous within a library)
    pub locus_n: usize,

    /// Chromosome name
    pub chr_name: String,

    /// Locus start coordinate (bp)
    pub start_seq: u64,

    /// Locus end coordinate (bp, exclusive)
    pub end_seq: u64,

    primers_univ: Arc<PrimerPair>,
    barcode: Barcode,
    candidates: Vec<GenomicRecord>,
    seq_probe: Vec<String>,
    stage: LocusStage,
}

impl Locus {
    pub fn new(
        locus_n: usize,
        chr_name: impl Into<String>,
        start_seq: u64,
        end_seq: u64,
        primers_univ: Arc<PrimerPair>,
        barcode: Barcode,
    ) -> Self {
        Self {
            locus_n,
            chr_name: chr_name.into(),
            start_seq,
            end_seq,
            primers_univ,
            barcode,
            candidates: Vec::new(),
            seq_probe: Vec::new(),
            stage: LocusStage::Empty,
        }
    }

    /// Barcode/RT name assigned to this locus
    #[must_use]
    pub fn bcd_locus(&self) -> &str {
        &self.barcode.name
    }

    #[must_use]
    pub fn barcode(&self) -> &Barcode {
        &self.barcode
    }

    #[must_use]
    pub fn primers_univ(&self) -> &PrimerPair {
        &self.primers_univ
    }

    #[must_use]
    pub fn stage(&self) -> LocusStage {
        self.stage
    }

    /// Candidate genomic records (only populated at `CandidatesAssigned`)
    #[must_use]
    pub fn candidates(&self) -> &[GenomicRecord] {
        &self.candidates
    }

    #[must_use]
    pub fn seq_probe(&self) -> &[String] {
        &self.seq_probe
    }

    #[must_use]
    pub fn nbr_probes(&self) -> usize {
        self.seq_probe.len()
    }

    #[must_use]
    pub fn region_size(&self) -> u64 {
        self.end_seq.saturating_sub(self.start_seq)
    }

    fn ensure_stage(&self, expected: LocusStage) -> Result<(), DesignError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(DesignError::StageOrder {
                locus_n: self.locus_n,
                expected,
                actual: self.stage,
            })
        }
    }

    /// Attach the genomic records that fall inside this locus
    ///
    /// # Errors
    ///
    /// Returns `DesignError::StageOrder` unless the locus is `Empty`.
    pub fn assign_candidates(&mut self, candidates: Vec<GenomicRecord>) -> Result<(), DesignError> {
        self.ensure_stage(LocusStage::Empty)?;
        self.candidates = candidates;
        self.stage = LocusStage::CandidatesAssigned;
        Ok(())
    }

    /// Replace the candidates by the chosen core sequences
    pub(crate) fn set_core_sequences(
        &mut self,
        select: impl FnOnce(Vec<GenomicRecord>) -> Vec<GenomicRecord>,
    ) -> Result<(), DesignError> {
        self.ensure_stage(LocusStage::CandidatesAssigned)?;
        let candidates = std::mem::take(&mut self.candidates);
        self.seq_probe = select(candidates)
            .into_iter()
            .map(|record| record.sequence)
            .collect();
        self.stage = LocusStage::CoreSelected;
        Ok(())
    }

    /// Rewrite every probe sequence and move from stage `from` to stage `to`
    pub(crate) fn transform_probes(
        &mut self,
        from: LocusStage,
        to: LocusStage,
        mut f: impl FnMut(&str) -> String,
    ) -> Result<(), DesignError> {
        self.ensure_stage(from)?;
        self.seq_probe = self.seq_probe.iter().map(|seq| f(seq)).collect();
        self.stage = to;
        Ok(())
    }
}

impl std::fmt::Display for Locus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Chr. name: {}", self.chr_name)?;
        writeln!(f, "Locus number: {}", self.locus_n)?;
        writeln!(f, "Barcode/RT: {}", self.bcd_locus())?;
        writeln!(f, "Start: {}", self.start_seq)?;
        write!(f, "End: {}", self.end_seq)?;
        if let Some(first) = self.seq_probe.first() {
            write!(
                f,
                "\nPrimers: {} / {}\nFirst probe: {first}",
                self.primers_univ.fw_name, self.primers_univ.rev_name
            )?;
        }
        Ok(())
    }
}
