use thiserror::Error;

use crate::core::locus::LocusStage;

#[derive(Error, Debug)]
pub enum DesignError {
    #[error("Invalid number of barcodes/RTs per probe: {0} (expected 2, 3, 4 or 5)")]
    InvalidMultiplicity(u32),

    #[error("Unknown design type: '{0}' (expected 'locus_length' or 'nbr_probes')")]
    UnknownDesignType(String),

    #[error("Missing resolution: a locus length (bp) is required when design type is 'locus_length'")]
    MissingResolution,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "Not enough barcodes/RTs for requested loci: requested {requested} loci but only {available} barcodes/RTs are available"
    )]
    InsufficientBarcodes { requested: usize, available: usize },

    #[error("Universal primer set '{name}' not found (available: {available})")]
    UnknownPrimerSet { name: String, available: String },

    #[error("Cannot compute probe length statistics: {0}")]
    DegenerateLength(String),

    #[error("Locus {locus_n} is at stage {actual}, expected {expected}")]
    StageOrder {
        locus_n: usize,
        expected: LocusStage,
        actual: LocusStage,
    },

    #[error("Locus {locus_n} cannot be added to the library: {reason}")]
    InvalidLocus { locus_n: usize, reason: String },
}

impl DesignError {
    /// True for errors caused by the run parameters rather than the input data
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMultiplicity(_)
                | Self::UnknownDesignType(_)
                | Self::MissingResolution
                | Self::InvalidConfig(_)
                | Self::UnknownPrimerSet { .. }
        )
    }
}
