use serde::{Deserialize, Serialize};

use crate::design::DesignError;

/// One candidate oligo binding site on the genome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomicRecord {
    /// Start coordinate (bp)
    pub start: u64,

    /// End coordinate (bp)
    pub end: u64,

    /// Genomic sequence complementary to the target DNA
    pub sequence: String,
}

impl GenomicRecord {
    pub fn new(start: u64, end: u64, sequence: impl Into<String>) -> Self {
        Self {
            start,
            end,
            sequence: sequence.into(),
        }
    }
}

/// A barcode or readout (RT) binding sequence assigned to a single locus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barcode {
    /// Identifier written to the output files (e.g. `Bcd_001`, `revMer1`)
    pub name: String,

    /// Nucleotide sequence inserted around the genomic core
    pub sequence: String,
}

impl Barcode {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }
}

/// A pair of universal amplification primers shared by every probe of a library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimerPair {
    /// Name of the primer set in the primer table (e.g. `primer1`)
    pub set_name: String,

    /// Forward primer name
    pub fw_name: String,

    /// Forward primer sequence (5' end of every probe)
    pub fw_seq: String,

    /// Reverse primer name
    pub rev_name: String,

    /// Reverse primer sequence (3' end of every probe, before completion)
    pub rev_seq: String,
}

impl PrimerPair {
    pub fn new(
        set_name: impl Into<String>,
        fw_name: impl Into<String>,
        fw_seq: impl Into<String>,
        rev_name: impl Into<String>,
        rev_seq: impl Into<String>,
    ) -> Self {
        Self {
            set_name: set_name.into(),
            fw_name: fw_name.into(),
            fw_seq: fw_seq.into(),
            rev_name: rev_name.into(),
            rev_seq: rev_seq.into(),
        }
    }
}

/// Strategy used to divide the library region into loci
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum DesignType {
    /// Fixed-length loci (`resolution` bp each), variable probe count
    #[default]
    LocusLength,
    /// Fixed probe count per locus, variable locus length
    NbrProbes,
}

impl std::str::FromStr for DesignType {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "locus_length" => Ok(Self::LocusLength),
            "nbr_probes" => Ok(Self::NbrProbes),
            other => Err(DesignError::UnknownDesignType(other.to_string())),
        }
    }
}

impl TryFrom<String> for DesignType {
    type Error = DesignError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for DesignType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocusLength => write!(f, "locus_length"),
            Self::NbrProbes => write!(f, "nbr_probes"),
        }
    }
}

/// Number of barcode/RT motifs carried by each probe.
///
/// | multiplicity | left  | right |
/// |--------------|-------|-------|
/// | 2            | B     | B     |
/// | 3            | B     | BB    |
/// | 4            | BB    | BB    |
/// | 5            | BBB   | BB    |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    Two,
    Three,
    Four,
    Five,
}

impl Multiplicity {
    /// Number of barcode copies placed on the 5' and 3' side of the genomic core
    #[must_use]
    pub fn flank_repeats(self) -> (usize, usize) {
        match self {
            Self::Two => (1, 1),
            Self::Three => (1, 2),
            Self::Four => (2, 2),
            Self::Five => (3, 2),
        }
    }

    #[must_use]
    pub fn get(self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
        }
    }
}

impl TryFrom<u32> for Multiplicity {
    type Error = DesignError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            5 => Ok(Self::Five),
            other => Err(DesignError::InvalidMultiplicity(other)),
        }
    }
}

impl std::fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_type_from_str() {
        assert_eq!(
            "locus_length".parse::<DesignType>().unwrap(),
            DesignType::LocusLength
        );
        assert_eq!(
            "nbr_probes".parse::<DesignType>().unwrap(),
            DesignType::NbrProbes
        );
        let err = "by_size".parse::<DesignType>().unwrap_err();
        assert!(matches!(err, DesignError::UnknownDesignType(ref v) if v == "by_size"));
    }

    #[test]
    fn test_design_type_serde() {
        let parsed: DesignType = serde_json::from_str("\"nbr_probes\"").unwrap();
        assert_eq!(parsed, DesignType::NbrProbes);
        assert_eq!(
            serde_json::to_string(&DesignType::LocusLength).unwrap(),
            "\"locus_length\""
        );

        let err = serde_json::from_str::<DesignType>("\"windows\"").unwrap_err();
        assert!(err.to_string().contains("windows"));
    }

    #[test]
    fn test_multiplicity_bounds() {
        for value in 2..=5 {
            assert_eq!(Multiplicity::try_from(value).unwrap().get(), value);
        }
        assert!(matches!(
            Multiplicity::try_from(1),
            Err(DesignError::InvalidMultiplicity(1))
        ));
        assert!(matches!(
            Multiplicity::try_from(6),
            Err(DesignError::InvalidMultiplicity(6))
        ));
    }
}
