//! Run parameters.
//!
//! A design run is described by a JSON parameters file:
//!
//! ```json
//! {
//!     "chromosome_file": "chr3L.bed",
//!     "chromosome_folder": "/data/dm6/OligoMiner/dm6_balanced",
//!     "resolution": 10000,
//!     "start_lib": 8500,
//!     "nbr_loci_total": 20,
//!     "nbr_probe_by_locus": 100,
//!     "nbr_bcd_rt_by_probe": 3,
//!     "primer_univ": "primer1",
//!     "bcd_rt_file": "Barcodes.csv",
//!     "max_diff_percent": 10,
//!     "design_type": "locus_length"
//! }
//! ```
//!
//! Relative `bcd_rt_file`, `primer_univ_file` and `chromosome_folder` paths
//! are resolved against the directory holding the parameters file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::library::DEFAULT_MAX_DIFF_PERCENT;
use crate::core::types::{DesignType, Multiplicity};
use crate::design::partition::library_end;
use crate::design::pipeline::DesignSettings;
use crate::design::DesignError;

/// Primer table looked up next to the parameters file when none is given
pub const DEFAULT_PRIMER_UNIV_FILE: &str = "Primer_univ.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read parameters file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse parameters file: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn default_max_diff_percent() -> f64 {
    DEFAULT_MAX_DIFF_PERCENT
}

fn default_primer_univ_file() -> PathBuf {
    PathBuf::from(DEFAULT_PRIMER_UNIV_FILE)
}

/// Parameters of one library design, as read from the JSON parameters file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignParameters {
    /// Genomic candidate file name (its stem is the chromosome name)
    pub chromosome_file: String,

    /// Folder holding `chromosome_file`
    pub chromosome_folder: PathBuf,

    /// Locus length (bp), required for `locus_length` designs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<u64>,

    /// Library start coordinate (bp)
    pub start_lib: u64,

    pub nbr_loci_total: usize,

    pub nbr_probe_by_locus: usize,

    /// Barcode/RT copies per probe (2 to 5)
    pub nbr_bcd_rt_by_probe: u32,

    /// Name of the universal primer set to use
    pub primer_univ: String,

    /// Barcode/RT list
    pub bcd_rt_file: PathBuf,

    /// Universal primer table
    #[serde(default = "default_primer_univ_file")]
    pub primer_univ_file: PathBuf,

    #[serde(default = "default_max_diff_percent")]
    pub max_diff_percent: f64,

    #[serde(default)]
    pub design_type: DesignType,

    /// Where the dated result folder is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_folder: Option<PathBuf>,

    /// Seed for probe subsampling and 3' completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl DesignParameters {
    /// Load parameters from a JSON file and resolve relative paths against its directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read and
    /// `ConfigError::ParseError` if it is not a valid parameters document.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut params = Self::from_json(&content)?;
        if let Some(base) = path.parent() {
            params.resolve_paths(base);
        }
        Ok(params)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for invalid JSON, missing keys or an
    /// unknown design type.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Make relative input paths relative to `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.chromosome_folder,
            &mut self.bcd_rt_file,
            &mut self.primer_univ_file,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Chromosome name recovered from the chromosome file name (`chr3L.bed` -> `chr3L`)
    #[must_use]
    pub fn chromosome_name(&self) -> String {
        recover_chr_name(&self.chromosome_file)
    }

    #[must_use]
    pub fn genomic_path(&self) -> PathBuf {
        self.chromosome_folder.join(&self.chromosome_file)
    }

    /// `start_lib + nbr_loci_total * resolution`, when a resolution is set and
    /// the sum fits in a `u64`
    #[must_use]
    pub fn end_lib(&self) -> Option<u64> {
        self.resolution
            .and_then(|resolution| library_end(self.start_lib, self.nbr_loci_total, resolution))
    }

    /// # Errors
    ///
    /// Returns the configuration variants of `DesignError`.
    pub fn validate(&self) -> Result<(), DesignError> {
        self.to_settings().map(|_| ())
    }

    /// Validate the parameters and turn them into engine settings
    ///
    /// # Errors
    ///
    /// Returns the configuration variants of `DesignError`.
    pub fn to_settings(&self) -> Result<DesignSettings, DesignError> {
        let settings = DesignSettings {
            chromosome_name: self.chromosome_name(),
            start_lib: self.start_lib,
            nbr_loci_total: self.nbr_loci_total,
            resolution: self.resolution,
            nbr_probe_by_locus: self.nbr_probe_by_locus,
            nbr_bcd_rt_by_probe: Multiplicity::try_from(self.nbr_bcd_rt_by_probe)?,
            max_diff_percent: self.max_diff_percent,
            design_type: self.design_type,
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// Chromosome name from a file name or path: the file name up to its first `.`
#[must_use]
pub fn recover_chr_name(chromosome_file: &str) -> String {
    let file_name = Path::new(chromosome_file)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(chromosome_file);
    file_name
        .split('.')
        .next()
        .unwrap_or(file_name)
        .to_string()
}
