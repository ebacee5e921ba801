//! Result files for a designed library.
//!
//! Each run writes into a dated sub-folder (`YYYYMMDD_HHMM`) of the output folder:
//!
//! | File | Content |
//! |------|---------|
//! | `1_Library_details.txt` | per-locus header then its probes, segments separated by spaces |
//! | `2_Full_sequence_Only.txt` | one probe per line without spaces, for oligo-pool synthesis |
//! | `3_Library_summary.csv` | one row per locus |
//! | `4-OutputParameters.json` | the effective parameters of the run |

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::config::DesignParameters;
use crate::core::library::Library;
use crate::core::types::DesignType;
use crate::design::pipeline::DesignOutcome;

pub const DETAILS_FILE: &str = "1_Library_details.txt";
pub const FULL_SEQUENCE_FILE: &str = "2_Full_sequence_Only.txt";
pub const SUMMARY_FILE: &str = "3_Library_summary.csv";
pub const PARAMETERS_FILE: &str = "4-OutputParameters.json";

const SUMMARY_HEADER: &str = "Chromosome,Locus_N°,Start,End,Region size,Barcode,PU.Fw,PU.Rev,Nbr_Probes";

/// Effective parameters of a run, saved next to the library
#[derive(Debug, Clone, Serialize)]
pub struct OutputParameters {
    pub tool: String,
    pub version: String,
    pub created_at: String,
    pub chromosome_file: String,
    pub chromosome_folder: PathBuf,
    pub chromosome_name: String,
    pub design_type: DesignType,
    pub resolution: Option<u64>,
    pub start_lib: u64,
    pub end_lib: u64,
    pub nbr_loci_total: usize,
    pub nbr_probe_by_locus: usize,
    pub nbr_bcd_rt_by_probe: u32,
    pub primer_univ: String,
    pub bcd_rt_file: PathBuf,
    pub primer_univ_file: PathBuf,
    pub max_diff_percent: f64,
    pub seed: u64,
    pub min_length: usize,
    pub max_length: usize,
    pub diff_bp: usize,
    pub diff_percent: f64,
    pub completion_applied: bool,
    pub nbr_probes_total: usize,
    /// MD5 of the flat synthesis file content
    pub library_md5: String,
}

impl OutputParameters {
    #[must_use]
    pub fn new(params: &DesignParameters, seed: u64, outcome: &DesignOutcome) -> Self {
        let library = &outcome.library;
        // Without a resolution the library ends where its last locus ends
        let end_lib = params.end_lib().unwrap_or_else(|| {
            library
                .loci()
                .last()
                .map_or(params.start_lib, |locus| locus.end_seq)
        });

        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Local::now().to_rfc3339(),
            chromosome_file: params.chromosome_file.clone(),
            chromosome_folder: params.chromosome_folder.clone(),
            chromosome_name: library.chromosome_name.clone(),
            design_type: params.design_type,
            resolution: params.resolution,
            start_lib: params.start_lib,
            end_lib,
            nbr_loci_total: params.nbr_loci_total,
            nbr_probe_by_locus: params.nbr_probe_by_locus,
            nbr_bcd_rt_by_probe: params.nbr_bcd_rt_by_probe,
            primer_univ: params.primer_univ.clone(),
            bcd_rt_file: params.bcd_rt_file.clone(),
            primer_univ_file: params.primer_univ_file.clone(),
            max_diff_percent: params.max_diff_percent,
            seed,
            min_length: outcome.initial_stats.min_len,
            max_length: outcome.initial_stats.max_len,
            diff_bp: outcome.initial_stats.diff_bp,
            diff_percent: outcome.initial_stats.diff_percent,
            completion_applied: outcome.completion_applied,
            nbr_probes_total: library.nbr_probes_total(),
            library_md5: format!("{:x}", md5::compute(render_full_sequences(library))),
        }
    }
}

/// Per-locus header followed by its probes, segment delimiters preserved
#[must_use]
pub fn render_details(library: &Library) -> String {
    let mut out = String::new();
    for locus in library.loci() {
        out.push_str(&format!(
            "Chromosome: {} Locus_N°{} Start:{} End:{} Bcd_locus:{}\n",
            locus.chr_name,
            locus.locus_n,
            locus.start_seq,
            locus.end_seq,
            locus.bcd_locus()
        ));
        for seq in locus.seq_probe() {
            out.push_str(seq);
            out.push('\n');
        }
    }
    out
}

/// Every probe on its own line with the segment delimiters removed
#[must_use]
pub fn render_full_sequences(library: &Library) -> String {
    let mut out = String::new();
    for seq in library.probes() {
        out.extend(seq.chars().filter(|&c| c != ' '));
        out.push('\n');
    }
    out
}

/// Library summary as CSV
#[must_use]
pub fn render_summary(library: &Library) -> String {
    let mut out = String::from(SUMMARY_HEADER);
    out.push('\n');
    for row in library.summary() {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            row.chromosome,
            row.locus_n,
            row.start,
            row.end,
            row.region_size,
            row.barcode,
            row.primer_fw,
            row.primer_rev,
            row.nbr_probes
        ));
    }
    out
}

/// Create `<base>/<YYYYMMDD_HHMM>`, adding a `_N` suffix if that folder already exists
///
/// # Errors
///
/// Returns an error if the folder cannot be created.
pub fn create_result_folder(base: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(base)?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M").to_string();

    let mut folder = base.join(&stamp);
    let mut attempt = 1;
    while folder.exists() {
        attempt += 1;
        folder = base.join(format!("{stamp}_{attempt}"));
    }
    std::fs::create_dir(&folder)?;
    Ok(folder)
}

/// Write the four result files into `folder`
///
/// # Errors
///
/// Returns an error if a file cannot be written or the parameters cannot be serialized.
pub fn write_results(
    folder: &Path,
    library: &Library,
    parameters: &OutputParameters,
) -> anyhow::Result<()> {
    std::fs::write(folder.join(DETAILS_FILE), render_details(library))?;
    std::fs::write(folder.join(FULL_SEQUENCE_FILE), render_full_sequences(library))?;
    std::fs::write(folder.join(SUMMARY_FILE), render_summary(library))?;
    std::fs::write(
        folder.join(PARAMETERS_FILE),
        serde_json::to_string_pretty(parameters)?,
    )?;

    info!(
        folder = %folder.display(),
        "All files concerning the library design are saved"
    );
    Ok(())
}
