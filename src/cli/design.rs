use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cli::OutputFormat;
use crate::config::DesignParameters;
use crate::core::library::Library;
use crate::core::types::{DesignType, GenomicRecord};
use crate::design::pipeline::{design_library, DesignOutcome, DesignReport};
use crate::design::DesignError;
use crate::output::{self, OutputParameters};
use crate::parsing::{barcodes, genomic, primers};

#[derive(Args)]
pub struct DesignArgs {
    /// JSON parameters file
    #[arg(required = true)]
    pub params: PathBuf,

    /// Seed for probe subsampling and 3' completion (random when absent)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Folder where the dated result folder is created
    /// (defaults to the parameters file directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Tolerated probe length spread (%) before 3' completion
    #[arg(long)]
    pub max_diff_percent: Option<f64>,
}

/// Execute design subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be read, the parameters are invalid,
/// the design fails, or the result files cannot be written. No result file
/// is written when the design itself fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DesignArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let params = load_parameters(&args.params, args.seed, args.max_diff_percent)?;
    let settings = params
        .to_settings()
        .map_err(|err| with_parameters_context(err, &args.params))?;

    let primer_table = primers::parse_primer_file(&params.primer_univ_file).with_context(|| {
        format!(
            "Failed to read primer table {}",
            params.primer_univ_file.display()
        )
    })?;
    let primer_pair = primer_table
        .select(&params.primer_univ)
        .map_err(|err| with_parameters_context(err, &args.params))?;

    let barcode_list = barcodes::parse_barcode_file(&params.bcd_rt_file).with_context(|| {
        format!(
            "Failed to read barcode/RT list {}",
            params.bcd_rt_file.display()
        )
    })?;
    let records = load_records(&params)?;

    if verbose {
        eprintln!(
            "Loaded {} genomic records, {} barcodes/RTs, primer set {}",
            records.len(),
            barcode_list.len(),
            primer_pair.set_name
        );
    }

    let seed = params.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let outcome = design_library(&settings, &records, &barcode_list, primer_pair, &mut rng)
        .map_err(|err| with_parameters_context(err, &args.params))?;

    let base = args
        .output
        .clone()
        .or_else(|| params.output_folder.clone())
        .unwrap_or_else(|| parameters_dir(&args.params));
    let folder = output::create_result_folder(&base)
        .with_context(|| format!("Failed to create result folder in {}", base.display()))?;
    let echoed = OutputParameters::new(&params, seed, &outcome);
    output::write_results(&folder, &outcome.library, &echoed)?;

    let report = outcome.report(settings.nbr_probe_by_locus);
    match format {
        OutputFormat::Text => print_text_results(&outcome, &report, &folder, seed),
        OutputFormat::Json => print_json_results(&outcome, &report, &folder, seed)?,
        OutputFormat::Tsv => print_tsv_results(&outcome.library),
    }

    Ok(())
}

/// Load the parameters file and apply the command-line overrides
pub(crate) fn load_parameters(
    path: &Path,
    seed: Option<u64>,
    max_diff_percent: Option<f64>,
) -> anyhow::Result<DesignParameters> {
    let mut params = DesignParameters::load(path)
        .with_context(|| format!("Failed to load parameters from {}", path.display()))?;
    if seed.is_some() {
        params.seed = seed;
    }
    if let Some(max_diff_percent) = max_diff_percent {
        params.max_diff_percent = max_diff_percent;
    }
    Ok(params)
}

/// Point configuration errors back at the parameters file; input errors pass through
pub(crate) fn with_parameters_context(err: DesignError, params_path: &Path) -> anyhow::Error {
    if err.is_configuration_error() {
        anyhow::Error::new(err).context(format!(
            "Invalid parameters in {}",
            params_path.display()
        ))
    } else {
        err.into()
    }
}

pub(crate) fn load_records(params: &DesignParameters) -> anyhow::Result<Vec<GenomicRecord>> {
    let path = params.genomic_path();
    genomic::parse_genomic_file(&path)
        .with_context(|| format!("Failed to read genomic records {}", path.display()))
}

fn parameters_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Per-locus statistic: probe count by fixed-length loci, span by fixed-count loci
fn locus_statistic(library: &Library) -> (&'static str, Vec<u64>) {
    match library.design_type {
        DesignType::LocusLength => (
            "probes per locus",
            library
                .loci()
                .iter()
                .map(|locus| locus.nbr_probes() as u64)
                .collect(),
        ),
        DesignType::NbrProbes => (
            "locus length (bp)",
            library.loci().iter().map(|locus| locus.region_size()).collect(),
        ),
    }
}

fn print_text_results(outcome: &DesignOutcome, report: &DesignReport, folder: &Path, seed: u64) {
    let library = &outcome.library;
    println!(
        "\nLibrary {} ({}): {} loci, {} probes",
        library.chromosome_name,
        library.design_type,
        report.nbr_loci,
        report.nbr_probes
    );
    println!("   Seed: {seed}");
    println!(
        "   Probe length: {}-{} bp ({:.1}% spread)",
        outcome.initial_stats.min_len, outcome.initial_stats.max_len, outcome.initial_stats.diff_percent
    );
    if outcome.completion_applied {
        println!(
            "   3' completion applied: all probes are now {} bp",
            outcome.final_stats.max_len
        );
    }
    if !report.underfilled_loci.is_empty() {
        let loci: Vec<String> = report.underfilled_loci.iter().map(ToString::to_string).collect();
        println!("   Loci with fewer probes than requested: {}", loci.join(", "));
    }

    let (label, values) = locus_statistic(library);
    println!("\n   Locus\tStart\tEnd\tBarcode\t{label}");
    for (locus, value) in library.loci().iter().zip(&values) {
        println!(
            "   {}\t{}\t{}\t{}\t{value}",
            locus.locus_n,
            locus.start_seq,
            locus.end_seq,
            locus.bcd_locus()
        );
    }

    println!("\n   Results: {}", folder.display());
    println!();
}

fn print_json_results(
    outcome: &DesignOutcome,
    report: &DesignReport,
    folder: &Path,
    seed: u64,
) -> anyhow::Result<()> {
    let (label, values) = locus_statistic(&outcome.library);
    let output = serde_json::json!({
        "chromosome": outcome.library.chromosome_name,
        "design_type": outcome.library.design_type,
        "seed": seed,
        "output_folder": folder,
        "report": report,
        "locus_statistic": {
            "name": label,
            "values": values,
        },
        "loci": outcome.library.summary(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(library: &Library) {
    println!("chromosome\tlocus\tstart\tend\tregion_size\tbarcode\tprimer_fw\tprimer_rev\tnbr_probes");
    for row in library.summary() {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.chromosome,
            row.locus_n,
            row.start,
            row.end,
            row.region_size,
            row.barcode,
            row.primer_fw,
            row.primer_rev,
            row.nbr_probes,
        );
    }
}
