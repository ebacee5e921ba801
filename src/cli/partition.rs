use std::path::PathBuf;

use clap::Args;

use crate::cli::design::{load_parameters, load_records, with_parameters_context};
use crate::cli::OutputFormat;
use crate::design::partition::LocusWindow;

#[derive(Args)]
pub struct PartitionArgs {
    /// JSON parameters file
    #[arg(required = true)]
    pub params: PathBuf,
}

/// Execute partition subcommand: report the locus windows without designing probes
///
/// # Errors
///
/// Returns an error if the parameters are invalid or the genomic records cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: PartitionArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let params = load_parameters(&args.params, None, None)?;
    let settings = params
        .to_settings()
        .map_err(|err| with_parameters_context(err, &args.params))?;
    let records = load_records(&params)?;

    let partitioner = settings.partitioner()?;
    let reduced = partitioner.reduce_list_seq(&records);
    let windows = partitioner.partition(&reduced);

    if verbose {
        eprintln!(
            "{} of {} genomic records fall inside the library",
            reduced.len(),
            records.len()
        );
    }

    match format {
        OutputFormat::Text => {
            println!(
                "\n{} ({}): {} loci, {} candidate probes",
                settings.chromosome_name,
                settings.design_type,
                windows.len(),
                reduced.len()
            );
            for window in &windows {
                println!(
                    "   Locus {}: {}-{} ({} bp), {} candidates",
                    window.locus_n,
                    window.start_seq,
                    window.end_seq,
                    window.end_seq - window.start_seq,
                    window.candidates.len()
                );
            }
            println!();
        }
        OutputFormat::Json => {
            let loci: Vec<serde_json::Value> = windows.iter().map(window_json).collect();
            let output = serde_json::json!({
                "chromosome": settings.chromosome_name,
                "design_type": settings.design_type,
                "start_lib": settings.start_lib,
                "end_lib": partitioner.end_lib(),
                "candidates": reduced.len(),
                "loci": loci,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("locus\tstart\tend\tlength\tcandidates");
            for window in &windows {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    window.locus_n,
                    window.start_seq,
                    window.end_seq,
                    window.end_seq - window.start_seq,
                    window.candidates.len()
                );
            }
        }
    }

    Ok(())
}

fn window_json(window: &LocusWindow) -> serde_json::Value {
    serde_json::json!({
        "locus": window.locus_n,
        "start": window.start_seq,
        "end": window.end_seq,
        "candidates": window.candidates.len(),
    })
}
