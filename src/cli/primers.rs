use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::parsing::primers::parse_primer_file;

#[derive(Args)]
pub struct PrimersArgs {
    /// Universal primer table (`set,fw_name,fw_seq,rev_name,rev_seq`)
    #[arg(required = true)]
    pub primer_file: PathBuf,

    /// Only show this primer set
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Execute primers subcommand
///
/// # Errors
///
/// Returns an error if the table cannot be read or the requested set does not exist.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: PrimersArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let table = parse_primer_file(&args.primer_file).with_context(|| {
        format!("Failed to read primer table {}", args.primer_file.display())
    })?;

    let sets = match &args.name {
        Some(name) => vec![table.select(name)?],
        None => table.sets,
    };

    match format {
        OutputFormat::Text => {
            for pair in &sets {
                println!("{}", pair.set_name);
                println!("   Fw:  {} {}", pair.fw_name, pair.fw_seq);
                println!("   Rev: {} {}", pair.rev_name, pair.rev_seq);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sets)?),
        OutputFormat::Tsv => {
            println!("set\tfw_name\tfw_seq\trev_name\trev_seq");
            for pair in &sets {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    pair.set_name, pair.fw_name, pair.fw_seq, pair.rev_name, pair.rev_seq
                );
            }
        }
    }

    Ok(())
}
