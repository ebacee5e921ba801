//! Command-line interface for probe-designer.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **design**: Design an oligo-pool library from a parameters file
//! - **partition**: Show the locus windows and candidate counts without designing
//! - **primers**: List the universal primer sets of a primer table
//!
//! ## Usage
//!
//! ```text
//! # Design a library, results go to <output>/<YYYYMMDD_HHMM>/
//! probe-designer design parameters.json
//!
//! # Reproducible run with a fixed seed
//! probe-designer design parameters.json --seed 42 --output results/
//!
//! # Check how the candidates fall into loci
//! probe-designer partition parameters.json --format tsv
//!
//! # List primer sets
//! probe-designer primers Primer_univ.csv
//! ```

use clap::{Parser, Subcommand};

pub mod design;
pub mod partition;
pub mod primers;

#[derive(Parser)]
#[command(name = "probe-designer")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Design oligo-pool libraries of barcoded FISH probes")]
#[command(
    long_about = "probe-designer builds a multiplexed FISH probe library from pre-computed genomic candidate probes.\n\nIt splits a genomic interval into loci, subsamples candidates per locus, and assembles each probe as:\n- a forward universal primer\n- barcode/RT copies around the genomic core\n- a reverse universal primer\n\nProbes are then padded at their 3' end so the synthesized library has a uniform length."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Design a library and write the result files
    Design(design::DesignArgs),

    /// Show how the genomic candidates are split into loci
    Partition(partition::PartitionArgs),

    /// List the universal primer sets of a primer table
    Primers(primers::PrimersArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
