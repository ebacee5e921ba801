use clap::Parser;
use tracing_subscriber::EnvFilter;

use probe_designer::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("probe_designer=debug,info")
    } else {
        EnvFilter::new("probe_designer=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Design(args) => {
            cli::design::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Partition(args) => {
            cli::partition::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Primers(args) => {
            cli::primers::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
