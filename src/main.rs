use clap::Parser;
use tracing_subscriber::EnvFilter;

use jseq::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("jseq=debug,info")
    } else {
        EnvFilter::new("jseq=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::ToJson(args) => {
            cli::to_json::run(args, cli.verbose)?;
        }
        cli::Commands::ToGenbank(args) => {
            cli::to_genbank::run(args, cli.verbose)?;
        }
        cli::Commands::Fix(args) => {
            cli::fix::run(args, cli.verbose)?;
        }
        cli::Commands::Inspect(args) => {
            cli::inspect::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
