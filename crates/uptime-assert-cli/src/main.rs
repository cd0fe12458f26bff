//! `uptime-assertctl` binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use uptime_assert::Normalizer;
use uptime_assert_cli::cli::{Cli, Commands};
use uptime_assert_cli::commands::{
    Construct, ConstructCommand, DescribeCommand, Input, MergeCommand, NormalizeCommand,
    SubmitCommand,
};
use uptime_assert_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), uptime_assert_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let normalizer = Normalizer::with_bounds(cli.bounds()?);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Default => {
            ConstructCommand::new(cli.factory()).execute(&mut stdout, &format, Construct::Default)?;
        }
        Commands::Empty => {
            ConstructCommand::new(cli.factory()).execute(&mut stdout, &format, Construct::Empty)?;
        }
        Commands::Add { kind } => {
            let cmd = ConstructCommand::new(cli.factory());
            cmd.execute(&mut stdout, &format, Construct::Add((*kind).into()))?;
        }
        Commands::Submit { input } => {
            let input = Input::read(input.as_deref())?;
            SubmitCommand::new(normalizer, cli.strict).execute(&mut stdout, &format, &input)?;
        }
        Commands::Normalize { input } => {
            let input = Input::read(input.as_deref())?;
            NormalizeCommand::new(normalizer, cli.strict).execute(&mut stdout, &format, &input)?;
        }
        Commands::Merge {
            suggestion,
            current,
        } => {
            let suggestion = Input::read(Some(suggestion.as_path()))?;
            let current = current.as_deref().map(|path| Input::read(Some(path))).transpose()?;
            let cmd = MergeCommand::new(cli.factory(), cli.strict);
            cmd.execute(&mut stdout, &format, &suggestion, current.as_ref())?;
        }
        Commands::Describe { input } => {
            let input = Input::read(input.as_deref())?;
            DescribeCommand::new().execute(&mut stdout, &format, &input)?;
        }
    }

    Ok(())
}
