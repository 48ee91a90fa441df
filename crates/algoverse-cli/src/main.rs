//! AlgoVerse CLI - generate algorithm teaching pages from the terminal.

use algoverse_cli::commands;
use algoverse_cli::{Cli, Command, Formatter, OutputFormat};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let formatter = Formatter::new(format, !cli.no_color);

    if let Err(e) = run(cli.command, &formatter).await {
        eprintln!("{}", formatter.error(&format!("Error: {:#}", e)));
        std::process::exit(1);
    }
}

async fn run(command: Command, formatter: &Formatter) -> anyhow::Result<()> {
    match command {
        Command::Extract(args) => {
            let input = args.input.clone();
            commands::execute_extract(args, formatter)
                .with_context(|| format!("extracting from '{}'", input))?;
        }
        Command::Make(args) => {
            let topic = args.topic.clone();
            commands::execute_make(args, formatter)
                .await
                .with_context(|| format!("generating '{}'", topic))?;
        }
    }

    Ok(())
}
