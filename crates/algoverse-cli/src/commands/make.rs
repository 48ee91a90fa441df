//! Make command implementation.

use crate::cli::MakeArgs;
use crate::config;
use crate::error::Result;
use crate::output::Formatter;
use algoverse_server::dispatcher::{Dispatcher, MakeOutcome};

/// Execute the make command.
pub async fn execute_make(args: MakeArgs, formatter: &Formatter) -> Result<()> {
    let outcome = run_make(&args).await?;
    println!("{}", formatter.format_outcome(&outcome)?);
    Ok(())
}

/// Load configuration and dispatch one request.
pub async fn run_make(args: &MakeArgs) -> Result<MakeOutcome> {
    let mut config = config::load(args.config.as_deref())?;
    if let Some(out) = &args.out {
        config.output_dir = out.clone();
    }

    let dispatcher = Dispatcher::from_config(&config)?;
    Ok(dispatcher.make(&args.topic).await?)
}
