//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::Result;
use crate::output::{Formatter, OutputFormat};
use algoverse_domain::ArtifactSink;
use algoverse_extractor::{
    ExtractionResult, Extractor, ExtractorConfig, MissingCodePolicy, TopicPolicy,
};
use algoverse_sink::FsSink;
use std::io::Read;
use std::path::PathBuf;

/// Execute the extract command.
pub fn execute_extract(args: ExtractArgs, formatter: &Formatter) -> Result<()> {
    let raw = read_input(&args.input)?;
    let (result, path) = run_extract(&args, &raw)?;

    if path.is_none() && formatter.format() == OutputFormat::Text {
        // Artifact on stdout so it can be piped; summary on stderr
        println!("{}", result.artifact_text);
        eprintln!("{}", formatter.format_extraction(&result, None)?);
    } else {
        println!("{}", formatter.format_extraction(&result, path.as_deref())?);
    }

    Ok(())
}

/// Extract from `raw` and, unless this is a dry run, write the artifact.
pub fn run_extract(args: &ExtractArgs, raw: &str) -> Result<(ExtractionResult, Option<PathBuf>)> {
    let extractor = Extractor::try_new(extractor_config(args))?;
    let result = extractor.extract_named(raw, &args.topic)?;

    if args.dry_run {
        return Ok((result, None));
    }

    let sink = FsSink::new(&args.out);
    let path = sink.write(&result.artifact())?;
    Ok((result, Some(path)))
}

fn extractor_config(args: &ExtractArgs) -> ExtractorConfig {
    let mut config = ExtractorConfig::default();
    if args.fallback {
        config.missing_code = MissingCodePolicy::CleanedResponse;
    }
    if args.sanitize {
        config.topic_policy = TopicPolicy::Sanitize;
    }
    if let Some(extension) = &args.extension {
        config.extension = extension.trim_start_matches('.').to_string();
    }
    config
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}
