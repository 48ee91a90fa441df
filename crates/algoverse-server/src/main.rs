//! AlgoVerse Server CLI
//!
//! Starts the HTTP server that turns algorithm names into teaching pages.

use algoverse_server::{config::ServerConfig, start_server, ServerError};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using defaults (Groq, ./generated)");
        eprintln!("Usage: algoverse-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default()
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("AlgoVerse Server - Algorithm teaching page generator");
    println!();
    println!("USAGE:");
    println!("    algoverse-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENDPOINTS:");
    println!("    GET  /          Banner");
    println!("    GET  /health    Provider and model in use");
    println!("    POST /make      {{\"Algo_name\": \"BinarySearch\"}}");
    println!();
    println!("CONFIGURATION:");
    println!("    - bind_address / bind_port (default 127.0.0.1:8000)");
    println!("    - output_dir: where pages are written (default 'generated')");
    println!("    - atomic_writes: temp file then rename (default true)");
    println!("    - prompt_file: custom template containing {{algorithm}}");
    println!("    - [provider]: kind = groq | ollama | mock, model, endpoint, api_key_env");
    println!("    - [extractor]: extension, max_response_bytes, missing_code, topic_policy");
    println!();
    println!("Logging is controlled by RUST_LOG (default: info).");
}
