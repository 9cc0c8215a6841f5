//! tunesmith-daemon: AI song concept generation daemon.
//!
//! This binary can run in two modes:
//! - CLI mode: Generate one song concept and print it as JSON
//! - Daemon mode: JSON-RPC server driven by a front end

use log::info;

use tunesmith_daemon::cli::Cli;
use tunesmith_daemon::config::DaemonConfig;
use tunesmith_daemon::error::{DaemonError, Result};
use tunesmith_daemon::generation::SongGenerator;
use tunesmith_daemon::provider::GeminiClient;
use tunesmith_daemon::rpc::run_server;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        eprintln!("Hint: {}", e.code.recovery_hint());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    if !cli.is_daemon_mode() && !cli.is_cli_mode() {
        print_usage();
        return Ok(());
    }

    let mut config = DaemonConfig::from_env();
    if let Some(language) = cli.language() {
        config.language = language;
    }
    if let Some(reason) = config.validate() {
        return Err(DaemonError::config_invalid(reason));
    }

    match cli.prompt.as_deref() {
        Some(prompt) if !cli.is_daemon_mode() => run_cli_mode(config, prompt).await,
        _ => run_daemon_mode(config).await,
    }
}

/// Generates one concept and prints it on stdout.
async fn run_cli_mode(config: DaemonConfig, prompt: &str) -> Result<()> {
    info!("Generating song concept in {} for \"{}\"", config.language, prompt);

    let generator = SongGenerator::new(GeminiClient::new(&config)?);
    let song = generator.generate(prompt, config.language).await;

    let json = serde_json::to_string_pretty(&song)
        .map_err(|e| DaemonError::malformed_response(format!("Failed to encode song: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// Runs the daemon mode (JSON-RPC server).
async fn run_daemon_mode(config: DaemonConfig) -> Result<()> {
    info!("=== tunesmith-daemon JSON-RPC Server ===");
    info!("Session language: {}", config.language);
    if !config.has_api_key() {
        info!("No API key configured; generations will return the fallback song");
    }

    let provider = GeminiClient::new(&config)?;
    info!("Text model: {}, image model: {}", provider.text_model(), config.image_model);
    run_server(config, provider).await
}

/// Prints usage information.
fn print_usage() {
    eprintln!("tunesmith-daemon: AI song concept generation");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  Generate one concept:");
    eprintln!("    tunesmith-daemon --prompt \"neon rain over a sleeping city\" --language en");
    eprintln!();
    eprintln!("  Daemon mode (JSON-RPC server):");
    eprintln!("    tunesmith-daemon --daemon");
    eprintln!();
    eprintln!("Environment: TUNESMITH_API_KEY, TUNESMITH_LANGUAGE, TUNESMITH_DEPLOYMENT, RUST_LOG");
    eprintln!("Run 'tunesmith-daemon --help' for full options.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_usage_doesnt_panic() {
        print_usage();
    }
}
