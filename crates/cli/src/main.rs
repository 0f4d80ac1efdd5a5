//! jobscout command-line entry point.
//!
//! Prints JSON results on stdout; logs go to stderr.

use anyhow::Result;
use clap::{Parser, Subcommand};
use jobscout_client::JdPipeline;
use jobscout_core::AppConfig;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jobscout", version, about = "Extract and analyze job descriptions from posting URLs")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Skip the headless-browser fallback
    #[arg(long, global = true)]
    no_render: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cleaned job-description text as {url, text, chars}
    Extract {
        /// Job posting URL
        url: String,
    },
    /// Print a structured summary of the job description
    Analyze {
        /// Job posting URL
        url: String,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    println!("{out}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load()?;
    if cli.no_render && config.render_enabled {
        tracing::info!("--no-render set; headless rendering disabled");
        config.render_enabled = false;
    }
    tracing::debug!(
        render = config.render_enabled,
        fetch_timeout_ms = config.fetch_timeout_ms,
        llm_model = %config.llm_model,
        "configuration loaded"
    );

    let pipeline = JdPipeline::from_config(&config)?;

    match cli.command {
        Command::Extract { url } => print_json(&pipeline.extract(&url).await?, cli.pretty),
        Command::Analyze { url } => print_json(&pipeline.analyze_url(&url).await?, cli.pretty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_with_global_flags() {
        let cli = Cli::try_parse_from(["jobscout", "analyze", "https://jobs.lever.co/acme/1", "--pretty", "--no-render"]).unwrap();
        assert!(cli.pretty);
        assert!(cli.no_render);
        assert!(matches!(cli.command, Command::Analyze { ref url } if url == "https://jobs.lever.co/acme/1"));
    }

    #[test]
    fn test_parse_requires_url() {
        assert!(Cli::try_parse_from(["jobscout", "extract"]).is_err());
    }
}
