//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dqa - Post-validation actions for data quality runs
#[derive(Parser)]
#[command(name = "dqa")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run post-validation actions against a validation result")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH", env = "DQA_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the configured action list against a validation result file
    Run {
        /// Validation result document (JSON)
        result: PathBuf,

        /// Batch identifier; defaults to the result's data asset name
        #[arg(long)]
        batch_id: Option<String>,

        /// Run name used when the result carries no run id
        #[arg(long)]
        run_name: Option<String>,

        /// Name of the validated data asset
        #[arg(long)]
        data_asset: Option<String>,

        /// Extra key=value pairs handed to every action
        #[arg(long = "extra", value_name = "KEY=VALUE", value_parser = parse_extra)]
        extras: Vec<(String, String)>,
    },

    /// Build every configured action without running it
    Check,
}

fn parse_extra(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
