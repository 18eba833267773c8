//! dqa - Post-validation actions for data quality runs
//!
//! Loads the action list from configuration, builds every action against a
//! data context and runs them in order against one validation result.

mod cli;
mod error;
mod events;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use dqa_actions::{ActionFactory, ActionList, ActionOutcome};
use dqa_config::Config;
use dqa_context::DataContext;
use dqa_events::{AppEvent, EventEmitter, EventReceiver, GeneralEvent};
use dqa_net::WebhookClient;
use dqa_render::RendererRegistry;
use dqa_types::{
    DataAsset, ExpectationSuiteIdentifier, ResourceIdentifier, RunExtras, RunIdentifier,
    ValidationResult, ValidationResultIdentifier,
};
use std::path::Path;
use std::process;
use std::sync::Arc;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting dqa v{}", env!("CARGO_PKG_VERSION"));

    // File (or defaults), then environment overrides
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;

    let (event_sender, event_receiver) = dqa_events::channel();
    let context = Arc::new(DataContext::from_config(&config)?);
    let transport = Arc::new(WebhookClient::from_config(&config.network)?);
    let factory = ActionFactory::new(&context, RendererRegistry::with_builtins(), transport)
        .with_events(event_sender.clone());

    let mut event_handler = EventHandler::new(cli.global.json, cli.global.debug);

    match cli.command {
        Commands::Check => {
            let list = factory.build_list(&config.actions)?;
            drain_events(event_receiver, &mut event_handler);
            print_check(&list, cli.global.json);
        }
        Commands::Run {
            result,
            batch_id,
            run_name,
            data_asset,
            extras,
        } => {
            let list = factory.build_list(&config.actions)?;
            let validation_result = load_result(&result).await?;
            let identifier =
                result_identifier(&validation_result, batch_id, run_name, data_asset.as_deref())?;
            let data_asset = data_asset.map(DataAsset::new);
            let extras: RunExtras = extras
                .into_iter()
                .map(|(key, value)| (key, serde_json::Value::String(value)))
                .collect();

            event_handler.set_correlation_id(identifier.to_key().to_string());
            let operation = format!("validation {}", identifier.to_key());
            event_sender.emit(AppEvent::General(GeneralEvent::OperationStarted {
                operation: operation.clone(),
            }));

            let run = list.run(
                Some(&validation_result),
                &identifier,
                data_asset.as_ref(),
                &extras,
            );
            let outcomes = with_events(run, event_receiver, &mut event_handler, || {
                event_sender.emit(AppEvent::General(GeneralEvent::OperationCompleted {
                    operation: operation.clone(),
                    success: true,
                }));
            })
            .await?;

            print_outcomes(&outcomes, cli.global.json)?;
        }
    }

    info!("Command completed successfully");
    Ok(())
}

/// Drive `work` while rendering events as they arrive
async fn with_events<T, F>(
    work: F,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
    on_success: impl FnOnce(),
) -> Result<T, CliError>
where
    F: std::future::Future<Output = Result<T, dqa_errors::Error>>,
{
    let mut work = Box::pin(work);

    loop {
        select! {
            result = &mut work => {
                if result.is_ok() {
                    on_success();
                }
                drain_events(event_receiver, event_handler);
                return result.map_err(CliError::from);
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

fn drain_events(mut event_receiver: EventReceiver, event_handler: &mut EventHandler) {
    while let Ok(event) = event_receiver.try_recv() {
        event_handler.handle_event(event);
    }
}

async fn load_result(path: &Path) -> Result<ValidationResult, CliError> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}

/// Identify `result` in the stores: suite and run from its meta, batch from
/// the command line or the data asset name.
fn result_identifier(
    result: &ValidationResult,
    batch_id: Option<String>,
    run_name: Option<String>,
    data_asset: Option<&str>,
) -> Result<ResourceIdentifier, CliError> {
    let run_id = result
        .meta
        .run_id
        .clone()
        .unwrap_or_else(|| RunIdentifier::new(run_name, chrono::Utc::now()));

    let batch_id = batch_id
        .or_else(|| data_asset.map(str::to_string))
        .or_else(|| result.meta.data_asset_name().map(str::to_string))
        .ok_or_else(|| {
            CliError::InvalidArguments(
                "--batch-id is required when the result names no data asset".to_string(),
            )
        })?;

    Ok(ValidationResultIdentifier::new(
        ExpectationSuiteIdentifier::new(result.meta.expectation_suite_name.clone()),
        run_id,
        batch_id,
    )
    .into())
}

fn print_check(list: &ActionList, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::json!({ "actions": list.names() }));
    } else if list.is_empty() {
        println!("No actions configured.");
    } else {
        for name in list.names() {
            println!("{name}");
        }
    }
}

fn print_outcomes(outcomes: &[(String, ActionOutcome)], json_mode: bool) -> Result<(), CliError> {
    if json_mode {
        let entries: Vec<_> = outcomes
            .iter()
            .map(|(name, outcome)| serde_json::json!({ "action": name, "result": outcome }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (name, outcome) in outcomes {
            println!("{name}: {}", outcome.summary());
        }
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;
    let default_filter = if debug_enabled {
        "info,dqa=debug"
    } else {
        "warn,dqa=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    if json_mode {
        // stdout carries the JSON result; logs go to stderr as JSON lines
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    }
}
