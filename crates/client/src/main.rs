//! Travel client binary.
//!
//! Composition root for the travel stack: loads the catalog and tuning from a
//! data directory, wires the executor to the simulated world, runs a single
//! request and prints the resulting snapshot as JSON on stdout.
//!
//! # Examples
//!
//! ```bash
//! # Walk to a trainer starting from Theed
//! cargo run -p travel-client -- --from naboo/theed trainer "Master Marksman"
//!
//! # Only print the route
//! cargo run -p travel-client -- --from naboo/theed plan "Jabba's Palace"
//! ```
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use transit_content::ContentFactory;
use transit_core::{Location, RoutePlan, StopCatalog};

use config::ClientConfig;
use runtime::{
    RequirementSet, SimulatedWorld, TravelExecutor, TravelHandle, TravelStatus,
};

/// Plan and run multi-hop journeys over a transit catalog
#[derive(Parser)]
#[command(name = "travel")]
#[command(version)]
struct Cli {
    /// Directory holding catalog.ron and travel.toml
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Starting stop (defaults to the first cataloged stop)
    #[arg(long, value_name = "PLANET/CITY", value_parser = parse_location)]
    from: Option<Location>,

    /// Requirement tag the avatar holds (repeatable)
    #[arg(long = "satisfied", value_name = "TAG")]
    satisfied: Vec<String>,

    /// Known fact for unlock conditions (repeatable)
    #[arg(long = "fact", value_name = "KEY=VALUE", value_parser = parse_fact)]
    facts: Vec<(String, String)>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Travel to a trainer
    Trainer { name: String },
    /// Travel to a quest giver
    Quest { name: String },
    /// Travel to a gated location
    Unlock { name: String },
    /// Print the planned route without traveling
    Plan { name: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let env_config = ClientConfig::from_env();
    let _log_guard = logging::setup_logging(env_config.session_id.as_deref())?;

    let factory = ContentFactory::new(env_config.resolve_data_dir(cli.data_dir.clone()));
    tracing::info!("Loading content from {}", factory.data_dir().display());

    let catalog = Arc::new(factory.load_catalog()?);
    let travel_config = env_config.apply(factory.load_config()?);

    let origin = match cli.from.clone() {
        Some(origin) => origin,
        None => default_origin(&catalog)?,
    };
    if catalog.stop(&origin).is_none() {
        bail!("Starting point {origin} is not a cataloged stop");
    }

    let world = Arc::new(SimulatedWorld::new(catalog.clone(), origin.clone()));
    let policy = cli
        .satisfied
        .iter()
        .fold(RequirementSet::new(), |set, tag| set.with_tag(tag.as_str()));
    let policy = cli
        .facts
        .iter()
        .fold(policy, |set, (key, value)| set.with_fact(key.as_str(), value.as_str()));

    let executor = TravelExecutor::builder()
        .catalog(catalog.clone())
        .config(travel_config)
        .world(world.clone())
        .policy(Arc::new(policy))
        .build()?;

    let handle = executor.handle();
    spawn_event_logger(&handle);
    spawn_interrupt_listener(handle);

    let result = match &cli.command {
        Command::Plan { name } => return print_plan(&executor, &origin, name),
        Command::Trainer { name } => executor.travel_to_trainer(name).await,
        Command::Quest { name } => executor.travel_to_quest(name).await,
        Command::Unlock { name } => executor.travel_to_unlock(name).await,
    };

    let snapshot = executor.status();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    match result {
        Ok(()) if snapshot.status == TravelStatus::Arrived => {
            tracing::info!("Arrived at {}", world.location());
            Ok(ExitCode::SUCCESS)
        }
        Ok(()) => Ok(ExitCode::FAILURE),
        Err(error) => {
            tracing::error!("Travel failed: {error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_plan(executor: &TravelExecutor, origin: &Location, name: &str) -> Result<ExitCode> {
    let destination = executor
        .catalog()
        .find_destination(name)
        .ok_or_else(|| anyhow!("Destination '{name}' is not cataloged"))?;

    match executor.plan(origin, destination) {
        Some(RoutePlan::Travel(route)) => {
            println!("{}", serde_json::to_string_pretty(&route)?);
            Ok(ExitCode::SUCCESS)
        }
        Some(RoutePlan::AlreadyThere { stop }) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "already_there": stop }))?
            );
            Ok(ExitCode::SUCCESS)
        }
        None => {
            tracing::warn!("No route from {origin} to '{name}'");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Mirrors journey events into the log until the executor goes away.
fn spawn_event_logger(handle: &TravelHandle) {
    let mut events = handle.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::debug!(target: "travel::events", ?event, "travel event"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(target: "travel::events", skipped, "event logger lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Ctrl-C cancels the journey at the next hop boundary.
fn spawn_interrupt_listener(handle: TravelHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling journey");
            handle.cancel();
        }
    });
}

fn default_origin(catalog: &StopCatalog) -> Result<Location> {
    catalog
        .stops()
        .next()
        .map(|stop| stop.location().clone())
        .context("Catalog has no stops")
}

fn parse_location(value: &str) -> Result<Location, String> {
    match value.split_once('/') {
        Some((planet, city)) if !planet.is_empty() && !city.is_empty() => {
            Ok(Location::new(planet, city))
        }
        _ => Err(format!("expected PLANET/CITY, got '{value}'")),
    }
}

fn parse_fact(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_location_and_fact_arguments() {
        let cli = Cli::try_parse_from([
            "travel",
            "--from",
            "naboo/theed",
            "--satisfied",
            "level_10",
            "--fact",
            "faction=rebel",
            "trainer",
            "Master Marksman",
        ])
        .unwrap();

        assert_eq!(cli.from, Some(Location::new("naboo", "theed")));
        assert_eq!(cli.satisfied, vec!["level_10".to_owned()]);
        assert_eq!(cli.facts, vec![("faction".into(), "rebel".into())]);
        assert!(matches!(cli.command, Command::Trainer { ref name } if name == "Master Marksman"));
    }

    #[test]
    fn rejects_malformed_location() {
        assert!(parse_location("naboo").is_err());
        assert!(parse_location("/theed").is_err());
        assert!(parse_fact("faction").is_err());
    }
}
