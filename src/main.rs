//! Nextcloud Operator Entry Point
//!
//! Handles one host event per invocation: loads stored state, reconciles,
//! publishes the pod spec when appropriate, and saves state.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use nextcloud_operator::config::CharmConfig;
use nextcloud_operator::controller::{
    run_hook, CharmEvent, FilePlatform, FileStateStore, Reconciler, SpecSink,
};
use nextcloud_operator::relation::{parse_relation_data, RelationData};
use nextcloud_operator::Error;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "nextcloud-operator", version, about)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Handle a single event delivered by the host
    Handle(HandleArgs),
    /// Print the JSON schema of the charm configuration
    Schema,
}

#[derive(clap::Args, Debug)]
struct HandleArgs {
    /// Event to handle
    #[arg(long, value_enum)]
    event: EventKind,

    /// Charm configuration (YAML)
    #[arg(long, env = "NEXTCLOUD_OPERATOR_CONFIG")]
    config: PathBuf,

    /// File holding state between invocations
    #[arg(long, env = "NEXTCLOUD_OPERATOR_STATE", default_value = ".nextcloud-operator-state.json")]
    state_file: PathBuf,

    /// Whether this unit is the leader
    #[arg(long, env = "JUJU_LEADER")]
    leader: bool,

    /// Application name, used as the container name
    #[arg(long, env = "JUJU_APPLICATION_NAME", default_value = "nextcloud")]
    app_name: String,

    /// Remote unit that published the relation data
    #[arg(long, env = "JUJU_REMOTE_UNIT")]
    remote_unit: Option<String>,

    /// Relation data published by the remote unit (YAML mapping)
    #[arg(long)]
    relation_data: Option<PathBuf>,

    /// Write the published pod spec here instead of stdout
    #[arg(long)]
    spec_out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EventKind {
    Start,
    ConfigChanged,
    UpgradeCharm,
    DatabaseRelationChanged,
    DatabaseRelationBroken,
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    // stdout may carry the pod spec, so logs go to stderr
    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn load_relation_data(path: Option<&PathBuf>) -> Result<RelationData, Error> {
    let Some(path) = path else {
        return Ok(BTreeMap::new());
    };
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("cannot read relation data {}: {}", path.display(), e))
    })?;
    parse_relation_data(&raw)
}

fn build_event(args: &HandleArgs) -> Result<CharmEvent, Error> {
    Ok(match args.event {
        EventKind::Start => CharmEvent::Start,
        EventKind::ConfigChanged => CharmEvent::ConfigChanged,
        EventKind::UpgradeCharm => CharmEvent::UpgradeCharm,
        EventKind::DatabaseRelationChanged => CharmEvent::DatabaseRelationChanged {
            unit: args.remote_unit.clone(),
            data: load_relation_data(args.relation_data.as_ref())?,
        },
        EventKind::DatabaseRelationBroken => CharmEvent::DatabaseRelationBroken,
    })
}

fn handle(args: HandleArgs) -> Result<(), Error> {
    let config = CharmConfig::from_yaml_file(&args.config)?;
    let event = build_event(&args)?;

    let sink = match args.spec_out {
        Some(path) => SpecSink::File(path),
        None => SpecSink::Stdout,
    };
    let platform = FilePlatform::new(args.app_name, args.leader, sink);
    let store = FileStateStore::new(args.state_file);
    debug!(state_file = %store.path().display(), "Handling {}", event.name());

    let mut reconciler = Reconciler::new(platform, config);
    run_hook(&mut reconciler, &store, &event)?;

    if let Some(status) = reconciler.platform().status() {
        info!("Final unit status: {}", status);
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    info!(
        "Starting Nextcloud Operator v{} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHA"),
        env!("BUILD_DATE")
    );

    match cli.command {
        Command::Handle(args) => handle(args),
        Command::Schema => {
            let schema = schemars::schema_for!(CharmConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}
