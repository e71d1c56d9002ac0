//! CLI entry point for the rapport-relay replayer.

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufRead, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use rapport_core::config::load_section;
use rapport_core::RelationshipGraph;
use rapport_graph::{load_graph_csv, GraphUpdater, SchemaNormalizer};

use rapport_relay::config::RelayConfig;
use rapport_relay::persist::{open_log, store_snapshot};
use rapport_relay::pipeline::RelayPipeline;

#[derive(Parser)]
#[command(name = "rapport-relay")]
#[command(about = "Replay NPC relationship change batches into the graph")]
struct Cli {
    /// Line-delimited JSON batches (default: stdin).
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// CSV file with the initial relation table.
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Directory for change-log snapshots (overrides config).
    #[arg(long)]
    log_dir: Option<String>,

    /// Continue the most recent stored change log instead of starting fresh.
    #[arg(long)]
    resume: bool,

    /// Config file prefix (default: rapport).
    #[arg(short, long, default_value = "rapport")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let relay_config: RelayConfig = load_section(&cli.config, "relay")?;

    let graph = initial_graph(&cli, &relay_config)?;
    let log_dir = cli.log_dir.as_deref().unwrap_or(&relay_config.log_dir);
    let (store, log) = open_log(log_dir, cli.resume)?;

    let updater = GraphUpdater::new(SchemaNormalizer::new(relay_config.alias_table()?));
    let pipeline = RelayPipeline::new(
        updater,
        relay_config.event_prefix.as_str(),
        relay_config.queue_capacity,
    );

    let outcome = pipeline.run(open_input(&cli).await?, graph, log).await?;
    let snapshot_id = store_snapshot(&store, &outcome.log)?;
    tracing::info!(
        %snapshot_id,
        batches = outcome.batches,
        skipped = outcome.transport.skipped,
        "Relay complete"
    );

    println!("{}", serde_json::to_string_pretty(&outcome.graph)?);
    Ok(())
}

fn initial_graph(cli: &Cli, config: &RelayConfig) -> anyhow::Result<RelationshipGraph> {
    let path = cli
        .graph
        .clone()
        .or_else(|| config.initial_graph.as_ref().map(PathBuf::from));

    match path {
        Some(path) => Ok(load_graph_csv(path)?),
        None => {
            tracing::info!("No initial graph, starting empty");
            Ok(RelationshipGraph::new())
        }
    }
}

async fn open_input(cli: &Cli) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}
