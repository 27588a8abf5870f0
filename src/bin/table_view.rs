use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt::time::Uptime, EnvFilter};

use poker_channel_view::selectors::table_view;
use poker_channel_view::table::{Address, HandId, StateTree};

const LOG_TARGET: &str = "table_view";
const DEFAULT_FILTER: &str = "table_view=info,poker_channel_view=info";

#[derive(Debug, Parser)]
#[command(name = "table_view")]
#[command(about = "Print what a viewer sees at a table from a JSON state snapshot", long_about = None)]
struct Args {
    /// Path to the JSON state snapshot
    #[arg(long, env = "TABLE_VIEW_STATE")]
    state: PathBuf,

    /// Table address (0x-prefixed hex)
    #[arg(long)]
    table: Address,

    /// Hand index; defaults to the latest hand recorded for the table
    #[arg(long)]
    hand: Option<HandId>,

    /// Viewer address; defaults to the snapshot's account
    #[arg(long)]
    viewer: Option<Address>,

    /// Compact instead of pretty JSON output
    #[arg(long, action = clap::ArgAction::SetTrue)]
    compact: bool,

    /// Toggle structured (JSON) tracing output
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.json)?;

    let raw = fs::read_to_string(&args.state)
        .with_context(|| format!("failed to read state snapshot {}", args.state.display()))?;
    let state = StateTree::from_json(&raw).context("failed to parse state snapshot")?;

    let table = state
        .table(&args.table)
        .ok_or_else(|| anyhow!("table {} not present in snapshot", args.table))?;
    let hand_id = match args.hand {
        Some(hand) => hand,
        None => table
            .latest_hand_id()
            .ok_or_else(|| anyhow!("table {} has no hands", args.table))?,
    };

    let viewer = args.viewer.or_else(|| state.viewer().copied());
    if viewer.is_none() {
        warn!(
            target: LOG_TARGET,
            "no viewer address given or in snapshot; all hole cards stay hidden"
        );
    }

    let view = table_view(&state, &args.table, hand_id, viewer.as_ref())
        .ok_or_else(|| anyhow!("hand {hand_id} not present at table {}", args.table))?;
    info!(
        target: LOG_TARGET,
        table = %args.table,
        hand = hand_id,
        seats = view.seats.len(),
        viewer_pos = ?view.viewer_pos,
        "derived table view"
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.compact {
        serde_json::to_writer(&mut handle, &view)?;
    } else {
        serde_json::to_writer_pretty(&mut handle, &view)?;
    }
    handle.write_all(b"\n")?;

    Ok(())
}

fn init_tracing(json: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_timer(Uptime::default())
        .with_writer(io::stderr);
    if json {
        builder
            .with_ansi(false)
            .json()
            .try_init()
            .map_err(|err| anyhow!("failed to initialize tracing subscriber: {err}"))
    } else {
        builder
            .try_init()
            .map_err(|err| anyhow!("failed to initialize tracing subscriber: {err}"))
    }
}
