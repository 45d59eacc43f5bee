//! Fast Client daemon: genesis tooling and transaction replay.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use fast_engine::GenesisState;
use fast_node::{InMemoryApp, LogFormat, NodeConfig, ReplayFile};
use fast_types::AccountAddress;

#[derive(Parser)]
#[command(name = "fast-daemon", about = "Fast Client credit ledger daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "FAST_CONFIG")]
    config: Option<PathBuf>,

    /// Chain identifier used for eligibility signatures.
    #[arg(long, env = "FAST_CHAIN_ID")]
    chain_id: Option<String>,

    /// Governance authority address (`acct_...`).
    #[arg(long, env = "FAST_AUTHORITY")]
    authority: Option<AccountAddress>,

    /// Token denomination held in escrow.
    #[arg(long, env = "FAST_BOND_DENOM")]
    bond_denom: Option<String>,

    /// Genesis file (JSON).
    #[arg(long, env = "FAST_GENESIS")]
    genesis: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "FAST_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FAST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Genesis file tooling.
    #[command(name = "genesis")]
    Genesis {
        #[command(subcommand)]
        action: GenesisAction,
    },
    /// Replay a JSON transaction file against an in-memory ledger.
    ///
    /// Prints one JSON line per transaction, then the exported state.
    Replay {
        /// Transaction file to replay.
        txs: PathBuf,
    },
}

#[derive(clap::Subcommand)]
enum GenesisAction {
    /// Print the default genesis state.
    Default,
    /// Validate a genesis file.
    Validate {
        /// Genesis file to check. Defaults to the configured genesis.
        file: Option<PathBuf>,
    },
}

impl Cli {
    fn node_config(&self) -> anyhow::Result<NodeConfig> {
        let base = match &self.config {
            Some(path) => NodeConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => NodeConfig::default(),
        };
        let config = NodeConfig {
            chain_id: self.chain_id.clone().unwrap_or(base.chain_id),
            authority: self.authority.unwrap_or(base.authority),
            bond_denom: self.bond_denom.clone().unwrap_or(base.bond_denom),
            genesis_file: self.genesis.clone().or(base.genesis_file),
            log_format: self.log_format.unwrap_or(base.log_format),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
        };
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.node_config()?;
    fast_node::init_logging(config.log_format, &config.log_level);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Genesis { action } => match action {
            GenesisAction::Default => {
                serde_json::to_writer_pretty(&mut out, &GenesisState::default_genesis())?;
                writeln!(out)?;
            }
            GenesisAction::Validate { file } => {
                let path = file
                    .or(config.genesis_file)
                    .context("no genesis file given and none configured")?;
                let genesis = fast_node::read_genesis_file(&path)
                    .with_context(|| format!("validating {}", path.display()))?;
                tracing::info!(
                    clients = genesis.fast_clients.len(),
                    users = genesis.fast_users.len(),
                    transfers = genesis.transfers.len(),
                    "genesis is valid"
                );
                writeln!(out, "{}: ok", path.display())?;
            }
        },
        Command::Replay { txs } => {
            let mut app = InMemoryApp::in_memory(&config);
            match &config.genesis_file {
                Some(path) => app
                    .init_chain_from_file(path)
                    .with_context(|| format!("loading genesis {}", path.display()))?,
                None => app.init_chain(&GenesisState::default_genesis())?,
            }

            let content = std::fs::read_to_string(&txs)
                .with_context(|| format!("reading {}", txs.display()))?;
            let file = ReplayFile::from_json(&content)
                .with_context(|| format!("parsing {}", txs.display()))?;

            tracing::info!(
                chain_id = %config.chain_id,
                blocks = file.blocks.len(),
                "replaying transactions"
            );
            for outcome in fast_node::replay(&mut app, &file)? {
                serde_json::to_writer(&mut out, &outcome)?;
                writeln!(out)?;
            }
            serde_json::to_writer(&mut out, &app.export()?)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
