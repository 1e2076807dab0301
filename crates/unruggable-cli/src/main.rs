//! Command-line unruggable gateway finder
//!
//! Looks up the verifier and gateways registered for an ENS name, either
//! against a live JSON-RPC endpoint or an offline registry snapshot, and
//! exposes the name codec helpers used along the way.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{FinderConfig, Overrides};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use unruggable_core::{
    namehash, reverse_name, Address, EncodedName, ErrorCategory, LookupFacade, MemoryRegistry,
    Registry, RegistrySnapshot,
};
use unruggable_params::Network;
use unruggable_rpc::EnsRegistry;

#[derive(Parser)]
#[command(name = "find-unruggable")]
#[command(about = "Find the unruggable gateways registered for an ENS name", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON-RPC endpoint
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// ENS registry address
    #[arg(long, global = true)]
    registry: Option<String>,

    /// Block to read at (`latest`, decimal or 0x hex)
    #[arg(long, global = true)]
    block: Option<String>,

    /// Per-query timeout in seconds, split across RPC retries
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Query all suffixes concurrently
    #[arg(long, global = true)]
    speculative: bool,

    /// Registry snapshot JSON for offline lookups
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the verifier and gateways for a name
    Find {
        /// Dotted name, or wire-format hex with --hex
        name: String,

        /// Treat the input as DNS wire-format hex
        #[arg(long)]
        hex: bool,

        /// Print JSON
        #[arg(long)]
        json: bool,

        /// Show which suffix matched
        #[arg(long)]
        trace: bool,
    },

    /// Encode a dotted name to wire-format hex
    Encode {
        /// Dotted name
        name: String,
    },

    /// Decode wire-format hex to a dotted name
    Decode {
        /// Wire-format hex
        hex: String,
    },

    /// Print the namehash of a dotted name
    Namehash {
        /// Dotted name
        name: String,
    },

    /// Print the primary-name reverse node name of an address
    Reverse {
        /// Account address
        address: String,

        /// Chain the primary name is for
        #[arg(long, default_value = "mainnet")]
        chain: String,
    },

    /// Print the resolved configuration as JSON
    Config,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            rpc_url: self.rpc_url.clone(),
            registry: self.registry.clone(),
            block: self.block.clone(),
            timeout_secs: self.timeout_secs,
            speculative: self.speculative,
            snapshot: self.snapshot.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level(cli.verbose))),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (label, code) = classify(&e);
            eprintln!("{}: {:#}", label, e);
            ExitCode::from(code)
        }
    }
}

/// Default filter when `RUST_LOG` is unset
fn log_level(verbose: u8) -> &'static str {
    if verbose == 0 {
        "warn"
    } else {
        "debug"
    }
}

/// Exit label and status for an error
fn classify(e: &anyhow::Error) -> (&'static str, u8) {
    match e.downcast_ref::<unruggable_core::Error>().map(|e| e.category()) {
        Some(ErrorCategory::Input) => ("malformed input", 2),
        Some(ErrorCategory::NotFound) => ("not found", 3),
        Some(ErrorCategory::Unavailable) => ("registry unavailable", 4),
        Some(ErrorCategory::Registry) => ("invalid registry response", 5),
        None => ("error", 1),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Find {
            name,
            hex,
            json,
            trace,
        } => {
            let config = FinderConfig::resolve(cli.config.as_deref(), &cli.overrides())?;
            run_find(&config, name, *hex, *json, *trace).await
        }
        Commands::Encode { name } => {
            println!("{}", EncodedName::encode(name)?.to_hex());
            Ok(())
        }
        Commands::Decode { hex } => {
            let name = EncodedName::from_hex(hex)?;
            println!("{}", name);
            Ok(())
        }
        Commands::Namehash { name } => {
            println!("{}", namehash(name));
            Ok(())
        }
        Commands::Config => {
            let config = FinderConfig::resolve(cli.config.as_deref(), &cli.overrides())?;
            println!("{}", config.to_json()?);
            Ok(())
        }
        Commands::Reverse { address, chain } => {
            let address = Address::parse(address)?;
            let network = Network::from_name(chain)?;
            println!("{}", reverse_name(&address, network.coin_type()));
            Ok(())
        }
    }
}

fn build_registry(config: &FinderConfig) -> anyhow::Result<Arc<dyn Registry>> {
    if let Some(path) = &config.snapshot {
        let snapshot = RegistrySnapshot::load(path)?;
        info!(
            "Using snapshot {} ({} entries)",
            path.display(),
            snapshot.entries.len()
        );
        return Ok(Arc::new(MemoryRegistry::from_snapshot(snapshot)));
    }

    let registry = EnsRegistry::from_config(&config.rpc).context("Failed to create RPC client")?;
    info!(
        "Using registry {} via {} at block {}",
        registry.registry_address(),
        config.rpc.endpoint,
        config.rpc.block
    );
    Ok(Arc::new(registry))
}

async fn run_find(
    config: &FinderConfig,
    input: &str,
    hex: bool,
    json: bool,
    trace: bool,
) -> anyhow::Result<()> {
    let name = if hex {
        EncodedName::from_hex(input)?
    } else {
        EncodedName::encode(input)?
    };
    debug!("Looking up {} ({})", name, name.to_hex());

    let facade = LookupFacade::new(build_registry(config)?, config.walker_config());

    if trace {
        let resolution = facade.trace(&name).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&resolution)?);
        } else {
            let matched = if resolution.matched.is_empty() {
                "[root]"
            } else {
                resolution.matched.as_str()
            };
            println!("name      {}", resolution.name);
            println!("matched   {} (depth {})", matched, resolution.depth);
            println!("node      {}", resolution.node);
            print_result(&resolution.result);
        }
    } else {
        let result = facade.find(&name).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_result(&result);
        }
    }
    Ok(())
}

fn print_result(result: &unruggable_core::LookupResult) {
    println!("verifier  {}", result.verifier);
    for gateway in &result.gateways {
        println!("gateway   {}", gateway);
    }
}
