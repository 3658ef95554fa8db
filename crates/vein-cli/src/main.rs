//! Vein CLI
//!
//! Command-line interface for running Vein nodes and previewing
//! investments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vein_engine::{build_quote, QuoteRequest};
use vein_node::{NodeConfig, VeinNode};

#[derive(Parser)]
#[command(name = "vein")]
#[command(version = "0.1.0")]
#[command(about = "Vein - Tiered Fixed-Term Vault Platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a Vein node
    Node {
        /// Configuration file path
        #[arg(short, long, default_value = "vein.toml")]
        config: PathBuf,
    },

    /// List the vault catalog
    Vaults {
        /// Configuration file path (built-in catalog when absent)
        #[arg(short, long, default_value = "vein.toml")]
        config: PathBuf,

        /// Include deactivated vaults
        #[arg(long)]
        all: bool,
    },

    /// Preview an investment (APY, earnings, payouts, mining)
    Quote {
        /// Vault id
        #[arg(short, long)]
        vault: u32,

        /// Principal to deposit
        #[arg(short, long)]
        principal: f64,

        /// Market value of a KARAT boost deposit
        #[arg(long)]
        karat: Option<f64>,

        /// Market value of an EMBER boost deposit
        #[arg(long)]
        ember: Option<f64>,

        /// Mining difficulty to project against
        #[arg(long, default_value_t = 1.0)]
        difficulty: f64,

        /// Configuration file path (built-in catalog when absent)
        #[arg(short, long, default_value = "vein.toml")]
        config: PathBuf,
    },

    /// Version information
    Version,
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false),
        )
        .init();
}

fn load_config(path: &PathBuf) -> anyhow::Result<NodeConfig> {
    if path.exists() {
        NodeConfig::load(path)
    } else {
        tracing::debug!("Config {:?} not found, using defaults", path);
        Ok(NodeConfig::default())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Node { config } => {
            tracing::info!("╔══════════════════════════════════════════════╗");
            tracing::info!("║            VEIN NODE v0.1.0                  ║");
            tracing::info!("║   Tiered Fixed-Term Vault Platform           ║");
            tracing::info!("╚══════════════════════════════════════════════╝");
            tracing::info!("Config: {:?}", config);

            let node_config = load_config(&config)?;
            let node = VeinNode::new(node_config)?;
            node.run().await?;
        }

        Commands::Vaults { config, all } => {
            let node_config = load_config(&config)?;
            let catalog = node_config.catalog.build(node_config.economics.boost)?;

            println!(
                "{:<10} {:<8} {:>6} {:<12} {:>12} {:>12} {:>6} {:>6} {:>6}",
                "ID", "TIER", "MONTHS", "SCHEDULE", "MIN", "MAX", "BASE%", "MAX%", "POWER"
            );
            for vault in catalog.all_vaults() {
                if !all && !vault.is_active {
                    continue;
                }
                println!(
                    "{:<10} {:<8} {:>6} {:<12} {:>12} {:>12} {:>6} {:>6} {:>6}",
                    vault.id.to_string(),
                    vault.tier.name(),
                    vault.duration_months,
                    vault.payout_schedule.to_string(),
                    vault.min_investment,
                    vault.max_investment,
                    vault.base_apy,
                    vault.max_apy,
                    vault.mining_power,
                );
            }
        }

        Commands::Quote {
            vault,
            principal,
            karat,
            ember,
            difficulty,
            config,
        } => {
            let node_config = load_config(&config)?;
            let catalog = node_config.catalog.build(node_config.economics.boost)?;

            let request = QuoteRequest {
                vault_id: vein_core::VaultId(vault),
                principal,
                karat_market_value_usd: karat,
                ember_market_value_usd: ember,
            };

            match build_quote(&catalog, &node_config.economics.mining, difficulty, &request) {
                Ok(quote) => {
                    println!("{}", serde_json::to_string_pretty(&quote)?);
                    for warning in &quote.warnings {
                        eprintln!("warning: {}", warning);
                    }
                }
                Err(e) => {
                    eprintln!("quote rejected: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            println!("Vein v0.1.0");
            println!();
            println!("Components:");
            println!("  - Tiered vault catalog (Starter / Pro / Elite)");
            println!("  - KARAT + EMBER boost composition");
            println!("  - ORE mining with supply-based difficulty");
            println!("  - Lifecycle batch engine (activation / payout / completion)");
        }
    }

    Ok(())
}
