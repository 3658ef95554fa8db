//! Vein node
//!
//! Wires the catalog, repository, lifecycle engine, and job scheduler
//! together and runs until interrupted.

use crate::config::NodeConfig;
use crate::scheduler::JobScheduler;
use chrono::Duration as ChronoDuration;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::info;
use vein_core::{SystemClock, VaultCatalog};
use vein_lifecycle::{InvestmentRepository, LifecycleConfig, LifecycleEngine, MemoryRepository};

/// A running Vein vault platform node
pub struct VeinNode {
    config: NodeConfig,
    catalog: Arc<VaultCatalog>,
    repository: Arc<dyn InvestmentRepository>,
}

impl VeinNode {
    /// Build a node from configuration with the bundled in-memory store
    pub fn new(config: NodeConfig) -> anyhow::Result<Self> {
        let catalog = Arc::new(config.catalog.build(config.economics.boost)?);
        Ok(Self {
            config,
            catalog,
            repository: Arc::new(MemoryRepository::new()),
        })
    }

    /// Build a node against an externally provided store
    pub fn with_repository(
        config: NodeConfig,
        repository: Arc<dyn InvestmentRepository>,
    ) -> anyhow::Result<Self> {
        let catalog = Arc::new(config.catalog.build(config.economics.boost)?);
        Ok(Self {
            config,
            catalog,
            repository,
        })
    }

    /// The catalog this node serves
    pub fn catalog(&self) -> &Arc<VaultCatalog> {
        &self.catalog
    }

    /// Run the job loops until ctrl-c
    pub async fn run(&self) -> anyhow::Result<()> {
        info!("Starting node '{}'", self.config.node.name);
        info!(
            "Catalog: {} vaults ({} active)",
            self.catalog.len(),
            self.catalog.active_vaults().count()
        );
        info!(
            "Jobs: activation every {}s (delay {}h), payout every {}s, completion every {}s",
            self.config.jobs.activation_interval_secs,
            self.config.jobs.activation_delay_hours,
            self.config.jobs.payout_interval_secs,
            self.config.jobs.completion_interval_secs,
        );

        let engine = Arc::new(LifecycleEngine::new(
            self.repository.clone(),
            self.catalog.clone(),
            Arc::new(SystemClock),
            LifecycleConfig {
                activation_delay: ChronoDuration::hours(
                    self.config.jobs.activation_delay_hours as i64,
                ),
            },
            self.config.economics.mining,
        ));

        let (shutdown_tx, _) = broadcast::channel(1);
        let scheduler = JobScheduler::new(engine, self.config.jobs.clone());
        let handles = scheduler.spawn(&shutdown_tx);

        info!("Node running; press ctrl-c to stop");
        signal::ctrl_c().await?;

        info!("Shutdown signal received, stopping job loops...");
        let _ = shutdown_tx.send(());
        for handle in handles {
            let _ = handle.await;
        }

        info!("Node stopped");
        Ok(())
    }
}
