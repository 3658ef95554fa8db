//! Periodic job scheduler
//!
//! One independent loop per lifecycle pass, each on its own interval and
//! listening on a shared shutdown channel. There is no inter-job
//! synchronization: the passes' selection filters and CAS updates are the
//! sole concurrency guard, so overlapping runs are safe (though a
//! multi-replica deployment still wants an external lease; see DESIGN.md).

use crate::config::JobsConfig;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};
use vein_lifecycle::{LifecycleEngine, LifecycleError, PassSummary};

/// Spawns and owns the periodic pass loops
pub struct JobScheduler {
    engine: Arc<LifecycleEngine>,
    jobs: JobsConfig,
}

impl JobScheduler {
    /// Create a scheduler around an engine
    pub fn new(engine: Arc<LifecycleEngine>, jobs: JobsConfig) -> Self {
        Self { engine, jobs }
    }

    /// Spawn all four pass loops; each stops when `shutdown` fires
    pub fn spawn(&self, shutdown: &broadcast::Sender<()>) -> Vec<JoinHandle<()>> {
        vec![
            spawn_pass_loop(
                "activation",
                Duration::from_secs(self.jobs.activation_interval_secs),
                shutdown.subscribe(),
                self.engine.clone(),
                |engine| async move { engine.run_activation_pass().await },
            ),
            spawn_pass_loop(
                "payout",
                Duration::from_secs(self.jobs.payout_interval_secs),
                shutdown.subscribe(),
                self.engine.clone(),
                |engine| async move { engine.run_payout_pass().await },
            ),
            spawn_pass_loop(
                "completion",
                Duration::from_secs(self.jobs.completion_interval_secs),
                shutdown.subscribe(),
                self.engine.clone(),
                |engine| async move { engine.run_completion_pass().await },
            ),
            spawn_pass_loop(
                "difficulty-refresh",
                Duration::from_secs(self.jobs.difficulty_refresh_interval_secs),
                shutdown.subscribe(),
                self.engine.clone(),
                |engine| async move { engine.run_difficulty_refresh().await },
            ),
        ]
    }
}

fn spawn_pass_loop<F, Fut>(
    name: &'static str,
    every: Duration,
    mut shutdown: broadcast::Receiver<()>,
    engine: Arc<LifecycleEngine>,
    pass: F,
) -> JoinHandle<()>
where
    F: Fn(Arc<LifecycleEngine>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<PassSummary, LifecycleError>> + Send,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        info!("{} loop started (every {:?})", name, every);

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("{} loop shutting down", name);
                    break;
                }
                _ = ticker.tick() => {
                    // A pass-fatal error (failed selection query) is logged
                    // and retried on the next tick; per-item failures are
                    // already folded into the summary.
                    if let Err(e) = pass(engine.clone()).await {
                        error!("{} pass failed: {}", name, e);
                    }
                }
            }
        }
    })
}
