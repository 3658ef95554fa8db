//! # Vein Node
//!
//! Host process for the vault platform: TOML configuration, the periodic
//! job scheduler driving the lifecycle passes, and graceful shutdown.

pub mod config;
pub mod node;
pub mod scheduler;

// Re-exports
pub use config::{JobsConfig, NodeConfig};
pub use node::VeinNode;
pub use scheduler::JobScheduler;
