//! # Vein Lifecycle - Investment State Machine & Batch Passes
//!
//! Drives investments through `Pending -> Active -> Completed` with four
//! periodic, idempotent batch passes:
//!
//! | Pass | Selection | Effect |
//! |---------------------|------------------------------------------|-----------------------------------------|
//! | activation | pending, past the activation delay | activate, schedule first payout |
//! | payout distribution | active, payout due | credit accrued yield, advance schedule |
//! | completion | active, past maturity | flip to completed |
//! | difficulty refresh | - | recompute the global mining difficulty |
//!
//! Correctness rests on two rules, not on locks: the selection filter plus a
//! compare-and-swap status update is what removes a record from future
//! selection, and every per-item failure is logged and skipped rather than
//! aborting the pass. Re-running a pass over unchanged data is a no-op.

pub mod engine;
pub mod memory;
pub mod repository;

// Re-exports
pub use engine::{LifecycleConfig, LifecycleEngine, LifecycleError, PassSummary};
pub use memory::MemoryRepository;
pub use repository::{
    InvestmentFilter, InvestmentPatch, InvestmentRepository, RepoResult, RepositoryError,
};
