//! # Vein Core
//!
//! Core types for the Vein vault platform: the vault catalog, investment
//! records, status state machine, clock abstraction, and the shared error
//! taxonomy.
//!
//! ## Vault Tiers
//!
//! | Tier | Principal Range | Typical APY | Mining Power |
//! |---------|-------------------|-------------|--------------|
//! | Starter | 100 - 10,000 | 5-10% | 100-110 |
//! | Pro | 1,000 - 50,000 | 8-14.5% | 200 |
//! | Elite | 10,000 - 1,000,000 | 10-20% | 350 |
//!
//! Vault definitions are immutable once loaded; investments move through a
//! monotonic `Pending -> Active -> Completed` lifecycle driven by the batch
//! passes in `vein-lifecycle`.

pub mod clock;
pub mod error;
pub mod investment;
pub mod types;
pub mod vault;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, VeinError};
pub use investment::{BoostRecord, Investment};
pub use types::{
    BoostTerms, InvestmentId, InvestmentStatus, PayoutSchedule, UserId, VaultId, VaultTier,
};
pub use vault::{VaultCatalog, VaultDefinition};
