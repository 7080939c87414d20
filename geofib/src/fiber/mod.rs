//! Fiber network: vaults connected by backbone ducts, and drops routed through them.

mod manager;
mod vault;

pub use manager::FiberManager;
pub use vault::{Vault, VaultId, VaultSummary};
