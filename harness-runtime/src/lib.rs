//! Scripted integration harness for vault deposit/withdraw flows on a
//! forked chain.
//!
//! Drives two entry paths into the same share vault: the vault's own
//! deposit/withdraw interface, and a teller that adds a share time
//! lock plus a role-gated bulk withdrawal. All test identities are
//! impersonated on the fork; every mutation settles before any read
//! that depends on it.

pub mod authority;
pub mod chain;
pub mod config;
pub mod contracts;
pub mod error;
pub mod proxy;
pub mod sequencer;
pub mod units;

pub use chain::ForkClient;
pub use error::HarnessError;
pub use sequencer::{CycleReport, DepositRoute, VaultOperationSequencer};
