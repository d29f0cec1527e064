//! Environment-driven scenario configuration.
//!
//! Every required key is validated before the first chain call is
//! attempted. Contract addresses are parsed to [`Address`] at load
//! time; impersonation targets stay as raw strings so that
//! [`crate::chain::ForkClient::impersonate`] owns their validation.

use alloy::primitives::Address;

use crate::error::HarnessError;

/// Configuration for the teller deposit/withdraw scenario.
#[derive(Debug, Clone)]
pub struct TellerScenarioConfig {
    pub rpc_url: String,
    /// Depositor account, impersonated on the fork.
    pub depositor: String,
    /// Owner of the roles authority, impersonated for the grant sequence.
    pub authority_owner: String,
    pub vault: Address,
    pub teller: Address,
    pub asset: Address,
    pub authority: Address,
}

impl TellerScenarioConfig {
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, HarnessError> {
        Ok(Self {
            rpc_url: required(&get, "LOCAL_RPC")?,
            depositor: required(&get, "IMPERSONATED_ACCOUNT")?,
            authority_owner: required(&get, "AUTHORITY_OWNER_ADDRESS")?,
            vault: required_address(&get, "VAULT_ADDRESS")?,
            teller: required_address(&get, "TELLER_ADDRESS")?,
            asset: required_address(&get, "ASSET_ADDRESS")?,
            authority: required_address(&get, "AUTHORITY_CONTRACT_ADDRESS")?,
        })
    }
}

/// Configuration for the direct vault scenario: a canonical-asset leg
/// and a secondary-asset (multi-asset deposit) leg, each under its own
/// impersonated depositor.
#[derive(Debug, Clone)]
pub struct DirectScenarioConfig {
    pub rpc_url: String,
    pub canonical_depositor: String,
    pub secondary_depositor: String,
    pub vault: Address,
    /// Secondary asset accepted by the vault's multi-asset deposit path.
    pub secondary_asset: Address,
}

impl DirectScenarioConfig {
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, HarnessError> {
        Ok(Self {
            rpc_url: required(&get, "LOCAL_RPC")?,
            canonical_depositor: required(&get, "CANONICAL_DEPOSITOR")?,
            secondary_depositor: required(&get, "SECONDARY_DEPOSITOR")?,
            vault: required_address(&get, "VAULT_ADDRESS")?,
            secondary_asset: required_address(&get, "ASSET_ADDRESS")?,
        })
    }
}

fn required(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, HarnessError> {
    get(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| HarnessError::Config(format!("Missing required env variable {key}")))
}

fn required_address(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Address, HarnessError> {
    let raw = required(get, key)?;
    raw.parse()
        .map_err(|e| HarnessError::Config(format!("Invalid address in {key} ('{raw}'): {e}")))
}
