//! Deposit-then-withdraw cycle orchestration.
//!
//! One cycle drives a single actor through a vault: bind the
//! impersonated signer, resolve metadata, snapshot shares, approve,
//! deposit, (optionally) obtain a withdrawal authorization, withdraw,
//! snapshot again. The chain is the only source of truth — every
//! balance is re-queried after the mutation it depends on has settled,
//! never cached across an await.
//!
//! The cycle is an explicit state machine; any on-chain revert aborts
//! it at the failing step with no retry.

use alloy::primitives::{Address, U256};
use chrono::DateTime;
use serde::Serialize;

use crate::authority::AuthorizationGrantor;
use crate::chain::ForkClient;
use crate::config::TellerScenarioConfig;
use crate::error::HarnessError;
use crate::proxy::{AssetProxy, TellerProxy, VaultProxy};
use crate::units::{from_base_units, to_base_units};

/// Ordered phases of a cycle. `Authorized` only occurs on the teller
/// path; the direct path withdraws straight from `Deposited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Bound,
    Approved,
    Deposited,
    Authorized,
    Withdrawn,
}

impl CyclePhase {
    /// Whether this phase may legally follow `prev`.
    pub fn follows(self, prev: CyclePhase) -> bool {
        use CyclePhase::*;
        matches!(
            (prev, self),
            (Idle, Bound)
                | (Bound, Approved)
                | (Approved, Deposited)
                | (Deposited, Authorized)
                | (Deposited, Withdrawn)
                | (Authorized, Withdrawn)
        )
    }
}

/// Which entry path a deposit takes into the vault.
#[derive(Debug, Clone, Copy)]
pub enum DepositRoute {
    /// `deposit(assets, receiver)` in the vault's canonical asset.
    Canonical,
    /// `deposit(token, assets, receiver, minShareAmount)` in a
    /// secondary accepted asset.
    Secondary { token: Address },
}

/// Share-balance snapshots observed across a completed cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub vault_name: String,
    pub asset_symbol: String,
    pub decimals: u8,
    pub shares_before: U256,
    pub shares_after: U256,
    pub shares_final: U256,
}

impl CycleReport {
    pub fn log(&self) {
        tracing::info!(
            vault = %self.vault_name,
            asset = %self.asset_symbol,
            before = %from_base_units(self.shares_before, self.decimals),
            after = %from_base_units(self.shares_after, self.decimals),
            final_shares = %from_base_units(self.shares_final, self.decimals),
            "cycle complete"
        );
    }
}

/// Runs one deposit-then-withdraw cycle against a vault.
pub struct VaultOperationSequencer<'a> {
    client: &'a ForkClient,
    phase: CyclePhase,
}

impl<'a> VaultOperationSequencer<'a> {
    pub fn new(client: &'a ForkClient) -> Self {
        Self {
            client,
            phase: CyclePhase::Idle,
        }
    }

    fn advance(&mut self, next: CyclePhase) {
        debug_assert!(
            next.follows(self.phase),
            "illegal cycle transition {:?} -> {next:?}",
            self.phase
        );
        tracing::debug!(from = ?self.phase, to = ?next, "cycle phase");
        self.phase = next;
    }

    /// Direct vault path: approve, deposit (canonical or secondary
    /// route), withdraw through the vault's own `withdraw`.
    ///
    /// Amounts are human-readable decimal strings, converted with the
    /// decimals of the vault's canonical asset, which are resolved
    /// once and fixed for the whole cycle.
    pub async fn run_direct_cycle(
        mut self,
        vault_address: Address,
        depositor: &str,
        deposit_amount: &str,
        withdraw_amount: &str,
        route: DepositRoute,
    ) -> Result<CycleReport, HarnessError> {
        let depositor_address = self.client.impersonate(depositor).await?;
        self.advance(CyclePhase::Bound);

        let provider = self.client.provider().clone();
        let vault = VaultProxy::bind(vault_address, provider.clone(), depositor_address);

        let vault_name = vault.name().await?;
        let canonical_asset = vault.asset().await?;
        let canonical = AssetProxy::bind(canonical_asset, provider.clone(), depositor_address);
        let decimals = canonical.decimals().await?;

        let deposit_token = match route {
            DepositRoute::Canonical => canonical_asset,
            DepositRoute::Secondary { token } => token,
        };
        let deposit_asset = AssetProxy::bind(deposit_token, provider.clone(), depositor_address);
        let asset_symbol = deposit_asset.symbol().await?;

        let tvl = vault.total_assets().await?;
        tracing::info!(
            vault = %vault_name,
            asset = %asset_symbol,
            decimals,
            tvl = %from_base_units(tvl, decimals),
            "resolved vault metadata"
        );

        let shares_before = vault.balance_of(depositor_address).await?;
        tracing::info!(
            wallet = %depositor_address,
            balance = %from_base_units(shares_before, decimals),
            "share balance before"
        );

        let deposit_units = to_base_units(deposit_amount, decimals)?;
        deposit_asset.approve(vault_address, deposit_units).await?;
        self.advance(CyclePhase::Approved);
        tracing::info!(
            amount = %from_base_units(deposit_units, decimals),
            "approved vault to pull deposit"
        );

        match route {
            DepositRoute::Canonical => {
                vault.deposit(deposit_units, depositor_address).await?;
            }
            DepositRoute::Secondary { token } => {
                // Zero disables the slippage floor.
                vault
                    .deposit_secondary(token, deposit_units, depositor_address, U256::ZERO)
                    .await?;
            }
        }
        self.advance(CyclePhase::Deposited);

        let shares_after = vault.balance_of(depositor_address).await?;
        tracing::info!(
            balance = %from_base_units(shares_after, decimals),
            "share balance after deposit"
        );
        ensure_deposit_credited(shares_before, shares_after)?;

        if matches!(route, DepositRoute::Secondary { .. }) {
            let max = vault.max_withdraw(depositor_address).await?;
            tracing::info!(max_withdraw = %from_base_units(max, decimals), "max withdrawable");
        }

        let withdraw_units = to_base_units(withdraw_amount, decimals)?;
        vault
            .withdraw(withdraw_units, depositor_address, depositor_address)
            .await?;
        self.advance(CyclePhase::Withdrawn);

        let shares_final = vault.balance_of(depositor_address).await?;
        tracing::info!(
            balance = %from_base_units(shares_final, decimals),
            "share balance final"
        );

        Ok(CycleReport {
            vault_name,
            asset_symbol,
            decimals,
            shares_before,
            shares_after,
            shares_final,
        })
    }

    /// Teller path: deposit through the teller, read the share unlock
    /// time, obtain the role/capability grant under the authority
    /// owner, then bulk-withdraw with a pre-estimated gas limit.
    pub async fn run_teller_cycle(
        mut self,
        cfg: &TellerScenarioConfig,
        deposit_amount: &str,
        withdraw_amount: &str,
    ) -> Result<CycleReport, HarnessError> {
        let depositor_address = self.client.impersonate(&cfg.depositor).await?;
        self.advance(CyclePhase::Bound);

        let provider = self.client.provider().clone();
        let vault = VaultProxy::bind(cfg.vault, provider.clone(), depositor_address);
        let asset = AssetProxy::bind(cfg.asset, provider.clone(), depositor_address);
        let teller = TellerProxy::bind(cfg.teller, provider.clone(), depositor_address);

        let vault_name = vault.name().await?;
        let asset_symbol = asset.symbol().await?;
        let decimals = asset.decimals().await?;
        tracing::info!(vault = %vault_name, asset = %asset_symbol, decimals, "resolved vault metadata");

        let shares_before = vault.balance_of(depositor_address).await?;
        tracing::info!(
            wallet = %depositor_address,
            balance = %from_base_units(shares_before, decimals),
            "share balance before"
        );

        let deposit_units = to_base_units(deposit_amount, decimals)?;
        // The teller routes assets into the vault, so the vault is the spender.
        asset.approve(cfg.vault, deposit_units).await?;
        self.advance(CyclePhase::Approved);
        tracing::info!(
            amount = %from_base_units(deposit_units, decimals),
            "approved vault to pull deposit"
        );

        teller.deposit(cfg.asset, deposit_units, U256::ZERO).await?;
        self.advance(CyclePhase::Deposited);

        let shares_after = vault.balance_of(depositor_address).await?;
        tracing::info!(
            balance = %from_base_units(shares_after, decimals),
            "share balance after deposit"
        );
        ensure_deposit_credited(shares_before, shares_after)?;

        let unlock = teller.share_unlock_time(depositor_address).await?;
        log_unlock_time(unlock);

        AuthorizationGrantor::new(self.client, cfg.authority, cfg.teller)
            .grant_bulk_withdraw(&cfg.authority_owner, depositor_address)
            .await?;
        self.advance(CyclePhase::Authorized);

        // Back to the depositor after the privileged interlude; the
        // repeat impersonation is idempotent and just re-funds.
        self.client.impersonate(&cfg.depositor).await?;

        let withdraw_units = to_base_units(withdraw_amount, decimals)?;
        let gas_limit = teller
            .estimate_bulk_withdraw_gas(cfg.asset, withdraw_units, U256::ZERO, depositor_address)
            .await?;
        tracing::info!(gas_limit, "gas estimate for bulkWithdraw");

        teller
            .bulk_withdraw(
                cfg.asset,
                withdraw_units,
                U256::ZERO,
                depositor_address,
                gas_limit,
            )
            .await?;
        self.advance(CyclePhase::Withdrawn);

        let shares_final = vault.balance_of(depositor_address).await?;
        tracing::info!(
            balance = %from_base_units(shares_final, decimals),
            "share balance final"
        );

        Ok(CycleReport {
            vault_name,
            asset_symbol,
            decimals,
            shares_before,
            shares_after,
            shares_final,
        })
    }
}

/// A settled deposit must never leave the depositor with fewer shares
/// than it started with; treat that as a vault-level fault, not a
/// condition to merely log.
fn ensure_deposit_credited(before: U256, after: U256) -> Result<(), HarnessError> {
    if after < before {
        return Err(HarnessError::chain(
            "deposit settlement",
            format!("share balance decreased from {before} to {after}"),
        ));
    }
    Ok(())
}

fn log_unlock_time(unlock: U256) {
    let rendered = u64::try_from(unlock)
        .ok()
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    match rendered {
        Some(at) => tracing::info!(timestamp = %unlock, %at, "share unlock time"),
        None => tracing::info!(timestamp = %unlock, "share unlock time"),
    }
}
