//! Typed proxies binding {contract address, interface, impersonated
//! sender} into callable handles.
//!
//! Reads are plain `eth_call`s and may run at any time. Mutating calls
//! are submitted with the bound `from` address and awaited through to
//! a mined receipt before returning; no dependent read is trusted
//! until its predecessor has settled. A receipt with a failed status
//! is an error, carrying the operation name as context.

use alloy::primitives::{Address, FixedBytes, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionReceipt;

use crate::contracts::{IERC20, IMultiAssetVault, IRolesAuthority, ITeller, IVault};
use crate::error::HarnessError;

fn ensure_success(context: &str, receipt: &TransactionReceipt) -> Result<(), HarnessError> {
    if receipt.status() {
        Ok(())
    } else {
        Err(HarnessError::chain(context, "transaction reverted"))
    }
}

/// ERC-20 asset handle.
pub struct AssetProxy<P>
where
    P: Provider + Clone,
{
    inner: IERC20::IERC20Instance<P>,
    sender: Address,
}

impl<P> AssetProxy<P>
where
    P: Provider + Clone,
{
    pub fn bind(address: Address, provider: P, sender: Address) -> Self {
        Self {
            inner: IERC20::new(address, provider),
            sender,
        }
    }

    pub async fn name(&self) -> Result<String, HarnessError> {
        self.inner
            .name()
            .call()
            .await
            .map_err(|e| HarnessError::chain("asset.name", e))
    }

    pub async fn symbol(&self) -> Result<String, HarnessError> {
        self.inner
            .symbol()
            .call()
            .await
            .map_err(|e| HarnessError::chain("asset.symbol", e))
    }

    pub async fn decimals(&self) -> Result<u8, HarnessError> {
        self.inner
            .decimals()
            .call()
            .await
            .map_err(|e| HarnessError::chain("asset.decimals", e))
    }

    pub async fn balance_of(&self, owner: Address) -> Result<U256, HarnessError> {
        self.inner
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| HarnessError::chain("asset.balanceOf", e))
    }

    /// Approve `spender` to pull `amount`, settled before return. The
    /// following deposit reverts with an allowance error without this.
    pub async fn approve(&self, spender: Address, amount: U256) -> Result<(), HarnessError> {
        let receipt = self
            .inner
            .approve(spender, amount)
            .from(self.sender)
            .send()
            .await
            .map_err(|e| HarnessError::chain("asset.approve", e))?
            .get_receipt()
            .await
            .map_err(|e| HarnessError::chain("asset.approve receipt", e))?;
        ensure_success("asset.approve", &receipt)
    }
}

/// Share vault handle covering both deposit shapes.
pub struct VaultProxy<P>
where
    P: Provider + Clone,
{
    vault: IVault::IVaultInstance<P>,
    multi: IMultiAssetVault::IMultiAssetVaultInstance<P>,
    sender: Address,
}

impl<P> VaultProxy<P>
where
    P: Provider + Clone,
{
    pub fn bind(address: Address, provider: P, sender: Address) -> Self {
        Self {
            vault: IVault::new(address, provider.clone()),
            multi: IMultiAssetVault::new(address, provider),
            sender,
        }
    }

    pub fn address(&self) -> Address {
        *self.vault.address()
    }

    pub async fn name(&self) -> Result<String, HarnessError> {
        self.vault
            .name()
            .call()
            .await
            .map_err(|e| HarnessError::chain("vault.name", e))
    }

    /// Resolve the vault's canonical underlying asset.
    pub async fn asset(&self) -> Result<Address, HarnessError> {
        self.vault
            .asset()
            .call()
            .await
            .map_err(|e| HarnessError::chain("vault.asset", e))
    }

    pub async fn total_assets(&self) -> Result<U256, HarnessError> {
        self.vault
            .totalAssets()
            .call()
            .await
            .map_err(|e| HarnessError::chain("vault.totalAssets", e))
    }

    pub async fn balance_of(&self, owner: Address) -> Result<U256, HarnessError> {
        self.vault
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| HarnessError::chain("vault.balanceOf", e))
    }

    pub async fn max_withdraw(&self, owner: Address) -> Result<U256, HarnessError> {
        self.vault
            .maxWithdraw(owner)
            .call()
            .await
            .map_err(|e| HarnessError::chain("vault.maxWithdraw", e))
    }

    /// Canonical-asset deposit, settled before return.
    pub async fn deposit(&self, assets: U256, receiver: Address) -> Result<(), HarnessError> {
        let receipt = self
            .vault
            .deposit(assets, receiver)
            .from(self.sender)
            .send()
            .await
            .map_err(|e| HarnessError::chain("vault.deposit", e))?
            .get_receipt()
            .await
            .map_err(|e| HarnessError::chain("vault.deposit receipt", e))?;
        ensure_success("vault.deposit", &receipt)
    }

    /// Secondary-asset deposit. A `min_share_amount` of zero disables
    /// the slippage floor; a floor above the mintable shares reverts.
    pub async fn deposit_secondary(
        &self,
        token: Address,
        assets: U256,
        receiver: Address,
        min_share_amount: U256,
    ) -> Result<(), HarnessError> {
        let receipt = self
            .multi
            .deposit(token, assets, receiver, min_share_amount)
            .from(self.sender)
            .send()
            .await
            .map_err(|e| HarnessError::chain("vault.deposit (multi-asset)", e))?
            .get_receipt()
            .await
            .map_err(|e| HarnessError::chain("vault.deposit (multi-asset) receipt", e))?;
        ensure_success("vault.deposit (multi-asset)", &receipt)
    }

    /// Direct-path withdrawal, settled before return. Reverts on-chain
    /// for amounts above `maxWithdraw(owner)`.
    pub async fn withdraw(
        &self,
        assets: U256,
        receiver: Address,
        owner: Address,
    ) -> Result<(), HarnessError> {
        let receipt = self
            .vault
            .withdraw(assets, receiver, owner)
            .from(self.sender)
            .send()
            .await
            .map_err(|e| HarnessError::chain("vault.withdraw", e))?
            .get_receipt()
            .await
            .map_err(|e| HarnessError::chain("vault.withdraw receipt", e))?;
        ensure_success("vault.withdraw", &receipt)
    }
}

/// Teller handle: deposit with time-locked shares, role-gated bulk
/// withdrawal with a caller-sized gas limit.
pub struct TellerProxy<P>
where
    P: Provider + Clone,
{
    inner: ITeller::ITellerInstance<P>,
    sender: Address,
}

impl<P> TellerProxy<P>
where
    P: Provider + Clone,
{
    pub fn bind(address: Address, provider: P, sender: Address) -> Self {
        Self {
            inner: ITeller::new(address, provider),
            sender,
        }
    }

    pub async fn deposit(
        &self,
        asset: Address,
        amount: U256,
        minimum_mint: U256,
    ) -> Result<(), HarnessError> {
        let receipt = self
            .inner
            .deposit(asset, amount, minimum_mint)
            .from(self.sender)
            .send()
            .await
            .map_err(|e| HarnessError::chain("teller.deposit", e))?
            .get_receipt()
            .await
            .map_err(|e| HarnessError::chain("teller.deposit receipt", e))?;
        ensure_success("teller.deposit", &receipt)
    }

    /// Timestamp before which voluntary withdrawal may be rejected.
    /// The harness reports it but does not wait it out.
    pub async fn share_unlock_time(&self, account: Address) -> Result<U256, HarnessError> {
        self.inner
            .shareUnlockTime(account)
            .call()
            .await
            .map_err(|e| HarnessError::chain("teller.shareUnlockTime", e))
    }

    /// Size the gas limit for a `bulkWithdraw` before submitting it.
    pub async fn estimate_bulk_withdraw_gas(
        &self,
        asset: Address,
        shares: U256,
        minimum_assets: U256,
        to: Address,
    ) -> Result<u64, HarnessError> {
        self.inner
            .bulkWithdraw(asset, shares, minimum_assets, to)
            .from(self.sender)
            .estimate_gas()
            .await
            .map_err(|e| HarnessError::estimation("teller.bulkWithdraw", e))
    }

    /// Role-gated bulk withdrawal. Reverts with an authorization error
    /// unless the sender's role carries the bulkWithdraw capability.
    pub async fn bulk_withdraw(
        &self,
        asset: Address,
        shares: U256,
        minimum_assets: U256,
        to: Address,
        gas_limit: u64,
    ) -> Result<(), HarnessError> {
        let receipt = self
            .inner
            .bulkWithdraw(asset, shares, minimum_assets, to)
            .from(self.sender)
            .gas(gas_limit)
            .send()
            .await
            .map_err(|e| HarnessError::chain("teller.bulkWithdraw", e))?
            .get_receipt()
            .await
            .map_err(|e| HarnessError::chain("teller.bulkWithdraw receipt", e))?;
        ensure_success("teller.bulkWithdraw", &receipt)
    }
}

/// Roles-authority handle, bound under the authority owner.
pub struct AuthorityProxy<P>
where
    P: Provider + Clone,
{
    inner: IRolesAuthority::IRolesAuthorityInstance<P>,
    sender: Address,
}

impl<P> AuthorityProxy<P>
where
    P: Provider + Clone,
{
    pub fn bind(address: Address, provider: P, sender: Address) -> Self {
        Self {
            inner: IRolesAuthority::new(address, provider),
            sender,
        }
    }

    pub async fn set_user_role(
        &self,
        user: Address,
        role: u8,
        enabled: bool,
    ) -> Result<(), HarnessError> {
        let receipt = self
            .inner
            .setUserRole(user, role, enabled)
            .from(self.sender)
            .send()
            .await
            .map_err(|e| HarnessError::chain("authority.setUserRole", e))?
            .get_receipt()
            .await
            .map_err(|e| HarnessError::chain("authority.setUserRole receipt", e))?;
        ensure_success("authority.setUserRole", &receipt)
    }

    pub async fn set_role_capability(
        &self,
        role: u8,
        target: Address,
        selector: FixedBytes<4>,
        enabled: bool,
    ) -> Result<(), HarnessError> {
        let receipt = self
            .inner
            .setRoleCapability(role, target, selector, enabled)
            .from(self.sender)
            .send()
            .await
            .map_err(|e| HarnessError::chain("authority.setRoleCapability", e))?
            .get_receipt()
            .await
            .map_err(|e| HarnessError::chain("authority.setRoleCapability receipt", e))?;
        ensure_success("authority.setRoleCapability", &receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::providers::{ProviderBuilder, mock::Asserter};

    const VAULT: &str = "0x2222222222222222222222222222222222222222";
    const SENDER: &str = "0xdddddddddddddddddddddddddddddddddddddddd";

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn call_return<T: alloy::sol_types::SolValue>(value: T) -> alloy::primitives::Bytes {
        alloy::primitives::Bytes::from(value.abi_encode())
    }

    #[tokio::test]
    async fn vault_reads_decode_single_values() {
        let asserter = Asserter::new();
        // name() -> abi-encoded string, balanceOf() -> uint256
        asserter.push_success(&call_return("Bitcoin Vault".to_string()));
        asserter.push_success(&call_return(U256::from(1500u64)));

        let provider = ProviderBuilder::new().connect_mocked_client(asserter);
        let vault = VaultProxy::bind(addr(VAULT), provider, addr(SENDER));

        assert_eq!(vault.name().await.unwrap(), "Bitcoin Vault");
        assert_eq!(
            vault.balance_of(addr(SENDER)).await.unwrap(),
            U256::from(1500u64)
        );
    }

    #[tokio::test]
    async fn vault_read_failure_maps_to_chain_call_error() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("execution reverted");

        let provider = ProviderBuilder::new().connect_mocked_client(asserter);
        let vault = VaultProxy::bind(addr(VAULT), provider, addr(SENDER));

        let err = vault.total_assets().await.unwrap_err();
        match err {
            HarnessError::ChainCall { context, .. } => assert_eq!(context, "vault.totalAssets"),
            other => panic!("expected ChainCall, got {other}"),
        }
    }

    #[test]
    fn proxies_report_their_bound_address() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter);
        let vault = VaultProxy::bind(addr(VAULT), provider, addr(SENDER));
        assert_eq!(vault.address(), addr(VAULT));
    }
}
