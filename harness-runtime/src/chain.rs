//! Fork connection and account impersonation.
//!
//! The harness signs nothing locally: the forked node is asked to
//! impersonate each test identity (`anvil_impersonateAccount`, also
//! honored by hardhat-style nodes) and transactions are submitted with
//! an explicit `from`. Impersonated accounts start with no native
//! balance, so every impersonation also sets the balance — a
//! correctness precondition for paying gas, not an optimization.

use alloy::network::Ethereum;
use alloy::primitives::{Address, U256, uint};
use alloy::providers::fillers::{
    BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
};
use alloy::providers::{Identity, Provider, ProviderBuilder, RootProvider};

use crate::error::HarnessError;

/// Native balance granted to every impersonated account: 100 ETH,
/// enough to cover the gas of a whole scenario many times over.
pub const IMPERSONATION_FUNDING_WEI: U256 = uint!(100_000000000000000000_U256);

/// The provider produced by `ProviderBuilder::new().connect_http(...)`.
///
/// Fills nonce, gas and chain ID but carries no wallet: impersonated
/// sends go out as `eth_sendTransaction` with `from` set, and the fork
/// signs them itself.
pub type ForkProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
    Ethereum,
>;

/// Connection to a single forked-chain RPC endpoint.
#[derive(Debug)]
pub struct ForkClient {
    provider: ForkProvider,
}

impl ForkClient {
    /// Connect to the fork at `rpc_url`. A malformed URL is a fatal
    /// configuration error.
    pub fn connect(rpc_url: &str) -> Result<Self, HarnessError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| HarnessError::Config(format!("Invalid RPC URL '{rpc_url}': {e}")))?;

        let provider = ProviderBuilder::new().connect_http(url);
        Ok(Self { provider })
    }

    pub fn provider(&self) -> &ForkProvider {
        &self.provider
    }

    /// Obtain transaction-signing authority for `account` on the fork
    /// and fund it for gas.
    ///
    /// Idempotent: re-impersonating the same address simply resets its
    /// balance to [`IMPERSONATION_FUNDING_WEI`].
    pub async fn impersonate(&self, account: &str) -> Result<Address, HarnessError> {
        let address: Address = account
            .parse()
            .map_err(|_| HarnessError::InvalidAddress(account.to_string()))?;

        self.provider
            .raw_request::<_, ()>("anvil_impersonateAccount".into(), (address,))
            .await
            .map_err(|e| HarnessError::chain("anvil_impersonateAccount", e))?;

        self.provider
            .raw_request::<_, ()>("anvil_setBalance".into(), (address, IMPERSONATION_FUNDING_WEI))
            .await
            .map_err(|e| HarnessError::chain("anvil_setBalance", e))?;

        tracing::info!(%address, "impersonated account, funded for gas");
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::providers::mock::Asserter;

    const ACCOUNT: &str = "0xdddddddddddddddddddddddddddddddddddddddd";

    fn mocked_client(asserter: &Asserter) -> ForkClient {
        ForkClient {
            provider: ProviderBuilder::new().connect_mocked_client(asserter.clone()),
        }
    }

    #[test]
    fn connect_rejects_malformed_url() {
        let err = ForkClient::connect("not a url").unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[test]
    fn client_is_debug_formattable() {
        let asserter = Asserter::new();
        let client = mocked_client(&asserter);
        assert!(format!("{client:?}").contains("ForkClient"));
    }

    #[tokio::test]
    async fn impersonate_rejects_malformed_address() {
        let asserter = Asserter::new();
        let client = mocked_client(&asserter);

        let err = client.impersonate("0x1234").await.unwrap_err();
        assert!(matches!(err, HarnessError::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn impersonate_runs_both_chain_control_requests() {
        let asserter = Asserter::new();
        // anvil_impersonateAccount then anvil_setBalance, both null results
        asserter.push_success(&serde_json::Value::Null);
        asserter.push_success(&serde_json::Value::Null);

        let client = mocked_client(&asserter);
        let address = client.impersonate(ACCOUNT).await.unwrap();
        assert_eq!(address, ACCOUNT.parse::<Address>().unwrap());
    }

    #[tokio::test]
    async fn impersonate_is_repeatable() {
        let asserter = Asserter::new();
        for _ in 0..4 {
            asserter.push_success(&serde_json::Value::Null);
        }

        let client = mocked_client(&asserter);
        let first = client.impersonate(ACCOUNT).await.unwrap();
        let second = client.impersonate(ACCOUNT).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn impersonate_surfaces_node_rejection() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("method not available");

        let client = mocked_client(&asserter);
        let err = client.impersonate(ACCOUNT).await.unwrap_err();
        assert!(matches!(err, HarnessError::ChainCall { .. }), "{err}");
    }
}
