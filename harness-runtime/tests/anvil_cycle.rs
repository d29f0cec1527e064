//! Impersonation lifecycle against a local Anvil node.
//!
//! Ignored by default: spawning requires an `anvil` binary on PATH.

use alloy::node_bindings::Anvil;
use alloy::primitives::{Address, U256, address};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use harness_runtime::ForkClient;
use harness_runtime::chain::IMPERSONATION_FUNDING_WEI;

const WHALE: Address = address!("0x00000000000000000000000000000000000a11ce");

#[tokio::test]
#[ignore = "requires a local anvil binary"]
async fn impersonation_grants_signing_and_gas() {
    let anvil = Anvil::new().spawn();
    let client = ForkClient::connect(&anvil.endpoint()).unwrap();

    let whale = client.impersonate(&WHALE.to_string()).await.unwrap();
    assert_eq!(whale, WHALE);
    assert_eq!(
        client.provider().get_balance(WHALE).await.unwrap(),
        IMPERSONATION_FUNDING_WEI
    );

    // The impersonated account can sign a transaction without a key.
    let tx = TransactionRequest::default()
        .from(WHALE)
        .to(Address::repeat_byte(0x99))
        .value(U256::from(1u64));
    let receipt = client
        .provider()
        .send_transaction(tx)
        .await
        .unwrap()
        .get_receipt()
        .await
        .unwrap();
    assert!(receipt.status());
}

#[tokio::test]
#[ignore = "requires a local anvil binary"]
async fn repeated_impersonation_resets_the_funded_balance() {
    let anvil = Anvil::new().spawn();
    let client = ForkClient::connect(&anvil.endpoint()).unwrap();

    client.impersonate(&WHALE.to_string()).await.unwrap();

    // Spend some gas so the balance drifts below the funding amount.
    let tx = TransactionRequest::default()
        .from(WHALE)
        .to(Address::repeat_byte(0x99))
        .value(U256::from(1u64));
    client
        .provider()
        .send_transaction(tx)
        .await
        .unwrap()
        .get_receipt()
        .await
        .unwrap();
    assert_ne!(
        client.provider().get_balance(WHALE).await.unwrap(),
        IMPERSONATION_FUNDING_WEI
    );

    // Re-impersonation is idempotent and re-funds to the fixed amount.
    client.impersonate(&WHALE.to_string()).await.unwrap();
    assert_eq!(
        client.provider().get_balance(WHALE).await.unwrap(),
        IMPERSONATION_FUNDING_WEI
    );
}
