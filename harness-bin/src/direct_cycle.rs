//! Direct vault scenario: two deposit/withdraw legs against the same
//! vault — first in its canonical asset, then in a secondary accepted
//! asset via the multi-asset deposit path, each under its own
//! impersonated depositor.

use harness_runtime::config::DirectScenarioConfig;
use harness_runtime::{DepositRoute, ForkClient, HarnessError, VaultOperationSequencer};

const DEPOSIT_AMOUNT: &str = "0.000015";
const WITHDRAW_AMOUNT: &str = "0.000013";

fn setup_log() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};
    if tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .is_err()
    {}
}

#[tokio::main]
async fn main() -> Result<(), HarnessError> {
    setup_log();
    // Shared env first, scenario overlay second (overrides).
    dotenv::dotenv().ok();
    dotenv::from_filename(".env.direct").ok();

    let cfg = DirectScenarioConfig::from_env()?;
    let client = ForkClient::connect(&cfg.rpc_url)?;

    tracing::info!("── leg 1: canonical-asset deposit ──");
    let report = VaultOperationSequencer::new(&client)
        .run_direct_cycle(
            cfg.vault,
            &cfg.canonical_depositor,
            DEPOSIT_AMOUNT,
            DEPOSIT_AMOUNT,
            DepositRoute::Canonical,
        )
        .await?;
    report.log();

    tracing::info!("── leg 2: secondary-asset deposit ──");
    let report = VaultOperationSequencer::new(&client)
        .run_direct_cycle(
            cfg.vault,
            &cfg.secondary_depositor,
            DEPOSIT_AMOUNT,
            WITHDRAW_AMOUNT,
            DepositRoute::Secondary {
                token: cfg.secondary_asset,
            },
        )
        .await?;
    report.log();

    tracing::info!("scenario complete");
    Ok(())
}
