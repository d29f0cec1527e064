//! Teller scenario: deposit through the teller (time-locked shares),
//! grant the withdrawal role and capability under the authority owner,
//! then bulk-withdraw with a pre-estimated gas limit.

use harness_runtime::config::TellerScenarioConfig;
use harness_runtime::{ForkClient, HarnessError, VaultOperationSequencer};

const DEPOSIT_AMOUNT: &str = "0.00015";
const WITHDRAW_AMOUNT: &str = "0.0001";

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
    dotenv::from_filename(".env.teller").ok();

    let cfg = TellerScenarioConfig::from_env()?;
    let client = ForkClient::connect(&cfg.rpc_url)?;

    let report = VaultOperationSequencer::new(&client)
        .run_teller_cycle(&cfg, DEPOSIT_AMOUNT, WITHDRAW_AMOUNT)
        .await?;
    report.log();

    tracing::info!("scenario complete");
    Ok(())
}
