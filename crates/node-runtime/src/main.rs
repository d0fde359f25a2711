//! # IOU Ledger Node Runtime
//!
//! Starts an in-process ledger network and runs one demo issuance from the
//! first configured party to the second.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (from env)
//! 2. Install the tracing subscriber
//! 3. Validate configuration and start the network
//! 4. Issue a demo IOU and report where it was recorded
//! 5. Shut down

use anyhow::{Context, Result};
use iou_01_contract::{Amount, ContractState};
use ledger_telemetry::{init_telemetry, log_tx_event};
use node_runtime::{LedgerNetwork, NodeConfig};
use std::env;
use std::time::Duration;
use tracing::info;

/// Demo amount from `IOU_DEMO_AMOUNT` (default: 10) and `IOU_DEMO_TOKEN`
/// (default: GBP).
fn demo_amount() -> Amount {
    let quantity = env::var("IOU_DEMO_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);
    let token = env::var("IOU_DEMO_TOKEN").unwrap_or_else(|_| "GBP".to_string());
    Amount::new(quantity, token)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env();
    let _telemetry =
        init_telemetry(config.telemetry.clone()).context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  IOU Ledger Node Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    config.validate().context("Invalid node configuration")?;
    let lender_name = config.parties[0].clone();
    let borrower_name = config.parties[1].clone();
    let network = LedgerNetwork::start(config).context("Failed to start ledger network")?;

    let lender = network
        .node(&lender_name)
        .context("Lender is not hosted by this node")?;
    let borrower = network
        .party(&borrower_name)
        .context("Borrower is not hosted by this node")?;

    let finalized = lender
        .issue_to(&borrower, demo_amount())
        .await
        .context("Demo issuance failed")?;
    let tx_id = finalized.id();

    if let Some(ContractState::Obligation(iou)) = finalized.tx().outputs.first() {
        log_tx_event!(
            info,
            "runtime",
            "IOU issued",
            tx_id.short(),
            amount = %iou.amount,
            lender = %iou.lender.name,
            borrower = %iou.borrower.name,
            linear_id = %iou.linear_id
        );
    }

    // The borrower records asynchronously after the lender returns
    tokio::time::sleep(Duration::from_millis(100)).await;
    for node in network.nodes() {
        info!(
            party = %node.identity().name,
            recorded = node.transaction(&tx_id).is_some(),
            "Ledger state"
        );
    }

    network.shutdown_and_wait().await;
    Ok(())
}
