//! Pharmanet CLI - command-line interface to the supply chain workflow
//!
//! Runs one contract operation per invocation against a world state kept in a
//! JSON snapshot file:
//! - register organisations and record drug units
//! - place purchase orders, create and deliver shipments
//! - retail units to consumers
//! - inspect a unit's current state and history, and verify the ledger

use clap::{Parser, Subcommand};
use pharmanet_types::OrganizationRole;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Session;

/// Pharmanet CLI application
#[derive(Parser)]
#[command(name = "pharmanet")]
#[command(about = "Pharmanet - pharmaceutical supply chain workflow CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// World state snapshot file (in-memory only when omitted)
    #[arg(short, long, env = "PHARMANET_STATE")]
    state: Option<PathBuf>,

    /// Organisation role to submit transactions as
    #[arg(short, long, env = "PHARMANET_ORG")]
    org: Option<OrganizationRole>,

    /// Configuration file path
    #[arg(short, long, env = "PHARMANET_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Register an organisation
    Register {
        crn: String,
        name: String,
        location: String,
        /// Manufacturer, Distributor, Retailer or Transporter
        role: String,
    },

    /// Record a manufactured drug unit (manufacturer)
    AddDrug {
        name: String,
        serial: String,
        /// Manufacturing date, YYYY-MM-DD
        manufacturing_date: String,
        /// Expiry date, YYYY-MM-DD
        expiry_date: String,
        manufacturer_crn: String,
    },

    /// Place a purchase order (distributor or retailer)
    #[command(name = "create-po")]
    CreatePo {
        buyer_crn: String,
        seller_crn: String,
        drug_name: String,
        quantity: u32,
    },

    /// Ship the units of a purchase order (seller)
    CreateShipment {
        buyer_crn: String,
        drug_name: String,
        /// Comma-separated `drugName|serial` tokens
        assets: String,
        transporter_crn: String,
    },

    /// Confirm delivery of a shipment (transporter)
    UpdateShipment {
        buyer_crn: String,
        drug_name: String,
        transporter_crn: String,
    },

    /// Sell a drug unit to a consumer (retailer)
    Retail {
        name: String,
        serial: String,
        retailer_crn: String,
        consumer_id: String,
    },

    /// Show the current state of a drug unit
    ViewState { name: String, serial: String },

    /// Show every version of a drug unit, oldest first
    ViewHistory { name: String, serial: String },

    /// Check the hash chain of the transaction log
    VerifyLedger,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries JSON only.
    let filter = if cli.verbose {
        "pharmanet=debug"
    } else {
        "pharmanet=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let session = Session::open(cli.state, cli.config.as_deref(), cli.org)?;
    commands::execute(cli.command, &session).await
}
