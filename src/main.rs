mod cli;
mod config;
mod error;
mod filfox;
mod ledger;
mod models;
mod reconciler;

use std::{fs::File, io};

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::Config;
use filfox::FilfoxClient;
use ledger::LedgerExporter;
use log::{error, info};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load()?;
    let client = FilfoxClient::new(&config)?;

    info!("Retrieving transfers for wallet {}", cli.wallet);
    let records = client
        .get_transfers(&cli.wallet)
        .with_context(|| format!("failed to retrieve transfers for {}", cli.wallet))?;

    info!("Received {} transfer records, reconciling", records.len());
    let transfers = reconciler::reconcile(&records).context("failed to reconcile transfer records")?;
    info!("Reconciled into {} transfers", transfers.len());

    let exporter = LedgerExporter::new(&config);

    if cli.stdout {
        exporter.write(io::stdout().lock(), &transfers)?;
        return Ok(());
    }

    if !cli.quiet {
        for transfer in &transfers {
            println!("{}", transfer);
        }
    }

    let path = cli.output_path();
    let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    exporter
        .write(file, &transfers)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Transfers written to {}", path.display());

    Ok(())
}
