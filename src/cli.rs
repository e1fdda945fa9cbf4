use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "filfox-ledger-export")]
#[command(about = "Export a Filecoin wallet's transfer history from Filfox as a Ledger Live CSV")]
pub struct Cli {
    /// Wallet address to export
    pub wallet: String,
    /// CSV file to write; defaults to the first 9 characters of the wallet
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,
    /// Write the CSV to standard output instead of a file
    #[arg(long)]
    pub stdout: bool,
    /// Skip the per-transfer summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let prefix: String = self.wallet.chars().take(9).collect();
            PathBuf::from(format!("{}.csv", prefix))
        })
    }
}
