use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "qr-tally")]
#[command(about = "Tally barcode and QR scans with duplicate suppression", long_about = None)]
pub struct Cli {
    /// Store directory, overriding the configured one
    #[arg(long, global = true)]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read decoded codes from stdin, one per line, until EOF
    Scan,
    /// List recorded scans, newest first
    List(ListArgs),
    /// Remove the most recent scan
    Undo,
    /// Remove every recorded scan
    Clear(ClearArgs),
    /// Write the scan log as CSV
    Export(ExportArgs),
    /// Show or change scanner settings
    Settings(SettingsArgs),
    /// Show or set the session label
    Session(SessionArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show codes containing this text
    #[arg(short, long)]
    pub search: Option<String>,
    /// Show at most this many rows
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output path; defaults to a generated file name in the current directory
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Suppress codes that are already in the log
    #[arg(long)]
    pub unique_only: Option<bool>,
    /// Ignore repeats of the same code within this many milliseconds
    #[arg(long)]
    pub cooldown_ms: Option<u64>,
    /// Ring the terminal bell on each scan
    #[arg(long)]
    pub beep: Option<bool>,
}

impl SettingsArgs {
    pub fn is_empty(&self) -> bool {
        self.unique_only.is_none() && self.cooldown_ms.is_none() && self.beep.is_none()
    }
}

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// New label; a blank label resets to the default
    pub label: Option<String>,
}
