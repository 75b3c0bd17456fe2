mod commands;
mod feedback;
mod logging;

use std::io::{self, BufRead, Write};
use std::process;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{ClearArgs, Cli, Commands, ExportArgs, ListArgs, SessionArgs, SettingsArgs};
use dotenv::dotenv;
use feedback::CliFeedback;
use qr_tally_core::{export, AppConfig, ScanSession, Settings};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let mut config = match qr_tally_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();
    if let Some(store) = args.store {
        config.store_path = store;
    }

    let result = match args.command {
        Some(Commands::Scan) => run_scan(&config).await,
        Some(Commands::List(args)) => run_list(&config, &args),
        Some(Commands::Undo) => run_undo(&config),
        Some(Commands::Clear(args)) => run_clear(&config, &args),
        Some(Commands::Export(args)) => run_export(&config, &args),
        Some(Commands::Settings(args)) => run_settings(&config, &args),
        Some(Commands::Session(args)) => run_session(&config, &args),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn open_session(config: &AppConfig) -> Result<ScanSession> {
    let session = ScanSession::open(config)
        .with_context(|| format!("opening store at '{}'", config.store_path))?;
    Ok(session.with_reporter(Box::new(CliFeedback)))
}

async fn run_scan(config: &AppConfig) -> Result<()> {
    let mut session = open_session(config)?;
    let mode = if session.settings().unique_only {
        "unique only"
    } else {
        "duplicates allowed"
    };
    println!(
        "{} ({}, {} recorded)",
        session.session_label().bold(),
        mode.dimmed(),
        session.log().len()
    );

    session.scan_start();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let read_result = async {
        while let Some(line) = lines.next_line().await? {
            session.on_decode_now(&line);
        }
        Ok::<(), io::Error>(())
    }
    .await;

    // Flush before surfacing any read error so the log is not lost.
    session.shutdown();
    read_result.context("reading decoded codes from stdin")?;

    info!(
        "{} scans recorded, {} distinct codes",
        format!("{}", session.log().len()).green(),
        format!("{}", session.log().distinct_codes()).cyan(),
    );
    Ok(())
}

fn run_list(config: &AppConfig, args: &ListArgs) -> Result<()> {
    let session = open_session(config)?;
    let query = args.search.as_deref().unwrap_or("");
    let hits = session.log().search(query);
    let limit = args.limit.unwrap_or(hits.len());

    for entry in hits.iter().take(limit) {
        println!("{}  {}", format_local(entry.timestamp).dimmed(), entry.code);
    }
    println!(
        "{} total ({} shown)",
        session.log().len(),
        hits.len().min(limit)
    );
    Ok(())
}

fn run_undo(config: &AppConfig) -> Result<()> {
    let mut session = open_session(config)?;
    if session.undo_last().is_none() {
        println!("Nothing to undo");
    }
    session.shutdown();
    Ok(())
}

fn run_clear(config: &AppConfig, args: &ClearArgs) -> Result<()> {
    let mut session = open_session(config)?;
    if !args.yes
        && !confirm(
            "Clear ALL recorded scans? This cannot be undone.",
            &mut io::stdin().lock(),
            &mut io::stdout(),
        )?
    {
        return Ok(());
    }
    session.clear_all();
    session.shutdown();
    Ok(())
}

fn run_export(config: &AppConfig, args: &ExportArgs) -> Result<()> {
    let session = open_session(config)?;
    if session.log().is_empty() {
        bail!("nothing to export");
    }

    let csv = export::build_export(
        session.log().entries(),
        session.session_label(),
        Local::now().naive_local(),
    )?;
    let path = args
        .out
        .clone()
        .unwrap_or_else(|| csv.file_name.clone().into());
    std::fs::write(&path, &csv.bytes)
        .with_context(|| format!("writing {}", path.display()))?;

    println!(
        "Exported {} scans to {}",
        session.log().len(),
        path.display().to_string().green()
    );
    Ok(())
}

fn run_settings(config: &AppConfig, args: &SettingsArgs) -> Result<()> {
    let mut session = open_session(config)?;
    if !args.is_empty() {
        let current = session.settings();
        let updated = Settings {
            unique_only: args.unique_only.unwrap_or(current.unique_only),
            cooldown_ms: args.cooldown_ms.unwrap_or(current.cooldown_ms),
            beep_enabled: args.beep.unwrap_or(current.beep_enabled),
        };
        session.update_settings(updated).context("saving settings")?;
    }

    let settings = session.settings();
    println!("unique-only: {}", settings.unique_only);
    println!("cooldown-ms: {}", settings.cooldown_ms);
    println!("beep:        {}", settings.beep_enabled);
    Ok(())
}

fn run_session(config: &AppConfig, args: &SessionArgs) -> Result<()> {
    let mut session = open_session(config)?;
    if let Some(label) = &args.label {
        session
            .update_session_label(label)
            .context("saving session label")?;
    }
    println!("{}", session.session_label());
    Ok(())
}

fn format_local(epoch_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms) {
        Some(ts) => ts
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => epoch_ms.to_string(),
    }
}

/// Ask a yes/no question, answering no on a blank line or closed input.
/// Anything else is asked again.
fn confirm<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    let mut answer = String::new();
    loop {
        write!(output, "{} [y/N] ", prompt)?;
        output.flush()?;

        answer.clear();
        if input.read_line(&mut answer)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "" | "n" | "no" => return Ok(false),
            other => writeln!(output, "Please answer y or n (got '{}')", other)?,
        }
    }
}
