//! Pilot Binary
//!
//! Commands: decide, replay, inspect

use anyhow::Context;
use clap::Parser;
use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;
use tp_cache::Loader;
use tp_core::Seed;
use tp_engine::Engine;
use tp_engine::HandRecord;
use tp_pilot::Canned;
use tp_pilot::Config;
use tp_pilot::Pilot;
use tp_state::GameState;

#[derive(Debug, Parser)]
#[command(name = "pilot", about = "Reproducible poker decisions under a hard time budget")]
enum Command {
    #[command(about = "Decide every GameState JSON line on stdin, one Decision JSON line each")]
    Decide {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        session: Option<String>,
        #[arg(long)]
        seed: Option<Seed>,
        /// JSON object of canned advisory payloads keyed by model.
        #[arg(long)]
        advice: Option<PathBuf>,
        /// Appends one HandRecord JSON line per decision.
        #[arg(long)]
        records: Option<PathBuf>,
    },
    #[command(about = "Re-derive stored decisions and verify they reproduce")]
    Replay {
        #[arg(long, required = true)]
        record: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    #[command(about = "Print a strategy cache's manifest and per-street counts")]
    Inspect {
        #[arg(long, required = true)]
        cache: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tp_core::log();
    tp_core::brb();
    match Command::parse() {
        Command::Decide {
            config,
            session,
            seed,
            advice,
            records,
        } => decide(config, session, seed, advice, records).await,
        Command::Replay { record, config } => replay(record, config),
        Command::Inspect { cache } => inspect(cache),
    }
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };
    config.with_env()
}

async fn decide(
    config: Option<PathBuf>,
    session: Option<String>,
    seed: Option<Seed>,
    advice: Option<PathBuf>,
    records: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = configure(config)?;
    if seed.is_some() {
        config.seed = seed;
    }
    if session.is_some() {
        config.session = session;
    }
    config.validate().context("invalid configuration")?;
    let session = config.session.clone().unwrap_or_else(|| {
        let time = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        format!("S-{}", time)
    });
    log::info!("{:<32}{:<32}", "starting session", session);
    let mut pilot = Pilot::load(config);
    if let Some(path) = advice {
        let json = std::fs::read_to_string(&path).with_context(|| format!("read advice {}", path.display()))?;
        for oracle in Canned::from_json(&json)? {
            pilot = pilot.with_oracle(oracle);
        }
    }
    let mut records = match records {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open records {}", path.display()))?,
        ),
        None => None,
    };
    let mut stdout = std::io::stdout().lock();
    for line in std::io::stdin().lock().lines() {
        if tp_core::interrupted() {
            break;
        }
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let state = match GameState::from_json(&line) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("{:<32}{:<32}", "skipping malformed snapshot", format!("{:#}", e));
                continue;
            }
        };
        let outcome = pilot.decide(&state, &session).await;
        writeln!(stdout, "{}", serde_json::to_string(&outcome.decision)?)?;
        if let Some(file) = records.as_mut() {
            writeln!(file, "{}", outcome.record.to_json()?)?;
        }
    }
    Ok(())
}

fn replay(path: PathBuf, config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = configure(config)?;
    config.validate().context("invalid configuration")?;
    let engine = Engine::new(config.blend);
    let file = std::fs::File::open(&path).with_context(|| format!("open records {}", path.display()))?;
    let mut mismatches = 0;
    let mut total = 0;
    for line in std::io::BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = HandRecord::from_json(&line)?;
        let replayed = tp_engine::replay(&engine, &record);
        println!("{:<16}{}", record.state.hand_id(), replayed);
        total += 1;
        if !replayed.matches {
            mismatches += 1;
        }
    }
    log::info!("{:<32}{:<32}", "replayed hands", total);
    match mismatches {
        0 => Ok(()),
        n => Err(anyhow::anyhow!("{} of {} hands did not reproduce", n, total)),
    }
}

fn inspect(root: PathBuf) -> anyhow::Result<()> {
    let strategies = Loader::new(root).load();
    println!("{:<16}{:?}", "status", strategies.status());
    if let Some(manifest) = strategies.manifest() {
        println!("{}", serde_json::to_string_pretty(manifest)?);
    }
    for (street, count) in strategies.counts() {
        println!("{:<16}{}", street, count);
    }
    println!("{:<16}{}", "total", strategies.len());
    Ok(())
}
