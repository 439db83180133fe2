//! Core type aliases, traits, and constants for tablepilot.
//!
//! This crate provides the foundational types, stable hashing, and default
//! configuration parameters used throughout the tablepilot workspace.
#![allow(dead_code)]
mod fnv;

pub use fnv::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Stack sizes, pot sizes, and bet amounts in table chips.
pub type Chips = i64;
/// Wall-clock budgets and durations in milliseconds.
pub type Millis = u64;
/// Action weights, sampling distributions, and confidences.
pub type Probability = f64;
/// Expected values and regrets as stored by the offline solver.
pub type Utility = f64;
/// Root seed of every random draw in a decision.
pub type Seed = u32;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and benchmarking.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// FINGERPRINT PARAMETERS
// Changing any bucket width or the hash requires bumping the version, so old
// cache keys stop matching instead of silently colliding.
// ============================================================================
/// Format version prefixed to every fingerprint.
pub const FINGERPRINT_VERSION: &str = "v1";
/// Identifier of the fingerprint hash, recorded in the cache manifest.
pub const FINGERPRINT_ALGORITHM: &str = "fnv1a64-v1";
/// Effective stack bucket width in big blinds.
pub const STACK_BUCKET_BB: f64 = 5.0;
/// Pot bucket width in big blinds.
pub const POT_BUCKET_BB: f64 = 2.0;
/// Stack-to-pot ratio bucket width.
pub const SPR_BUCKET: f64 = 0.5;

// ============================================================================
// STRATEGY CACHE
// ============================================================================
/// Cache format version the loader accepts.
pub const CACHE_FORMAT_VERSION: &str = "1";
/// Compression identifier the loader accepts.
pub const CACHE_COMPRESSION: &str = "zstd";
/// Manifest file name under the cache root.
pub const CACHE_MANIFEST: &str = "manifest.json";
/// Fingerprint prefix of synthetic fallback entries (never a real hash).
pub const SYNTHETIC_PREFIX: &str = "synthetic";
/// Exploitability assigned to synthetic entries (maximally untrusted).
pub const SYNTHETIC_EXPLOITABILITY: Utility = 1.0;

// ============================================================================
// BUDGET SCHEDULER
// Defaults sum to the total budget: perception + solver + advisory + decision + buffer.
// ============================================================================
/// Total wall-clock budget for one decision.
pub const BUDGET_TOTAL_MS: Millis = 3000;
/// Default perception allocation.
pub const BUDGET_PERCEPTION_MS: Millis = 400;
/// Default cache lookup / solver allocation.
pub const BUDGET_SOLVER_MS: Millis = 300;
/// Default advisory allocation.
pub const BUDGET_ADVISORY_MS: Millis = 1800;
/// Default blend + sample + gate allocation.
pub const BUDGET_DECISION_MS: Millis = 200;
/// Default shared buffer pool.
pub const BUDGET_BUFFER_MS: Millis = 300;
/// Rolling window of latency samples kept per stage.
pub const METRICS_WINDOW: usize = 256;

// ============================================================================
// DECISION ENGINE
// ============================================================================
/// Weight of the cached strategy against advisory consensus.
pub const BLEND_ALPHA: Probability = 0.6;
/// Total variation distance above which a decision is flagged for tracing.
pub const DIVERGENCE_THRESHOLD: Probability = 0.35;
/// Hard ceiling on any single advisory request regardless of stage budget.
pub const ADVISORY_HARD_TIMEOUT_MS: Millis = 2500;
/// Advisory stage is skipped outright below this remaining allocation.
pub const ADVISORY_MIN_BUDGET_MS: Millis = 100;
/// Extra attempts after a transport failure (timeouts are never retried).
pub const ADVISORY_RETRIES: usize = 1;
/// Upper bound of the seeded backoff before an advisory retry.
pub const ADVISORY_JITTER_MS: Millis = 25;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Global interrupt flag for graceful shutdown between hands.
#[cfg(feature = "server")]
static INTERRUPTED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
/// Check if a graceful shutdown was requested.
#[cfg(feature = "server")]
pub fn interrupted() -> bool {
    INTERRUPTED.load(std::sync::atomic::Ordering::Relaxed)
}
/// No-op interrupt check when server feature disabled.
#[cfg(not(feature = "server"))]
pub fn interrupted() -> bool {
    false
}
/// Register Ctrl+C handler. The first interrupt lets the current hand finish;
/// a second one exits immediately.
#[cfg(feature = "server")]
pub fn brb() {
    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                break;
            }
            if INTERRUPTED.swap(true, std::sync::atomic::Ordering::Relaxed) {
                log::warn!("violent interrupt received, exiting immediately");
                std::process::exit(0);
            }
            log::warn!("graceful interrupt requested, finishing current hand...");
        }
    });
}
