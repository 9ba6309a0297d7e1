//! Logging setup using `tracing` and `tracing-subscriber`
//!
//! Diagnostics go to stderr so stdout stays clean for tables, JSON and CSV.
//! `STOCKPILE_LOG` (an `EnvFilter` directive) overrides the `-v` count.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "STOCKPILE_LOG";

/// Map a `-v` count onto a level: warn, info, debug, then trace
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbosity: u8, ansi: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "stockpile={}",
            level_for(verbosity).as_str().to_lowercase()
        ))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(ansi),
        )
        .try_init();
}
