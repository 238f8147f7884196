//! Subscriber setup for binaries and tests that embed seqclust.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "SEQCLUST_LOG";

/// Directives used when `SEQCLUST_LOG` is unset or does not parse.
pub const DEFAULT_DIRECTIVES: &str = "seqclust_core=info,seqclust_analysis=info";

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Filter built from `SEQCLUST_LOG`, e.g.
/// `SEQCLUST_LOG=seqclust_analysis::clustering=debug`.
///
/// Exposed so a host with its own subscriber can layer the same filter.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a global fmt subscriber filtered by [`env_filter`].
///
/// Closing spans are logged, so every clustering run reports its duration.
/// Returns `true` only for the call that installed the subscriber; later
/// calls, or a host that already owns the global subscriber, get `false`.
pub fn init_tracing() -> bool {
    if INSTALLED.swap(true, Ordering::AcqRel) {
        return false;
    }
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE),
        )
        .with(env_filter())
        .try_init()
        .is_ok()
}
