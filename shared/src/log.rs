// SPDX-License-Identifier: MIT

//! A lightweight logging facade. Downstream crates can use `shared::log_*!` macros without
//! depending directly on the `tracing` crate.

use tracing_subscriber::EnvFilter;

/// Log at INFO level
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

/// Log at DEBUG level
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::tracing::debug!($($arg)*)
    };
}

/// Log at WARN level
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}

/// Log at ERROR level
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::tracing::error!($($arg)*)
    };
}

/// Installs the global subscriber. `RUST_LOG` wins over the verbose flag when set.
pub fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            // debug for everything
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}
