//! Logger setup
//!
//! The core emits through the `log` macros only. The demo binary, or any host
//! without its own logger, installs `env_logger` here.

use env_logger::{Builder, Env};

/// Install `env_logger` with millisecond timestamps.
///
/// A `RUST_LOG` filter overrides the default level, which is `debug` with
/// `verbose` (jump transitions and each executed event) and `info` without.
/// Later calls leave the first logger in place.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    let installed = Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init()
        .is_ok();

    if !installed {
        log::debug!("Logger already installed, keeping it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        init(false);
        init(true);
        log::info!("logging still works after a second init");
        assert!(log::max_level() >= log::LevelFilter::Error);
    }
}
