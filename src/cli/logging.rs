// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Logger setup for the stage binaries

use env_logger::Env;

/// Default log filter: per-file tracing with `--debug`, progress otherwise
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Install the global logger. `RUST_LOG` takes precedence over `debug`.
pub fn init_logging(debug: bool) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter(debug)))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true), "debug");
        assert_eq!(default_filter(false), "info");
        // A second initialisation is ignored
        init_logging(false);
        init_logging(true);
    }
}
