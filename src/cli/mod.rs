// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem shared by the stage binaries

mod logging;
mod progress;
pub mod reporter;

pub use logging::init_logging;
pub use progress::progress_bar;
pub use reporter::Reporter;

use clap::error::ErrorKind;
use clap::Parser;

/// Process exit code for a clap error: 0 for help and version output,
/// 1 for anything else.
pub fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Parse the command line, exiting with [`exit_code`] on failure
pub fn parse_args<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            std::process::exit(exit_code(err.kind()));
        }
    }
}
