// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-file progress bar

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Progress bar for a file loop, or `None` when debug output is on or
/// stderr is not a terminal. The loop sets the length once it knows it.
pub fn progress_bar(debug: bool) -> Option<ProgressBar> {
    if debug || !std::io::stderr().is_terminal() {
        return None;
    }

    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    Some(pb)
}
