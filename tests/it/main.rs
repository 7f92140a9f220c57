// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

mod execution;
mod graph;
mod values;

/// Installs a logger for the test executable, so that `RUST_LOG=trace` shows each evaluation step.
pub(crate) fn init_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}
