// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod logging;
pub mod tempdir;
pub mod util;

pub use logging::init_logging;
