// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

/// A write batch touched fewer rows than its commands expected
pub fn batch_conflict(expected: usize, actual: usize) -> Diagnostic {
	Diagnostic::new(
		"CONCURRENCY_001",
		format!("someone beat you to it: expected {} affected rows but {} were affected", expected, actual),
	)
	.label("optimistic concurrency check failed")
	.help("reload the documents and retry the whole unit of work")
	.note("the entire batch was rolled back, no changes were persisted")
}
