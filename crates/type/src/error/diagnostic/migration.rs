// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

/// A document migration rejected the payload it was given
pub fn migration_failed(key: &str, version: u32, reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new(
		"MIGRATION_001",
		format!("failed to migrate document `{}` to version {}: {}", key, version, reason.into()),
	)
	.label("document does not match the version the migration requires")
	.note("the document was not modified")
}

pub fn unexpected_version(key: &str, stored: i64, configured: u32) -> Diagnostic {
	Diagnostic::new(
		"MIGRATION_002",
		format!("document `{}` is stored at version {} but the configured version is {}", key, stored, configured),
	)
	.label("document version is out of range")
	.help("a newer build wrote this document, upgrade the configuration")
}
