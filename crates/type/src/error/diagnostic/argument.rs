// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

pub fn no_commands() -> Diagnostic {
	Diagnostic::new("ARGUMENT_001", "execute called without any commands")
		.label("empty command batch")
		.help("pass at least one command")
}

pub fn document_type_mismatch(key: &str, expected: &str, actual: &str) -> Diagnostic {
	Diagnostic::new(
		"ARGUMENT_002",
		format!("document `{}` is tracked as `{}`, not as `{}`", key, actual, expected),
	)
	.label("document type mismatch")
}

pub fn unknown_discriminator(table: &str, discriminator: &str) -> Diagnostic {
	Diagnostic::new(
		"ARGUMENT_003",
		format!("row in table `{}` has discriminator `{}` which no design claims", table, discriminator),
	)
	.label("unknown discriminator")
	.help("register a design for the stored type")
}

pub fn unknown_column(table: &str, column: &str) -> Diagnostic {
	Diagnostic::new("ARGUMENT_004", format!("table `{}` has no column `{}`", table, column))
		.label("unknown column")
}

pub fn unknown_table(table: &str) -> Diagnostic {
	Diagnostic::new("ARGUMENT_005", format!("no table named `{}` is configured", table)).label("unknown table")
}

pub fn invalid_query(reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new("ARGUMENT_006", format!("invalid query: {}", reason.into())).label("invalid query")
}

pub fn untracked_document(type_name: &str) -> Diagnostic {
	Diagnostic::new("ARGUMENT_007", format!("document of type `{}` is not tracked by this session", type_name))
		.label("untracked document")
		.help("store or load the document first")
}
