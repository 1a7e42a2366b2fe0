// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

pub fn duplicate_key(table: &str, key: &str) -> Diagnostic {
	Diagnostic::new("DUPLICATE_001", format!("a document with key `{}` already exists in `{}`", key, table))
		.label("duplicate document key")
		.note("the entire batch was rolled back, no changes were persisted")
}

pub fn connection_failed(reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new("STORE_001", format!("failed to connect to the database: {}", reason.into()))
		.label("connection failed")
}

pub fn connection_timeout(millis: u128) -> Diagnostic {
	Diagnostic::new("STORE_002", format!("timed out after {}ms waiting for a database connection", millis))
		.label("connection pool exhausted")
		.help("increase the pool size or the connection timeout")
}

pub fn statement_failed(reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new("STORE_003", format!("statement failed: {}", reason.into())).label("statement failed")
}

pub fn transaction_failed(reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new("STORE_004", format!("transaction failed: {}", reason.into()))
		.label("transaction failed")
		.note("the transaction was rolled back")
}
