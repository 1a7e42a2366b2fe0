// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SQL text rendering for SQLite.

mod ddl;
mod dml;
mod select;
pub(crate) mod value;

pub(crate) use ddl::render_ddl;
pub(crate) use dml::render_dml;
use rusqlite::types::Value as SqlValue;
pub(crate) use select::{render_count, render_get, render_pending, render_query};

pub(crate) const METADATA_TABLE: &str = "docrow_metadata";
pub(crate) const TOTAL_COLUMN: &str = "__total";

pub(crate) fn quote(identifier: &str) -> String {
	format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Maps logical table names to the physical tables of one store.
#[derive(Debug, Clone, Default)]
pub(crate) struct Naming {
	prefix: String,
}

impl Naming {
	pub(crate) fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}

	pub(crate) fn prefix(&self) -> &str {
		&self.prefix
	}

	pub(crate) fn physical(&self, table: &str) -> String {
		format!("{}{}", self.prefix, table)
	}

	pub(crate) fn table(&self, table: &str) -> String {
		quote(&self.physical(table))
	}

	pub(crate) fn metadata_table(&self) -> String {
		self.physical(METADATA_TABLE)
	}

	/// The logical name of a physical table owned by this store.
	pub(crate) fn logical<'a>(&self, physical: &'a str) -> Option<&'a str> {
		physical.strip_prefix(self.prefix.as_str())
	}
}

/// One SQL statement with its named parameters.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Statement {
	pub(crate) sql: String,
	pub(crate) params: Vec<(String, SqlValue)>,
}

impl Statement {
	pub(crate) fn new() -> Self {
		Self {
			sql: String::new(),
			params: vec![],
		}
	}

	/// Registers a parameter and returns its placeholder.
	pub(crate) fn param(&mut self, counter: &mut usize, value: SqlValue) -> String {
		let name = format!(":p{}", *counter);
		*counter += 1;
		self.params.push((name.clone(), value));
		name
	}
}
