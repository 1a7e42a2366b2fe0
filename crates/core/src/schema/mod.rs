// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod ddl;
mod differ;

pub use ddl::DdlCommand;
pub use differ::diff;
use indexmap::IndexMap;

/// A column as it exists in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveColumn {
	pub name: String,
	pub sql_type: String,
	pub nullable: bool,
	pub primary_key: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiveTable {
	pub name: String,
	pub columns: IndexMap<String, LiveColumn>,
}

impl LiveTable {
	pub fn has_column(&self, name: &str) -> bool {
		self.columns.keys().any(|column| column.eq_ignore_ascii_case(name))
	}
}

/// The tables found in the database, keyed by logical table name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiveSchema {
	pub tables: IndexMap<String, LiveTable>,
}

impl LiveSchema {
	pub fn table(&self, name: &str) -> Option<&LiveTable> {
		self.tables.get(name)
	}
}
