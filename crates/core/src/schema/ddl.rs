// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use crate::table::{Column, Table};

/// A schema change.
///
/// The automatic differ only ever produces `CreateTable` and `AddColumn`;
/// the remaining variants can be used by explicit migrations.
#[derive(Debug, Clone, PartialEq)]
pub enum DdlCommand {
	CreateTable(Table),
	AddColumn {
		table: String,
		column: Column,
	},
	RemoveColumn {
		table: String,
		column: String,
	},
	RenameColumn {
		table: String,
		from: String,
		to: String,
	},
	RenameTable {
		from: String,
		to: String,
	},
	RemoveTable(String),
	Sql(String),
}

impl DdlCommand {
	/// Whether the command can lose data or break existing readers.
	pub fn is_unsafe(&self) -> bool {
		!matches!(self, DdlCommand::CreateTable(_) | DdlCommand::AddColumn { .. })
	}
}

impl Display for DdlCommand {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			DdlCommand::CreateTable(table) => write!(f, "create table {}", table.name()),
			DdlCommand::AddColumn {
				table,
				column,
			} => write!(f, "add column {}.{} {}", table, column.name, column.ty),
			DdlCommand::RemoveColumn {
				table,
				column,
			} => write!(f, "remove column {}.{}", table, column),
			DdlCommand::RenameColumn {
				table,
				from,
				to,
			} => write!(f, "rename column {}.{} to {}", table, from, to),
			DdlCommand::RenameTable {
				from,
				to,
			} => write!(f, "rename table {} to {}", from, to),
			DdlCommand::RemoveTable(table) => write!(f, "remove table {}", table),
			DdlCommand::Sql(sql) => write!(f, "sql {}", sql),
		}
	}
}

#[cfg(test)]
mod tests {
	use docrow_type::Type;

	use super::*;

	#[test]
	fn test_additive_commands_are_safe() {
		let create = DdlCommand::CreateTable(Table::document("Entities").unwrap());
		let add = DdlCommand::AddColumn {
			table: "Entities".into(),
			column: Column::new("Property", Type::Utf8),
		};
		assert!(!create.is_unsafe());
		assert!(!add.is_unsafe());
		assert!(DdlCommand::RemoveTable("Entities".into()).is_unsafe());
		assert!(DdlCommand::Sql("DELETE FROM x".into()).is_unsafe());
	}
}
