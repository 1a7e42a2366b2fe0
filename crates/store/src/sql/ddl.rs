// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_core::{Column, DdlCommand};

use super::{
	Naming, quote,
	value::{sql_literal, sql_type},
};

pub(crate) fn render_column(column: &Column) -> String {
	let mut sql = format!("{} {}", quote(&column.name), sql_type(column.ty));
	if !column.nullable {
		sql.push_str(" NOT NULL");
	}
	if column.primary_key {
		sql.push_str(" PRIMARY KEY");
	} else if let Some(default) = column.default_value() {
		sql.push_str(" DEFAULT ");
		sql.push_str(&sql_literal(&default));
	}
	sql
}

pub(crate) fn render_ddl(command: &DdlCommand, naming: &Naming) -> String {
	match command {
		DdlCommand::CreateTable(table) => {
			let columns = table.columns().map(render_column).collect::<Vec<_>>();
			format!("CREATE TABLE {} ({})", naming.table(table.name()), columns.join(", "))
		}
		DdlCommand::AddColumn {
			table,
			column,
		} => format!("ALTER TABLE {} ADD COLUMN {}", naming.table(table), render_column(column)),
		DdlCommand::RemoveColumn {
			table,
			column,
		} => format!("ALTER TABLE {} DROP COLUMN {}", naming.table(table), quote(column)),
		DdlCommand::RenameColumn {
			table,
			from,
			to,
		} => format!("ALTER TABLE {} RENAME COLUMN {} TO {}", naming.table(table), quote(from), quote(to)),
		DdlCommand::RenameTable {
			from,
			to,
		} => format!("ALTER TABLE {} RENAME TO {}", naming.table(from), naming.table(to)),
		DdlCommand::RemoveTable(table) => format!("DROP TABLE {}", naming.table(table)),
		DdlCommand::Sql(sql) => sql.clone(),
	}
}
