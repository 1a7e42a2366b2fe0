// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_core::{LiveColumn, LiveSchema, LiveTable};
use docrow_type::{Result, diagnostic::store, error};
use rusqlite::Connection;

use crate::sql::Naming;

/// Names of all user tables in the database.
pub(crate) fn physical_tables(conn: &Connection) -> Result<Vec<String>> {
	let mut stmt = conn
		.prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
		.map_err(|e| error!(store::statement_failed(e.to_string())))?;
	let names = stmt
		.query_map([], |row| row.get::<_, String>(0))
		.and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>())
		.map_err(|e| error!(store::statement_failed(e.to_string())))?;
	Ok(names)
}

/// Reads the tables owned by `naming`, keyed by logical name. The metadata
/// table is not part of the result.
pub(crate) fn introspect(conn: &Connection, naming: &Naming) -> Result<LiveSchema> {
	let metadata = naming.metadata_table();
	let mut schema = LiveSchema::default();

	for physical in physical_tables(conn)? {
		if physical == metadata {
			continue;
		}
		let Some(logical) = naming.logical(&physical) else {
			continue;
		};
		let table = LiveTable {
			name: logical.to_string(),
			columns: columns(conn, &physical)?.into_iter().map(|c| (c.name.clone(), c)).collect(),
		};
		schema.tables.insert(logical.to_string(), table);
	}

	Ok(schema)
}

fn columns(conn: &Connection, table: &str) -> Result<Vec<LiveColumn>> {
	let mut stmt = conn
		.prepare("SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1)")
		.map_err(|e| error!(store::statement_failed(e.to_string())))?;
	let columns = stmt
		.query_map([table], |row| {
			Ok(LiveColumn {
				name: row.get(0)?,
				sql_type: row.get(1)?,
				nullable: row.get::<_, i64>(2)? == 0,
				primary_key: row.get::<_, i64>(3)? > 0,
			})
		})
		.and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>())
		.map_err(|e| error!(store::statement_failed(e.to_string())))?;
	Ok(columns)
}
