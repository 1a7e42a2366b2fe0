// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_core::{DdlCommand, DocumentModel, Migration, diff, system};
use docrow_type::{
	Result,
	diagnostic::{configuration, store},
	error, return_error,
};
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracing::{debug, info, instrument, warn};

use super::introspect::{introspect, physical_tables};
use crate::sql::{Naming, quote, render_ddl};

const VERSION_COLUMN: &str = "SchemaVersion";

/// Brings the database schema in line with a document model.
pub(crate) struct SchemaMigrator<'a> {
	model: &'a DocumentModel,
	naming: &'a Naming,
}

impl<'a> SchemaMigrator<'a> {
	pub(crate) fn new(model: &'a DocumentModel, naming: &'a Naming) -> Self {
		Self {
			model,
			naming,
		}
	}

	/// Runs pending migrations and the additive reconciliation in one
	/// transaction. Returns the number of DDL statements applied.
	#[instrument(name = "store::schema::migrate", level = "debug", skip_all, fields(prefix = self.naming.prefix()))]
	pub(crate) fn migrate(&self, conn: &mut Connection) -> Result<usize> {
		let tx = conn
			.transaction_with_behavior(TransactionBehavior::Immediate)
			.map_err(|e| error!(store::transaction_failed(e.to_string())))?;

		let current = self.initialize(&tx)?;
		let target = self.model.version();
		if current > target {
			return_error!(configuration::schema_version_ahead(current, target));
		}

		let pending: Vec<&Migration> = self.model.migrations().after(current).collect();
		let mut applied = 0;

		for migration in &pending {
			for command in migration.before_commands() {
				self.apply(&tx, command)?;
				applied += 1;
			}
		}

		let live = introspect(&tx, self.naming)?;
		for command in diff(self.model.tables(), &live) {
			self.apply(&tx, &command)?;
			applied += 1;
		}

		for migration in &pending {
			for command in migration.after_commands() {
				self.apply(&tx, command)?;
				applied += 1;
			}
		}

		if current != target {
			tx.execute(
				&format!("UPDATE {} SET {} = ?1", quote(&self.naming.metadata_table()), quote(VERSION_COLUMN)),
				[target],
			)
			.map_err(|e| error!(store::statement_failed(e.to_string())))?;
			info!(from = current, to = target, "schema version updated");
		}

		tx.commit().map_err(|e| error!(store::transaction_failed(e.to_string())))?;
		debug!(applied, "schema is up to date");
		Ok(applied)
	}

	/// Creates the metadata table on first use and returns the recorded
	/// schema version.
	fn initialize(&self, tx: &Transaction<'_>) -> Result<u32> {
		let metadata = self.naming.metadata_table();
		let owned: Vec<String> =
			physical_tables(tx)?.into_iter().filter(|table| self.naming.logical(table).is_some()).collect();

		if !owned.contains(&metadata) {
			if !owned.is_empty() {
				return_error!(configuration::database_not_initialized(&owned));
			}
			tx.execute_batch(&format!(
				"CREATE TABLE {table} ({column} INTEGER NOT NULL); INSERT INTO {table} ({column}) VALUES (0);",
				table = quote(&metadata),
				column = quote(VERSION_COLUMN)
			))
			.map_err(|e| error!(store::statement_failed(e.to_string())))?;
			info!(table = metadata, "initialized database");
			return Ok(0);
		}

		let version: Option<i64> = tx
			.query_row(&format!("SELECT {} FROM {} LIMIT 1", quote(VERSION_COLUMN), quote(&metadata)), [], |row| {
				row.get(0)
			})
			.optional()
			.map_err(|e| error!(store::statement_failed(e.to_string())))?;
		Ok(version.unwrap_or(0).max(0) as u32)
	}

	fn apply(&self, tx: &Transaction<'_>, command: &DdlCommand) -> Result<()> {
		if command.is_unsafe() {
			warn!(command = %command, "applying destructive schema change");
		} else {
			info!(command = %command, "applying schema change");
		}

		let sql = render_ddl(command, self.naming);
		tx.execute_batch(&sql).map_err(|e| error!(store::statement_failed(format!("{}: {}", sql, e))))?;

		if let DdlCommand::AddColumn {
			table,
			..
		} = command
		{
			if self.model.tables().contains_key(table) {
				let flagged = tx
					.execute(
						&format!(
							"UPDATE {} SET {} = 1",
							self.naming.table(table),
							quote(system::AWAITS_REPROJECTION)
						),
						[],
					)
					.map_err(|e| error!(store::statement_failed(e.to_string())))?;
				debug!(table = table.as_str(), flagged, "rows await reprojection");
			}
		}
		Ok(())
	}
}

/// Drops every table owned by `naming`, the metadata table included.
pub(crate) fn drop_tables(conn: &Connection, naming: &Naming) -> Result<()> {
	for table in physical_tables(conn)? {
		if naming.logical(&table).is_some() {
			conn.execute_batch(&format!("DROP TABLE {}", quote(&table)))
				.map_err(|e| error!(store::statement_failed(e.to_string())))?;
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use docrow_core::{Column, Configuration, Type};
	use serde::{Deserialize, Serialize};

	use super::*;

	#[derive(Debug, Serialize, Deserialize)]
	struct Entity {
		id: String,
		property: String,
	}

	fn model(with_property: bool, migrations: Vec<Migration>) -> DocumentModel {
		let mut config = Configuration::new();
		let builder = config.document::<Entity>().unwrap().key(|e: &Entity| e.id.clone());
		if with_property {
			builder.with("Property", |e: &Entity| e.property.clone()).unwrap();
		}
		for migration in migrations {
			config.migration(migration).unwrap();
		}
		config.build().unwrap()
	}

	#[test]
	fn test_rerun_is_a_no_op() {
		let mut conn = Connection::open_in_memory().unwrap();
		let naming = Naming::default();
		let model = model(true, vec![]);

		assert_eq!(SchemaMigrator::new(&model, &naming).migrate(&mut conn).unwrap(), 1);
		assert_eq!(SchemaMigrator::new(&model, &naming).migrate(&mut conn).unwrap(), 0);
	}

	#[test]
	fn test_added_column_flags_rows() {
		let mut conn = Connection::open_in_memory().unwrap();
		let naming = Naming::default();
		SchemaMigrator::new(&model(false, vec![]), &naming).migrate(&mut conn).unwrap();
		conn.execute(
			"INSERT INTO \"Entity\" (\"Id\", \"Etag\", \"CreatedAt\", \"ModifiedAt\", \"Document\", \"Discriminator\") VALUES ('a', '', '', '', X'', 'Entity')",
			[],
		)
		.unwrap();

		assert_eq!(SchemaMigrator::new(&model(true, vec![]), &naming).migrate(&mut conn).unwrap(), 1);

		let (flag, property): (i64, String) = conn
			.query_row("SELECT \"AwaitsReprojection\", \"Property\" FROM \"Entity\"", [], |row| {
				Ok((row.get(0)?, row.get(1)?))
			})
			.unwrap();
		assert_eq!(flag, 1);
		assert_eq!(property, "");
	}

	#[test]
	fn test_foreign_tables_are_rejected() {
		let mut conn = Connection::open_in_memory().unwrap();
		conn.execute_batch("CREATE TABLE \"Legacy\" (\"A\" INTEGER)").unwrap();

		let err = SchemaMigrator::new(&model(true, vec![]), &Naming::default()).migrate(&mut conn).unwrap_err();
		assert_eq!(err.code, "CONFIG_008");
	}

	#[test]
	fn test_prefixed_store_ignores_foreign_tables() {
		let mut conn = Connection::open_in_memory().unwrap();
		conn.execute_batch("CREATE TABLE \"Legacy\" (\"A\" INTEGER)").unwrap();

		let naming = Naming::new("t1_");
		SchemaMigrator::new(&model(true, vec![]), &naming).migrate(&mut conn).unwrap();
		drop_tables(&conn, &naming).unwrap();

		assert_eq!(physical_tables(&conn).unwrap(), vec!["Legacy"]);
	}

	#[test]
	fn test_versioned_migrations() {
		let mut conn = Connection::open_in_memory().unwrap();
		let naming = Naming::default();
		let migrations = vec![
			Migration::new(1).after(DdlCommand::Sql("CREATE INDEX \"IX_Property\" ON \"Entity\" (\"Property\")".into())),
			Migration::new(2).after(DdlCommand::AddColumn {
				table: "Entity".into(),
				column: Column::new("Extra", Type::Int4),
			}),
		];
		assert_eq!(SchemaMigrator::new(&model(true, migrations), &naming).migrate(&mut conn).unwrap(), 3);

		let version: i64 =
			conn.query_row("SELECT \"SchemaVersion\" FROM \"docrow_metadata\"", [], |row| row.get(0)).unwrap();
		assert_eq!(version, 2);

		let err = SchemaMigrator::new(&model(true, vec![Migration::new(1)]), &naming).migrate(&mut conn).unwrap_err();
		assert_eq!(err.code, "CONFIG_012");
	}
}
