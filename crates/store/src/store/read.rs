// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_core::{
	AnyDocument, Design, DesignId, DocumentKey, DocumentMigrationMode, DocumentMigrator, Etag, Metadata, QueryPlan,
	QueryStats, Row, Table, Value,
	document::encode_metadata,
	system,
};
use docrow_type::{Result, diagnostic::store, error};
use indexmap::IndexMap;
use rusqlite::{Connection, ToSql};
use tracing::{debug, instrument};

use super::Store;
use crate::sql::{Statement, TOTAL_COLUMN, render_count, render_get, render_query, value::from_sql};

/// A stored row turned back into a document.
#[derive(Debug, Clone)]
pub struct Materialized {
	/// Design of the concrete stored type.
	pub design: DesignId,
	pub key: DocumentKey,
	pub document: AnyDocument,
	/// Current etag of the row, after a foreground rewrite if one happened.
	pub etag: Etag,
	pub metadata: Metadata,
}

impl Store {
	/// Reads the row stored under `key`.
	#[instrument(name = "store::get", level = "debug", skip(self))]
	pub fn get(&self, table: &str, key: &str) -> Result<Option<Row>> {
		let schema = self.model.table(table)?;
		let conn = self.connection()?;
		let statement = render_get(&self.naming, table, key);
		self.stats.request(1);
		let (mut rows, _) = read_rows(&conn, &statement, schema)?;
		Ok(rows.pop())
	}

	/// Reads one page of rows of `design`, or of `design` and its subtypes.
	#[instrument(name = "store::query", level = "debug", skip_all, fields(table = design.table(), include_descendants = include_descendants))]
	pub fn query(&self, design: &Design, plan: &QueryPlan, include_descendants: bool) -> Result<(Vec<Row>, QueryStats)> {
		let table = self.model.table(design.table())?;
		plan.validate(table)?;

		let discriminators: Vec<&str> = if include_descendants {
			design.descendants_and_self().keys().map(String::as_str).collect()
		} else {
			vec![design.discriminator()]
		};

		let conn = self.connection()?;
		let statement = render_query(&self.naming, table, &discriminators, plan);
		self.stats.request(1);
		let (rows, total) = read_rows(&conn, &statement, table)?;

		let total_results = match total {
			Some(total) => total,
			None if plan.skip > 0 => {
				let count = render_count(&self.naming, table, &discriminators, plan);
				self.stats.request(1);
				count_rows(&conn, &count)?
			}
			None => 0,
		};

		let stats = QueryStats {
			total_results,
			retrieved_results: rows.len(),
			first_result: plan.skip,
		};
		debug!(total = stats.total_results, retrieved = stats.retrieved_results, "query finished");
		Ok((rows, stats))
	}

	/// Turns a row read for `design` into a document of its concrete type,
	/// migrating it to the configured version first.
	///
	/// A row that was migrated or awaits reprojection is rewritten right away
	/// in foreground mode. In background mode it is flagged for the
	/// reprojection worker instead.
	pub fn materialize(&self, design: &Design, mut row: Row) -> Result<Materialized> {
		let concrete = self.model.resolve(design, row.discriminator()?)?;
		let migrated = DocumentMigrator::new(&self.model).migrate(concrete, &mut row)?;

		let key = row.key()?;
		let document = concrete.decode(row.document()?, self.model.serializer())?;
		let metadata = row.metadata()?;
		let mut etag = row.etag()?;

		if migrated || row.awaits_reprojection() {
			match self.config.migration_mode {
				DocumentMigrationMode::Foreground => {
					if let Some(rewritten) = self.rewrite(concrete, &row, &document, &metadata)? {
						etag = rewritten;
					}
				}
				DocumentMigrationMode::Background => {
					if !row.awaits_reprojection() {
						self.flag(concrete.table(), &key, etag)?;
					}
					self.wake_worker();
				}
			}
		}

		Ok(Materialized {
			design: concrete.id(),
			key,
			document,
			etag,
			metadata,
		})
	}

	/// The full column set written for `document`: its projections, the
	/// serialized payload and metadata, and the current version.
	pub fn columns_for(
		&self,
		design: &Design,
		document: &AnyDocument,
		metadata: &Metadata,
	) -> Result<IndexMap<String, Value>> {
		let mut columns = design.project(document, metadata)?;
		columns.insert(system::DOCUMENT.to_string(), Value::Blob(design.encode(document, self.model.serializer())?));
		let metadata = if metadata.is_empty() {
			Value::Undefined
		} else {
			Value::Blob(encode_metadata(metadata)?)
		};
		columns.insert(system::METADATA.to_string(), metadata);
		columns.insert(system::VERSION.to_string(), Value::Int4(self.model.version() as i32));
		columns.insert(system::AWAITS_REPROJECTION.to_string(), Value::Boolean(false));
		Ok(columns)
	}

	/// Writes a migrated row back. Returns the new etag, or `None` when the
	/// row was changed concurrently and the rewrite was skipped.
	pub(crate) fn rewrite(
		&self,
		design: &Design,
		row: &Row,
		document: &AnyDocument,
		metadata: &Metadata,
	) -> Result<Option<Etag>> {
		let table = self.model.table(design.table())?;
		let mut columns: IndexMap<String, Value> = row
			.iter()
			.filter(|(name, _)| table.column(name).is_some())
			.map(|(name, value)| (name.clone(), value.clone()))
			.collect();
		columns.extend(self.columns_for(design, document, metadata)?);

		let key = row.key()?;
		let command = docrow_core::UpdateCommand {
			table: design.table().to_string(),
			key: key.clone(),
			expected_etag: Some(row.etag()?),
			columns,
		};
		match self.execute(&[command.into()]) {
			Ok(etag) => {
				debug!(key = %key, "rewrote migrated row");
				Ok(Some(etag))
			}
			Err(err) if err.is_concurrency() => {
				debug!(key = %key, "row changed concurrently, rewrite skipped");
				Ok(None)
			}
			Err(err) => Err(err),
		}
	}

	fn flag(&self, table: &str, key: &DocumentKey, etag: Etag) -> Result<()> {
		let conn = self.connection()?;
		let sql = format!(
			"UPDATE {} SET \"{}\" = 1 WHERE \"{}\" = ?1 AND \"{}\" = ?2",
			self.naming.table(table),
			system::AWAITS_REPROJECTION,
			system::ID,
			system::ETAG
		);
		self.stats.request(1);
		conn.execute(&sql, [key.as_str().to_string(), etag.to_string()])
			.map_err(|e| error!(store::statement_failed(e.to_string())))?;
		debug!(key = %key, "row flagged for reprojection");
		Ok(())
	}
}

/// Runs a statement and reads its rows, typed by the columns of `table`.
/// Also returns the match count of a paged query.
pub(crate) fn read_rows(conn: &Connection, statement: &Statement, table: &Table) -> Result<(Vec<Row>, Option<usize>)> {
	let mut stmt = conn.prepare(&statement.sql).map_err(|e| error!(store::statement_failed(e.to_string())))?;
	let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
	let params: Vec<(&str, &dyn ToSql)> =
		statement.params.iter().map(|(name, value)| (name.as_str(), value as &dyn ToSql)).collect();

	let mut rows = stmt.query(params.as_slice()).map_err(|e| error!(store::statement_failed(e.to_string())))?;
	let mut result = Vec::new();
	let mut total = None;

	while let Some(raw) = rows.next().map_err(|e| error!(store::statement_failed(e.to_string())))? {
		let mut row = Row::new();
		for (index, name) in names.iter().enumerate() {
			let value = raw.get_ref(index).map_err(|e| error!(store::statement_failed(e.to_string())))?;
			if name == TOTAL_COLUMN {
				if let Value::Int8(count) = from_sql(value, None)? {
					total = Some(count.max(0) as usize);
				}
				continue;
			}
			row.set(name.clone(), from_sql(value, table.column(name).map(|column| column.ty))?);
		}
		result.push(row);
	}

	Ok((result, total))
}

fn count_rows(conn: &Connection, statement: &Statement) -> Result<usize> {
	let params: Vec<(&str, &dyn ToSql)> =
		statement.params.iter().map(|(name, value)| (name.as_str(), value as &dyn ToSql)).collect();
	let count: i64 = conn
		.query_row(&statement.sql, params.as_slice(), |row| row.get(0))
		.map_err(|e| error!(store::statement_failed(e.to_string())))?;
	Ok(count.max(0) as usize)
}
