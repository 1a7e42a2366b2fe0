// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_core::{DmlCommand, DocumentKey, DocumentMigrator, Etag, Row};
use docrow_type::Result;
use tracing::{debug, instrument, warn};

use super::{Store, read::read_rows};
use crate::{executor::Executor, sql::render_pending};

impl Store {
	/// Executes `commands` atomically under one new etag, which is returned.
	///
	/// Updates and deletes carrying an expected etag only touch rows that
	/// still have it; if any command misses its row the whole call fails
	/// with a concurrency error and nothing is written.
	pub fn execute(&self, commands: &[DmlCommand]) -> Result<Etag> {
		let mut conn = self.connection()?;
		let executor = Executor {
			model: &self.model,
			naming: &self.naming,
			max_parameters: self.config.max_parameters,
			behavior: self.transaction_behavior(),
		};

		let result = executor.execute(&mut conn, commands);
		match &result {
			Ok(execution) => {
				self.stats.request(execution.flushes as u64);
				self.stats.write(commands.len(), execution.etag);
			}
			Err(err) if err.is_concurrency() => debug!(code = %err.code, "batch rejected"),
			Err(_) => {}
		}
		result.map(|execution| execution.etag)
	}

	/// Rewrites every row that awaits reprojection or is behind the
	/// configured version. Returns the number of rewritten rows.
	///
	/// Rows changed concurrently during the pass are left for the next one.
	#[instrument(name = "store::reproject", level = "debug", skip(self))]
	pub fn reproject_pending(&self) -> Result<usize> {
		let version = self.model.version();
		let batch_size = self.config.reprojection.batch_size.max(1);
		let mut rewritten = 0;

		for table in self.model.tables().values() {
			let mut after = String::new();
			loop {
				let page = {
					let conn = self.connection()?;
					let statement = render_pending(&self.naming, table.name(), version, &after, batch_size);
					self.stats.request(1);
					read_rows(&conn, &statement, table)?.0
				};
				let Some(last) = page.last() else {
					break;
				};
				after = last.key()?.as_str().to_string();
				let full = page.len() == batch_size;

				for row in page {
					if self.reproject(table.name(), row)? {
						rewritten += 1;
					}
				}
				if !full {
					break;
				}
			}
		}

		if rewritten > 0 {
			debug!(rewritten, "reprojection pass finished");
		}
		Ok(rewritten)
	}

	fn reproject(&self, table: &str, mut row: Row) -> Result<bool> {
		let key: DocumentKey = row.key()?;
		let design = match self.model.resolve_in_table(table, row.discriminator()?) {
			Ok(design) => design,
			Err(err) => {
				warn!(table, key = %key, error = %err, "skipping row of unknown type");
				return Ok(false);
			}
		};

		if let Err(err) = DocumentMigrator::new(&self.model).migrate(design, &mut row) {
			warn!(table, key = %key, error = %err, "skipping row that cannot be migrated");
			return Ok(false);
		}

		let document = design.decode(row.document()?, self.model.serializer())?;
		let metadata = row.metadata()?;
		Ok(self.rewrite(design, &row, &document, &metadata)?.is_some())
	}
}
