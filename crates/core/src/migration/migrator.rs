// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_type::{Result, Value, diagnostic::migration, error, return_error};
use tracing::{debug, instrument};

use crate::{
	design::{Design, DocumentModel},
	row::Row,
	table::system,
};

/// Brings stored rows up to the configured document version.
pub struct DocumentMigrator<'a> {
	model: &'a DocumentModel,
}

impl<'a> DocumentMigrator<'a> {
	pub fn new(model: &'a DocumentModel) -> Self {
		Self {
			model,
		}
	}

	/// Applies every pending document migration to `row`.
	///
	/// Returns whether the row changed. On failure `row` is left untouched.
	#[instrument(name = "migration::document", level = "trace", skip_all, fields(table = design.table()))]
	pub fn migrate(&self, design: &Design, row: &mut Row) -> Result<bool> {
		let target = self.model.version();
		let stored = row.version();
		if stored == target as i64 {
			return Ok(false);
		}

		let key = row.key()?;
		if stored < 0 || stored > target as i64 {
			return_error!(migration::unexpected_version(&key, stored, target));
		}

		let serializer = self.model.serializer();
		let mut migrated = row.clone();
		for step in self.model.migrations().after(stored as u32) {
			for document in step.document_migrations() {
				if !document.applies_to(design) {
					continue;
				}
				document.migrate(serializer, &mut migrated).map_err(|e| {
					error!(migration::migration_failed(&key, step.version(), e.message.clone())).with_cause(e)
				})?;
			}
			migrated.set(system::VERSION, Value::Int4(step.version() as i32));
		}

		serializer.deserialize(migrated.document()?).map_err(|e| {
			error!(migration::migration_failed(&key, target, "migrated payload cannot be read")).with_cause(e)
		})?;

		debug!(key = %key, from = stored, to = target, "migrated document");
		*row = migrated;
		Ok(true)
	}
}
