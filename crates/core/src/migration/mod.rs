// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Debug, Formatter},
	sync::Arc,
};

use docrow_type::{Result, diagnostic::configuration, return_error};

mod document;
mod migrator;

pub use document::{ChangeColumns, ChangeDocument, ChangeDocumentJson, DocumentFilter, DocumentMigration};
pub use migrator::DocumentMigrator;

use crate::schema::DdlCommand;

/// When out-of-date documents are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentMigrationMode {
	/// Migrated documents are written back as part of the load that found
	/// them.
	#[default]
	Foreground,
	/// Loads migrate in memory only and flag the row for the reprojection
	/// worker.
	Background,
}

/// One numbered step of schema and document evolution.
pub struct Migration {
	version: u32,
	before: Vec<DdlCommand>,
	after: Vec<DdlCommand>,
	documents: Vec<Arc<dyn DocumentMigration>>,
}

impl Migration {
	pub fn new(version: u32) -> Self {
		Self {
			version,
			before: vec![],
			after: vec![],
			documents: vec![],
		}
	}

	/// Schema change that runs before the automatic additive changes.
	pub fn before(mut self, command: DdlCommand) -> Self {
		self.before.push(command);
		self
	}

	/// Schema change that runs after the automatic additive changes.
	pub fn after(mut self, command: DdlCommand) -> Self {
		self.after.push(command);
		self
	}

	pub fn document(mut self, migration: impl DocumentMigration + 'static) -> Self {
		self.documents.push(Arc::new(migration));
		self
	}

	pub fn version(&self) -> u32 {
		self.version
	}

	pub fn before_commands(&self) -> &[DdlCommand] {
		&self.before
	}

	pub fn after_commands(&self) -> &[DdlCommand] {
		&self.after
	}

	pub fn document_migrations(&self) -> &[Arc<dyn DocumentMigration>] {
		&self.documents
	}
}

impl Debug for Migration {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Migration")
			.field("version", &self.version)
			.field("before", &self.before)
			.field("after", &self.after)
			.field("documents", &self.documents.len())
			.finish()
	}
}

/// The registered migrations, numbered 1, 2, 3 without gaps.
#[derive(Debug, Default)]
pub struct Migrations(Vec<Migration>);

impl Migrations {
	pub fn push(&mut self, migration: Migration) -> Result<()> {
		let expected = self.version() + 1;
		if migration.version != expected {
			return_error!(configuration::migration_version_gap(expected, migration.version));
		}
		self.0.push(migration);
		Ok(())
	}

	/// The version every document and the schema end up at.
	pub fn version(&self) -> u32 {
		self.0.len() as u32
	}

	/// Migrations newer than `version`, in order.
	pub fn after(&self, version: u32) -> impl Iterator<Item = &Migration> {
		self.0.iter().filter(move |m| m.version > version)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Migration> {
		self.0.iter()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_consecutive_versions() {
		let mut migrations = Migrations::default();
		assert_eq!(migrations.version(), 0);
		migrations.push(Migration::new(1)).unwrap();
		migrations.push(Migration::new(2)).unwrap();
		assert_eq!(migrations.version(), 2);
		assert_eq!(migrations.after(1).map(Migration::version).collect::<Vec<_>>(), vec![2]);
	}

	#[test]
	fn test_gap_is_rejected() {
		let mut migrations = Migrations::default();
		migrations.push(Migration::new(1)).unwrap();
		let err = migrations.push(Migration::new(3)).unwrap_err();
		assert_eq!(err.code, "CONFIG_007");
		assert_eq!(migrations.version(), 1);
	}

	#[test]
	fn test_must_start_at_one() {
		let mut migrations = Migrations::default();
		assert_eq!(migrations.push(Migration::new(0)).unwrap_err().code, "CONFIG_007");
	}
}
