// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{path::PathBuf, time::Duration};

use docrow_core::DocumentMigrationMode;

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbPath {
	/// A database file. A path without extension is treated as a directory
	/// holding `docrow.db`.
	File(PathBuf),
	/// A private database that disappears with the store.
	Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
	/// Write locks are taken on first write.
	#[default]
	ReadCommitted,
	/// Write locks are taken when the transaction begins.
	Serializable,
}

/// How physical table names relate to logical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableMode {
	/// Tables carry their logical names and the database must belong to
	/// docrow.
	#[default]
	Real,
	/// Tables get a random prefix and are dropped with the store. Other
	/// tables in the database are ignored.
	Ephemeral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JournalMode {
	Delete,
	Truncate,
	Persist,
	Memory,
	#[default]
	Wal,
	Off,
}

impl JournalMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			JournalMode::Delete => "DELETE",
			JournalMode::Truncate => "TRUNCATE",
			JournalMode::Persist => "PERSIST",
			JournalMode::Memory => "MEMORY",
			JournalMode::Wal => "WAL",
			JournalMode::Off => "OFF",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynchronousMode {
	Off,
	#[default]
	Normal,
	Full,
	Extra,
}

impl SynchronousMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			SynchronousMode::Off => "OFF",
			SynchronousMode::Normal => "NORMAL",
			SynchronousMode::Full => "FULL",
			SynchronousMode::Extra => "EXTRA",
		}
	}
}

/// Configuration of the background reprojection worker.
#[derive(Debug, Clone)]
pub struct ReprojectionConfig {
	pub enabled: bool,
	/// Rows read per page of a reprojection pass.
	pub batch_size: usize,
	/// Pause between two passes.
	pub interval: Duration,
}

impl Default for ReprojectionConfig {
	fn default() -> Self {
		Self {
			enabled: false,
			batch_size: 500,
			interval: Duration::from_secs(1),
		}
	}
}

/// Configuration of a [`Store`](crate::Store).
#[derive(Debug, Clone)]
pub struct StoreConfig {
	pub path: DbPath,
	pub max_pool_size: u32,
	/// How long to wait for a pooled connection before failing.
	pub connection_timeout: Duration,
	/// How long SQLite waits on a locked database.
	pub busy_timeout: Duration,
	/// Upper bound of bound parameters per flushed batch.
	pub max_parameters: usize,
	pub isolation: IsolationLevel,
	pub table_mode: TableMode,
	pub migration_mode: DocumentMigrationMode,
	pub reprojection: ReprojectionConfig,
	pub journal_mode: JournalMode,
	pub synchronous_mode: SynchronousMode,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			path: DbPath::Memory,
			max_pool_size: 8,
			connection_timeout: Duration::from_secs(30),
			busy_timeout: Duration::from_secs(5),
			max_parameters: 2000,
			isolation: IsolationLevel::default(),
			table_mode: TableMode::default(),
			migration_mode: DocumentMigrationMode::default(),
			reprojection: ReprojectionConfig::default(),
			journal_mode: JournalMode::default(),
			synchronous_mode: SynchronousMode::default(),
		}
	}
}

impl StoreConfig {
	pub fn file(path: impl Into<PathBuf>) -> Self {
		Self {
			path: DbPath::File(path.into()),
			..Default::default()
		}
	}

	pub fn in_memory() -> Self {
		Self::default()
	}

	/// A store whose tables live next to others in a shared database and
	/// vanish when the store is dropped.
	pub fn ephemeral(path: impl Into<PathBuf>) -> Self {
		Self {
			path: DbPath::File(path.into()),
			table_mode: TableMode::Ephemeral,
			..Default::default()
		}
	}

	pub fn with_max_pool_size(mut self, size: u32) -> Self {
		self.max_pool_size = size;
		self
	}

	pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
		self.connection_timeout = timeout;
		self
	}

	pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
		self.busy_timeout = timeout;
		self
	}

	pub fn with_max_parameters(mut self, max: usize) -> Self {
		self.max_parameters = max.max(1);
		self
	}

	pub fn with_isolation(mut self, isolation: IsolationLevel) -> Self {
		self.isolation = isolation;
		self
	}

	pub fn with_table_mode(mut self, mode: TableMode) -> Self {
		self.table_mode = mode;
		self
	}

	pub fn with_migration_mode(mut self, mode: DocumentMigrationMode) -> Self {
		self.migration_mode = mode;
		self
	}

	pub fn with_reprojection(mut self, reprojection: ReprojectionConfig) -> Self {
		self.reprojection = reprojection;
		self
	}

	pub fn with_journal_mode(mut self, mode: JournalMode) -> Self {
		self.journal_mode = mode;
		self
	}

	pub fn with_synchronous_mode(mut self, mode: SynchronousMode) -> Self {
		self.synchronous_mode = mode;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = StoreConfig::default();
		assert_eq!(config.path, DbPath::Memory);
		assert_eq!(config.max_parameters, 2000);
		assert_eq!(config.migration_mode, DocumentMigrationMode::Foreground);
		assert!(!config.reprojection.enabled);
	}

	#[test]
	fn test_ephemeral_preset() {
		let config = StoreConfig::ephemeral("/tmp/x.db");
		assert_eq!(config.table_mode, TableMode::Ephemeral);
		assert_eq!(config.path, DbPath::File("/tmp/x.db".into()));
	}

	#[test]
	fn test_max_parameters_at_least_one() {
		assert_eq!(StoreConfig::default().with_max_parameters(0).max_parameters, 1);
	}
}
