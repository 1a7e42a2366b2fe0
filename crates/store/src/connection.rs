// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SQLite connection pooling.

use std::{
	env, fs,
	path::{Path, PathBuf},
	time::Duration,
};

use docrow_type::{Result, diagnostic::store, error};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use uuid::Uuid;

use crate::config::{DbPath, SynchronousMode};

/// A manager for pooled connections to the database file at `path`.
///
/// Every connection gets the busy timeout and synchronous mode of the
/// store and keeps temporary tables in memory.
pub(crate) fn connection_manager(
	path: &Path,
	busy_timeout: Duration,
	synchronous_mode: SynchronousMode,
) -> SqliteConnectionManager {
	let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
	SqliteConnectionManager::file(path).with_flags(flags).with_init(move |conn| {
		conn.busy_timeout(busy_timeout)?;
		conn.pragma_update(None, "synchronous", synchronous_mode.as_str())?;
		conn.pragma_update(None, "temp_store", "MEMORY")
	})
}

/// Resolves the file backing `path`, creating directories as needed.
///
/// In-memory stores are backed by a uniquely named file in the temp
/// directory so that every pooled connection sees the same database.
pub(crate) fn resolve_db_path(path: &DbPath) -> Result<PathBuf> {
	let resolved = match path {
		DbPath::Memory => env::temp_dir().join(format!("docrow-{}.db", Uuid::new_v4())),
		DbPath::File(path) if path.extension().is_none() => {
			create_dir(path)?;
			path.join("docrow.db")
		}
		DbPath::File(path) => {
			if let Some(parent) = path.parent() {
				create_dir(parent)?;
			}
			path.clone()
		}
	};
	Ok(resolved)
}

fn create_dir(path: &Path) -> Result<()> {
	if path.as_os_str().is_empty() {
		return Ok(());
	}
	fs::create_dir_all(path)
		.map_err(|e| error!(store::connection_failed(format!("cannot create {}: {}", path.display(), e))))
}

/// Removes a database file together with its journal files.
pub(crate) fn remove_db_files(path: &Path) {
	let _ = fs::remove_file(path);
	let _ = fs::remove_file(format!("{}-wal", path.display()));
	let _ = fs::remove_file(format!("{}-shm", path.display()));
	let _ = fs::remove_file(format!("{}-journal", path.display()));
}

#[cfg(test)]
mod tests {
	use docrow_testing::tempdir::temp_dir;
	use r2d2::Pool;

	use super::*;

	#[test]
	fn test_directory_path_gets_default_file() {
		temp_dir(|dir| {
			let resolved = resolve_db_path(&DbPath::File(dir.join("data"))).unwrap();
			assert_eq!(resolved, dir.join("data").join("docrow.db"));
			assert!(dir.join("data").is_dir());
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_memory_paths_are_unique() {
		let a = resolve_db_path(&DbPath::Memory).unwrap();
		let b = resolve_db_path(&DbPath::Memory).unwrap();
		assert_ne!(a, b);
	}

	#[test]
	fn test_pooled_connections_are_initialized() {
		temp_dir(|dir| {
			let manager = connection_manager(&dir.join("test.db"), Duration::from_millis(1234), SynchronousMode::Full);
			let pool = Pool::builder().max_size(2).build(manager).unwrap();
			for _ in 0..2 {
				let conn = pool.get().unwrap();
				let timeout: i64 = conn.query_row("PRAGMA busy_timeout", [], |row| row.get(0)).unwrap();
				assert_eq!(timeout, 1234);
				// FULL
				let synchronous: i64 = conn.query_row("PRAGMA synchronous", [], |row| row.get(0)).unwrap();
				assert_eq!(synchronous, 2);
				// MEMORY
				let temp_store: i64 = conn.query_row("PRAGMA temp_store", [], |row| row.get(0)).unwrap();
				assert_eq!(temp_store, 2);
			}
			Ok(())
		})
		.unwrap();
	}
}
