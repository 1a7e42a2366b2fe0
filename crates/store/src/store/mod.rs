// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod read;
mod write;

use std::{
	ops::Deref,
	path::PathBuf,
	sync::{Arc, Weak},
};

use docrow_core::DocumentModel;
use docrow_type::{Result, diagnostic::store, error};
pub use read::Materialized;
use parking_lot::Mutex;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::TransactionBehavior;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
	config::{DbPath, IsolationLevel, StoreConfig, TableMode},
	connection::{connection_manager, remove_db_files, resolve_db_path},
	reprojection::ReprojectionWorker,
	schema::{SchemaMigrator, drop_tables},
	sql::Naming,
	stats::{StatsRecorder, StoreStats},
};

/// A document store on top of one SQLite database.
///
/// Cloning is cheap; all clones share the connection pool, the model and
/// the statistics.
#[derive(Clone)]
pub struct Store(Arc<StoreInner>);

pub struct StoreInner {
	config: StoreConfig,
	model: Arc<DocumentModel>,
	naming: Naming,
	pool: Pool<SqliteConnectionManager>,
	stats: StatsRecorder,
	worker: Mutex<Option<ReprojectionWorker>>,
	// Declared after the pool so the file outlives every connection.
	file: DbFile,
}

impl Deref for Store {
	type Target = StoreInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Store {
	/// Opens the database, reconciles its schema with `model` and starts
	/// the reprojection worker when configured.
	#[instrument(name = "store::open", level = "info", skip_all, fields(path = ?config.path, mode = ?config.table_mode))]
	pub fn new(config: StoreConfig, model: DocumentModel) -> Result<Self> {
		let path = resolve_db_path(&config.path)?;
		let file = DbFile {
			path: path.clone(),
			temporary: config.path == DbPath::Memory,
		};

		let naming = match config.table_mode {
			TableMode::Real => Naming::default(),
			TableMode::Ephemeral => Naming::new(format!("e{}_", &Uuid::new_v4().simple().to_string()[..12])),
		};

		let manager = connection_manager(&path, config.busy_timeout, config.synchronous_mode);
		let pool = Pool::builder()
			.max_size(config.max_pool_size.max(1))
			.min_idle(Some(1))
			.connection_timeout(config.connection_timeout)
			.build(manager)
			.map_err(|e| error!(store::connection_failed(format!("{}: {}", path.display(), e))))?;
		{
			let conn = pool
				.get_timeout(config.connection_timeout)
				.map_err(|e| error!(store::connection_failed(e.to_string())))?;
			conn.pragma_update(None, "journal_mode", config.journal_mode.as_str())
				.map_err(|e| error!(store::connection_failed(e.to_string())))?;
		}

		let inner = Arc::new(StoreInner {
			config,
			model: Arc::new(model),
			naming,
			pool,
			stats: StatsRecorder::default(),
			worker: Mutex::new(None),
			file,
		});
		let store = Store(inner);

		let applied = store.initialize()?;
		info!(path = %path.display(), applied, "store opened");

		if store.config.reprojection.enabled {
			let weak: Weak<StoreInner> = Arc::downgrade(&store.0);
			let worker = ReprojectionWorker::start(store.config.reprojection.interval, move || {
				weak.upgrade().map(|inner| Store(inner).reproject_pending())
			})?;
			*store.worker.lock() = Some(worker);
		}

		Ok(store)
	}

	/// Reconciles the database schema with the model. Returns the number of
	/// DDL statements applied, zero when the schema is already current.
	pub fn initialize(&self) -> Result<usize> {
		let mut conn = self.connection()?;
		SchemaMigrator::new(&self.model, &self.naming).migrate(&mut conn)
	}

	pub fn model(&self) -> &Arc<DocumentModel> {
		&self.model
	}

	pub fn config(&self) -> &StoreConfig {
		&self.config
	}

	pub fn stats(&self) -> StoreStats {
		self.stats.snapshot()
	}

	/// Prefix of the physical table names; empty unless the store runs
	/// with ephemeral tables.
	pub fn table_prefix(&self) -> &str {
		self.naming.prefix()
	}

	pub(crate) fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
		self.pool
			.get_timeout(self.config.connection_timeout)
			.map_err(|_| error!(store::connection_timeout(self.config.connection_timeout.as_millis())))
	}

	pub(crate) fn transaction_behavior(&self) -> TransactionBehavior {
		match self.config.isolation {
			IsolationLevel::ReadCommitted => TransactionBehavior::Deferred,
			IsolationLevel::Serializable => TransactionBehavior::Immediate,
		}
	}

	pub(crate) fn wake_worker(&self) {
		if let Some(worker) = self.worker.lock().as_ref() {
			worker.wake();
		}
	}
}

impl Drop for StoreInner {
	fn drop(&mut self) {
		if let Some(mut worker) = self.worker.lock().take() {
			worker.stop();
		}

		if self.config.table_mode == TableMode::Ephemeral {
			let dropped = self
				.pool
				.get_timeout(self.config.connection_timeout)
				.map_err(|e| error!(store::connection_failed(e.to_string())))
				.and_then(|conn| drop_tables(&conn, &self.naming));
			match dropped {
				Ok(()) => debug!(prefix = self.naming.prefix(), "dropped ephemeral tables"),
				Err(err) => warn!(prefix = self.naming.prefix(), error = %err, "cannot drop ephemeral tables"),
			}
		}
	}
}

struct DbFile {
	path: PathBuf,
	temporary: bool,
}

impl Drop for DbFile {
	fn drop(&mut self) {
		if self.temporary {
			remove_db_files(&self.path);
		}
	}
}
