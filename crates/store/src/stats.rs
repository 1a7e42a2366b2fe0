// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_type::Etag;
use parking_lot::Mutex;

/// Counters of the work a store has done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
	/// Round trips to the database: every flushed batch, get, query page and
	/// count query.
	pub requests: u64,
	/// Successfully committed DML commands.
	pub commands: u64,
	/// Commit token of the latest successful write.
	pub last_written_etag: Option<Etag>,
}

#[derive(Debug, Default)]
pub(crate) struct StatsRecorder(Mutex<StoreStats>);

impl StatsRecorder {
	pub(crate) fn request(&self, count: u64) {
		self.0.lock().requests += count;
	}

	pub(crate) fn write(&self, commands: usize, etag: Etag) {
		let mut stats = self.0.lock();
		stats.commands += commands as u64;
		stats.last_written_etag = Some(etag);
	}

	pub(crate) fn snapshot(&self) -> StoreStats {
		*self.0.lock()
	}
}
