// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Pre-configured stores for common use cases

use std::path::Path;

use docrow_core::{Configuration, Result};
use docrow_store::{Store, StoreConfig};

/// A store backed by a private temporary database, removed on drop.
pub fn memory(configuration: Configuration) -> Result<Store> {
	Store::new(StoreConfig::in_memory(), configuration.build()?)
}

/// A store backed by the database file at `path`.
pub fn file(path: impl AsRef<Path>, configuration: Configuration) -> Result<Store> {
	Store::new(StoreConfig::file(path.as_ref()), configuration.build()?)
}

/// A store whose tables live next to foreign ones in the database at
/// `path` and are dropped with the store.
pub fn ephemeral(path: impl AsRef<Path>, configuration: Configuration) -> Result<Store> {
	Store::new(StoreConfig::ephemeral(path.as_ref()), configuration.build()?)
}
