// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_core::{AnyDocument, DesignId, DocumentKey, Etag, Metadata};

/// Lifecycle state of a tracked document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
	/// Stored in the session, never persisted.
	Transient,
	/// Persisted and tracked.
	Loaded,
	/// Marked for removal on the next save.
	Deleted,
}

/// A document tracked by a session.
#[derive(Debug, Clone)]
pub struct ManagedEntity {
	pub(crate) key: DocumentKey,
	pub(crate) table: String,
	pub(crate) design: DesignId,
	pub(crate) document: AnyDocument,
	pub(crate) etag: Option<Etag>,
	pub(crate) state: EntityState,
	/// Serialized form as last persisted.
	pub(crate) snapshot: Option<Vec<u8>>,
	pub(crate) metadata: Metadata,
	pub(crate) persisted_metadata: Metadata,
}

impl ManagedEntity {
	pub(crate) fn transient(table: String, key: DocumentKey, design: DesignId, document: AnyDocument) -> Self {
		Self {
			key,
			table,
			design,
			document,
			etag: None,
			state: EntityState::Transient,
			snapshot: None,
			metadata: Metadata::new(),
			persisted_metadata: Metadata::new(),
		}
	}

	pub(crate) fn loaded(
		table: String,
		key: DocumentKey,
		design: DesignId,
		document: AnyDocument,
		etag: Etag,
		snapshot: Vec<u8>,
		metadata: Metadata,
	) -> Self {
		Self {
			key,
			table,
			design,
			document,
			etag: Some(etag),
			state: EntityState::Loaded,
			snapshot: Some(snapshot),
			persisted_metadata: metadata.clone(),
			metadata,
		}
	}

	pub fn key(&self) -> &DocumentKey {
		&self.key
	}

	pub fn table(&self) -> &str {
		&self.table
	}

	pub fn design(&self) -> DesignId {
		self.design
	}

	pub fn document(&self) -> &AnyDocument {
		&self.document
	}

	/// The etag last seen for this document, `None` while transient.
	pub fn etag(&self) -> Option<Etag> {
		self.etag
	}

	pub fn state(&self) -> EntityState {
		self.state
	}

	pub fn metadata(&self) -> &Metadata {
		&self.metadata
	}

	/// Whether `encoded` differs from what was last persisted.
	pub(crate) fn is_dirty(&self, encoded: &[u8]) -> bool {
		self.snapshot.as_deref() != Some(encoded) || self.metadata != self.persisted_metadata
	}

	/// Records a successful write under `etag`.
	pub(crate) fn persisted(&mut self, etag: Etag, encoded: Vec<u8>) {
		self.etag = Some(etag);
		self.state = EntityState::Loaded;
		self.snapshot = Some(encoded);
		self.persisted_metadata = self.metadata.clone();
	}
}
