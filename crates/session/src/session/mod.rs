// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::any::type_name;

use docrow_core::{AnyDocument, Design, DmlCommand, Doc, Document, DocumentKey, Etag, Metadata};
use docrow_store::Store;
use docrow_type::{Result, diagnostic::argument, return_error};
use indexmap::IndexMap;
use tracing::debug;

use crate::entity::{EntityState, ManagedEntity};

mod load;
mod save;

/// Table and key of a tracked document.
type Identity = (String, DocumentKey);

/// A unit of work over a [`Store`].
///
/// Not shared between threads; open one session per logical operation and
/// drop it afterwards.
pub struct Session {
	store: Store,
	entities: IndexMap<Identity, ManagedEntity>,
	deferred: Vec<DmlCommand>,
	last_etag: Option<Etag>,
}

impl Session {
	pub fn new(store: &Store) -> Self {
		Self {
			store: store.clone(),
			entities: IndexMap::new(),
			deferred: Vec::new(),
			last_etag: None,
		}
	}

	/// The store this session writes to.
	pub fn document_store(&self) -> &Store {
		&self.store
	}

	/// Starts tracking `document` under the key its design resolves.
	///
	/// If the key is already tracked the call is a no-op and the tracked
	/// instance is returned.
	pub fn store<T: Document>(&mut self, document: T) -> Result<Doc<T>> {
		let model = self.store.model().clone();
		let document = AnyDocument::from(Doc::new(document));
		let design = model.design_of(&document)?;
		let key = model.key_of(design, &document)?;
		self.track(design, key, document)
	}

	/// Like [`Session::store`], with an explicit key.
	pub fn store_with_key<T: Document>(&mut self, document: T, key: impl Into<DocumentKey>) -> Result<Doc<T>> {
		let model = self.store.model().clone();
		let document = AnyDocument::from(Doc::new(document));
		let design = model.design_of(&document)?;
		self.track(design, key.into(), document)
	}

	fn track<T: Document>(&mut self, design: &Design, key: DocumentKey, document: AnyDocument) -> Result<Doc<T>> {
		let identity = (design.table().to_string(), key);
		let tracked = match self.entities.get(&identity) {
			Some(entity) => {
				debug!(table = %identity.0, key = %identity.1, "already tracked, store ignored");
				entity.document.clone()
			}
			None => {
				let entity =
					ManagedEntity::transient(identity.0.clone(), identity.1.clone(), design.id(), document.clone());
				self.entities.insert(identity.clone(), entity);
				document
			}
		};
		downcast(&identity.1, tracked)
	}

	/// Marks `document` for deletion. A transient document is simply
	/// forgotten; an untracked one is ignored.
	pub fn delete<T: Document>(&mut self, document: &Doc<T>) {
		if let Some(identity) = self.identity_of(&AnyDocument::from(document)) {
			self.mark_deleted(&identity);
		}
	}

	/// Marks the tracked document of type `T` under `key` for deletion.
	pub fn delete_by_key<T: Document>(&mut self, key: impl Into<DocumentKey>) -> Result<()> {
		let table = self.store.model().design_for::<T>()?.table().to_string();
		self.mark_deleted(&(table, key.into()));
		Ok(())
	}

	fn mark_deleted(&mut self, identity: &Identity) {
		match self.entities.get(identity).map(|entity| entity.state) {
			Some(EntityState::Transient) => {
				self.entities.shift_remove(identity);
			}
			Some(EntityState::Loaded) => {
				if let Some(entity) = self.entities.get_mut(identity) {
					entity.state = EntityState::Deleted;
				}
			}
			_ => {}
		}
	}

	/// Stops tracking `document`; pending changes to it are dropped.
	pub fn evict<T: Document>(&mut self, document: &Doc<T>) -> bool {
		match self.identity_of(&AnyDocument::from(document)) {
			Some(identity) => self.entities.shift_remove(&identity).is_some(),
			None => false,
		}
	}

	/// Forgets every tracked document and deferred command.
	pub fn clear(&mut self) {
		self.entities.clear();
		self.deferred.clear();
	}

	pub fn is_tracked<T: Document>(&self, document: &Doc<T>) -> bool {
		self.entity_of(document).is_some()
	}

	pub fn key_of<T: Document>(&self, document: &Doc<T>) -> Option<DocumentKey> {
		self.entity_of(document).map(|entity| entity.key.clone())
	}

	/// The etag last read or written for `document`.
	pub fn etag_of<T: Document>(&self, document: &Doc<T>) -> Option<Etag> {
		self.entity_of(document).and_then(|entity| entity.etag)
	}

	pub fn metadata_of<T: Document>(&self, document: &Doc<T>) -> Option<Metadata> {
		self.entity_of(document).map(|entity| entity.metadata.clone())
	}

	/// Replaces the metadata saved with `document`.
	pub fn set_metadata<T: Document>(&mut self, document: &Doc<T>, metadata: Metadata) -> Result<()> {
		let Some(identity) = self.identity_of(&AnyDocument::from(document)) else {
			return_error!(argument::untracked_document(type_name::<T>()));
		};
		if let Some(entity) = self.entities.get_mut(&identity) {
			entity.metadata = metadata;
		}
		Ok(())
	}

	/// Appends `command` to the next [`Session::save_changes`] batch.
	pub fn defer(&mut self, command: impl Into<DmlCommand>) {
		self.deferred.push(command.into());
	}

	/// Tracked documents in the order they were first seen.
	pub fn managed_entities(&self) -> impl Iterator<Item = &ManagedEntity> {
		self.entities.values()
	}

	fn entity_of<T: Document>(&self, document: &Doc<T>) -> Option<&ManagedEntity> {
		let document = AnyDocument::from(document);
		self.entities.values().find(|entity| entity.document.ptr_eq(&document))
	}

	fn identity_of(&self, document: &AnyDocument) -> Option<Identity> {
		self.entities.iter().find(|(_, entity)| entity.document.ptr_eq(document)).map(|(identity, _)| identity.clone())
	}
}

fn downcast<T: Document>(key: &DocumentKey, document: AnyDocument) -> Result<Doc<T>> {
	match document.downcast::<T>() {
		Some(document) => Ok(document),
		None => return_error!(argument::document_type_mismatch(key, type_name::<T>(), document.type_name())),
	}
}
