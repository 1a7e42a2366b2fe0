// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::any::type_name;

use docrow_core::{AnyDocument, Design, Doc, Document, DocumentKey, QueryPlan, QueryStats};
use docrow_store::Materialized;
use docrow_type::{Result, diagnostic::argument, return_error};
use tracing::instrument;

use super::{Identity, Session, downcast};
use crate::entity::{EntityState, ManagedEntity};

impl Session {
	/// Loads the document of exactly type `T` stored under `key`.
	///
	/// Returns the tracked instance when the key is already tracked. A row
	/// of a subtype of `T` is an error; use [`Session::load_any`] for those.
	#[instrument(name = "session::load", level = "debug", skip_all)]
	pub fn load<T: Document>(&mut self, key: impl Into<DocumentKey>) -> Result<Option<Doc<T>>> {
		let key = key.into();
		let model = self.store.model().clone();
		let design = model.design_for::<T>()?;

		match self.lookup(design, key.clone())? {
			Some(document) if document.is::<T>() => downcast(&key, document).map(Some),
			Some(document) => {
				return_error!(argument::document_type_mismatch(&key, type_name::<T>(), document.type_name()))
			}
			None => Ok(None),
		}
	}

	/// Loads the document of type `T` or any of its subtypes stored under
	/// `key`.
	#[instrument(name = "session::load_any", level = "debug", skip_all)]
	pub fn load_any<T: Document>(&mut self, key: impl Into<DocumentKey>) -> Result<Option<AnyDocument>> {
		let model = self.store.model().clone();
		let design = model.design_for::<T>()?;
		self.lookup(design, key.into())
	}

	/// Runs `plan` against documents of exactly type `T`.
	///
	/// Documents deleted in this session are left out of the results and
	/// of both counts in the returned stats.
	pub fn query<T: Document>(&mut self, plan: &QueryPlan) -> Result<(Vec<Doc<T>>, QueryStats)> {
		let model = self.store.model().clone();
		let design = model.design_for::<T>()?;
		let (documents, stats) = self.query_documents(design, plan, false)?;
		let documents: Vec<Doc<T>> = documents.iter().filter_map(AnyDocument::downcast::<T>).collect();
		let stats = QueryStats {
			retrieved_results: documents.len(),
			..stats
		};
		Ok((documents, stats))
	}

	/// Runs `plan` against documents of type `T` and its subtypes.
	///
	/// Counts the same way as [`Session::query`].
	pub fn query_any<T: Document>(&mut self, plan: &QueryPlan) -> Result<(Vec<AnyDocument>, QueryStats)> {
		let model = self.store.model().clone();
		let design = model.design_for::<T>()?;
		self.query_documents(design, plan, true)
	}

	fn lookup(&mut self, design: &Design, key: DocumentKey) -> Result<Option<AnyDocument>> {
		let identity = (design.table().to_string(), key);
		if let Some(entity) = self.entities.get(&identity) {
			if entity.state == EntityState::Deleted {
				return Ok(None);
			}
			let tracked = self.store.model().design(entity.design);
			return Ok(design.is_same_or_ancestor_of(tracked.discriminator()).then(|| entity.document.clone()));
		}

		let Some(row) = self.store.get(design.table(), &identity.1)? else {
			return Ok(None);
		};
		if !design.is_same_or_ancestor_of(row.discriminator()?) {
			return Ok(None);
		}
		let materialized = self.store.materialize(design, row)?;
		self.track_loaded(materialized).map(Some)
	}

	#[instrument(name = "session::query", level = "debug", skip_all, fields(table = design.table()))]
	fn query_documents(
		&mut self,
		design: &Design,
		plan: &QueryPlan,
		include_descendants: bool,
	) -> Result<(Vec<AnyDocument>, QueryStats)> {
		let (rows, stats) = self.store.query(design, plan, include_descendants)?;

		let mut documents = Vec::with_capacity(rows.len());
		let mut deleted = 0;
		for row in rows {
			let identity: Identity = (design.table().to_string(), row.key()?);
			match self.entities.get(&identity) {
				Some(entity) if entity.state == EntityState::Deleted => deleted += 1,
				Some(entity) => documents.push(entity.document.clone()),
				None => {
					let materialized = self.store.materialize(design, row)?;
					documents.push(self.track_loaded(materialized)?);
				}
			}
		}

		let stats = QueryStats {
			total_results: stats.total_results.saturating_sub(deleted),
			retrieved_results: documents.len(),
			..stats
		};
		Ok((documents, stats))
	}

	fn track_loaded(&mut self, materialized: Materialized) -> Result<AnyDocument> {
		let model = self.store.model().clone();
		let design = model.design(materialized.design);
		let identity = (design.table().to_string(), materialized.key);
		if let Some(entity) = self.entities.get(&identity) {
			return Ok(entity.document.clone());
		}

		let snapshot = design.encode(&materialized.document, model.serializer())?;
		let entity = ManagedEntity::loaded(
			identity.0.clone(),
			identity.1.clone(),
			design.id(),
			materialized.document.clone(),
			materialized.etag,
			snapshot,
			materialized.metadata,
		);
		self.entities.insert(identity, entity);
		Ok(materialized.document)
	}
}
