// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	any::TypeId,
	fmt::{Debug, Formatter},
	sync::Arc,
};

use docrow_type::{DocumentKey, Result, Value};
use indexmap::IndexMap;

mod configuration;
mod mapper;
mod model;
mod projection;

pub use configuration::{Configuration, DesignBuilder};
pub use mapper::{CachedTypeMapper, FullNameTypeMapper, ShortNameTypeMapper, TypeMapper};
pub use model::DocumentModel;
pub(crate) use projection::KeyProjection;
pub use projection::Projection;

use crate::{
	document::{AnyDocument, DocumentCodec, Metadata},
	serializer::Serializer,
};

/// Index of a design inside its [`DocumentModel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DesignId(pub(crate) usize);

/// How one document type maps onto its table.
pub struct Design {
	pub(crate) id: DesignId,
	pub(crate) table: String,
	pub(crate) discriminator: String,
	pub(crate) parent: Option<DesignId>,
	pub(crate) projections: IndexMap<String, Projection>,
	pub(crate) key: Option<KeyProjection>,
	pub(crate) codec: Arc<dyn DocumentCodec>,
	pub(crate) descendants_and_self: IndexMap<String, DesignId>,
}

impl Design {
	pub fn id(&self) -> DesignId {
		self.id
	}

	pub fn table(&self) -> &str {
		&self.table
	}

	pub fn discriminator(&self) -> &str {
		&self.discriminator
	}

	pub fn parent(&self) -> Option<DesignId> {
		self.parent
	}

	pub fn type_id(&self) -> TypeId {
		self.codec.type_id()
	}

	pub fn type_name(&self) -> &'static str {
		self.codec.type_name()
	}

	/// Every column this design writes, including inherited ones and the
	/// discriminator.
	pub fn projections(&self) -> &IndexMap<String, Projection> {
		&self.projections
	}

	/// Discriminators of this design and all its subtypes.
	pub fn descendants_and_self(&self) -> &IndexMap<String, DesignId> {
		&self.descendants_and_self
	}

	pub fn is_same_or_ancestor_of(&self, discriminator: &str) -> bool {
		self.descendants_and_self.contains_key(discriminator)
	}

	/// Evaluates all projections against the document.
	pub fn project(&self, document: &AnyDocument, metadata: &Metadata) -> Result<IndexMap<String, Value>> {
		let mut result = IndexMap::with_capacity(self.projections.len());
		self.codec.inspect(document, &mut |concrete| {
			for (column, projection) in &self.projections {
				result.insert(column.clone(), projection.evaluate(concrete, metadata)?);
			}
			Ok(())
		})?;
		Ok(result)
	}

	/// The key from the design's key projection, if it has one.
	pub fn key_of(&self, document: &AnyDocument) -> Result<Option<DocumentKey>> {
		let Some(key) = &self.key else {
			return Ok(None);
		};
		let mut result = None;
		self.codec.inspect(document, &mut |concrete| {
			result = key.resolve(concrete)?;
			Ok(())
		})?;
		Ok(result)
	}

	pub fn has_key_projection(&self) -> bool {
		self.key.is_some()
	}

	pub fn encode(&self, document: &AnyDocument, serializer: &dyn Serializer) -> Result<Vec<u8>> {
		serializer.serialize(&self.codec.to_json(document)?)
	}

	pub fn decode(&self, bytes: &[u8], serializer: &dyn Serializer) -> Result<AnyDocument> {
		self.codec.from_json(serializer.deserialize(bytes)?)
	}

	/// The document as a JSON tree, used for dirty checking.
	pub fn to_json(&self, document: &AnyDocument) -> Result<serde_json::Value> {
		self.codec.to_json(document)
	}
}

impl Debug for Design {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Design")
			.field("type", &self.type_name())
			.field("table", &self.table)
			.field("discriminator", &self.discriminator)
			.field("parent", &self.parent)
			.field("columns", &self.projections.keys().collect::<Vec<_>>())
			.finish()
	}
}
