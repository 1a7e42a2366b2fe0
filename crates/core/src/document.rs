// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	any::{Any, TypeId, type_name},
	collections::BTreeMap,
	fmt::{Debug, Formatter},
	marker::PhantomData,
	sync::Arc,
};

use docrow_type::{Result, diagnostic::serialization, error, internal_error};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Serialize, de::DeserializeOwned};

/// Out-of-band key/value data stored next to a document.
pub type Metadata = BTreeMap<String, Vec<String>>;

/// Anything that can be stored as a document.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Document for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// A shared handle to a tracked document.
///
/// Two handles for the same key within one session point to the same
/// allocation, which is what `ptr_eq` observes.
pub struct Doc<T>(Arc<RwLock<T>>);

impl<T> Doc<T> {
	pub fn new(document: T) -> Self {
		Self(Arc::new(RwLock::new(document)))
	}

	pub fn read(&self) -> RwLockReadGuard<'_, T> {
		self.0.read()
	}

	pub fn write(&self) -> RwLockWriteGuard<'_, T> {
		self.0.write()
	}

	pub fn ptr_eq(&self, other: &Doc<T>) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl<T> Clone for Doc<T> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}

impl<T> From<T> for Doc<T> {
	fn from(document: T) -> Self {
		Self::new(document)
	}
}

impl<T: Debug> Debug for Doc<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("Doc").field(&*self.0.read()).finish()
	}
}

/// A document handle with its concrete type erased.
#[derive(Clone)]
pub struct AnyDocument {
	cell: Arc<dyn Any + Send + Sync>,
	type_id: TypeId,
	type_name: &'static str,
}

impl AnyDocument {
	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub fn is<T: Document>(&self) -> bool {
		self.type_id == TypeId::of::<T>()
	}

	/// Recovers the typed handle, sharing the same allocation.
	pub fn downcast<T: Document>(&self) -> Option<Doc<T>> {
		self.cell.clone().downcast::<RwLock<T>>().ok().map(Doc)
	}

	pub fn ptr_eq(&self, other: &AnyDocument) -> bool {
		std::ptr::addr_eq(Arc::as_ptr(&self.cell), Arc::as_ptr(&other.cell))
	}
}

impl<T: Document> From<Doc<T>> for AnyDocument {
	fn from(doc: Doc<T>) -> Self {
		Self {
			cell: doc.0,
			type_id: TypeId::of::<T>(),
			type_name: type_name::<T>(),
		}
	}
}

impl<T: Document> From<&Doc<T>> for AnyDocument {
	fn from(doc: &Doc<T>) -> Self {
		doc.clone().into()
	}
}

impl Debug for AnyDocument {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AnyDocument").field("type", &self.type_name).finish_non_exhaustive()
	}
}

/// Type-erased access to the documents of one design.
pub trait DocumentCodec: Send + Sync {
	fn type_id(&self) -> TypeId;

	fn type_name(&self) -> &'static str;

	fn to_json(&self, document: &AnyDocument) -> Result<serde_json::Value>;

	fn from_json(&self, value: serde_json::Value) -> Result<AnyDocument>;

	/// Calls `f` with a reference to the document's concrete value.
	fn inspect(&self, document: &AnyDocument, f: &mut dyn FnMut(&dyn Any) -> Result<()>) -> Result<()>;
}

pub(crate) struct TypedCodec<T>(PhantomData<fn() -> T>);

impl<T: Document> TypedCodec<T> {
	pub(crate) fn new() -> Self {
		Self(PhantomData)
	}

	fn typed(&self, document: &AnyDocument) -> Result<Doc<T>> {
		document.downcast::<T>().ok_or_else(|| {
			error!(internal_error!(
				"document of type `{}` handed to the codec of `{}`",
				document.type_name(),
				type_name::<T>()
			))
		})
	}
}

impl<T: Document> DocumentCodec for TypedCodec<T> {
	fn type_id(&self) -> TypeId {
		TypeId::of::<T>()
	}

	fn type_name(&self) -> &'static str {
		type_name::<T>()
	}

	fn to_json(&self, document: &AnyDocument) -> Result<serde_json::Value> {
		let doc = self.typed(document)?;
		let guard = doc.read();
		serde_json::to_value(&*guard)
			.map_err(|e| error!(serialization::serialize_failed(type_name::<T>(), e.to_string())))
	}

	fn from_json(&self, value: serde_json::Value) -> Result<AnyDocument> {
		let document: T = serde_json::from_value(value)
			.map_err(|e| error!(serialization::deserialize_failed(type_name::<T>(), e.to_string())))?;
		Ok(Doc::new(document).into())
	}

	fn inspect(&self, document: &AnyDocument, f: &mut dyn FnMut(&dyn Any) -> Result<()>) -> Result<()> {
		let doc = self.typed(document)?;
		let guard = doc.read();
		f(&*guard)
	}
}

pub fn encode_metadata(metadata: &Metadata) -> Result<Vec<u8>> {
	serde_json::to_vec(metadata).map_err(|e| error!(serialization::serialize_failed("metadata", e.to_string())))
}

pub fn decode_metadata(bytes: &[u8]) -> Result<Metadata> {
	serde_json::from_slice(bytes).map_err(|e| error!(serialization::deserialize_failed("metadata", e.to_string())))
}
