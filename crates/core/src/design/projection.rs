// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	any::{Any, type_name},
	fmt::{Debug, Formatter},
	sync::Arc,
};

use docrow_type::{DocumentKey, IntoColumnValue, Result, Type, Value, error, internal_error};

use crate::document::Metadata;

type ProjectionFn = dyn Fn(&dyn Any, &Metadata) -> Result<Value> + Send + Sync;
type KeyFn = dyn Fn(&dyn Any) -> Result<Option<DocumentKey>> + Send + Sync;

/// Maps a subtype document to the parent part it embeds.
pub(crate) type Upcast = dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync;

pub(crate) fn upcast<C, P, F>(accessor: F) -> Arc<Upcast>
where
	C: 'static,
	P: 'static,
	F: for<'a> Fn(&'a C) -> &'a P + Send + Sync + 'static,
{
	Arc::new(erase(move |document: &dyn Any| document.downcast_ref::<C>().map(|child| accessor(child) as &dyn Any)))
}

fn erase<F>(f: F) -> F
where
	F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any>,
{
	f
}

/// Computes the value of one column from a document and its metadata.
#[derive(Clone)]
pub struct Projection {
	ty: Type,
	nullable: bool,
	func: Arc<ProjectionFn>,
}

impl Projection {
	pub(crate) fn of<T, R, F>(f: F) -> Self
	where
		T: 'static,
		R: IntoColumnValue,
		F: Fn(&T, &Metadata) -> R + Send + Sync + 'static,
	{
		Self {
			ty: R::TYPE,
			nullable: R::NULLABLE,
			func: Arc::new(move |document: &dyn Any, metadata: &Metadata| {
				let document = document.downcast_ref::<T>().ok_or_else(|| {
					error!(internal_error!("projection over `{}` applied to another type", type_name::<T>()))
				})?;
				Ok(f(document, metadata).into_value())
			}),
		}
	}

	pub(crate) fn constant(value: Value) -> Self {
		Self {
			ty: value.get_type().unwrap_or(Type::Utf8),
			nullable: false,
			func: Arc::new(move |_: &dyn Any, _: &Metadata| Ok(value.clone())),
		}
	}

	/// The same projection applied to the parent part of a subtype document.
	pub(crate) fn through(&self, upcast: Arc<Upcast>) -> Self {
		let inner = self.func.clone();
		Self {
			ty: self.ty,
			nullable: self.nullable,
			func: Arc::new(move |document: &dyn Any, metadata: &Metadata| match upcast(document) {
				Some(parent) => inner(parent, metadata),
				None => Err(error!(internal_error!("subtype projection applied to an unrelated document"))),
			}),
		}
	}

	pub fn ty(&self) -> Type {
		self.ty
	}

	pub fn is_nullable(&self) -> bool {
		self.nullable
	}

	pub fn evaluate(&self, document: &dyn Any, metadata: &Metadata) -> Result<Value> {
		(self.func)(document, metadata)
	}
}

impl Debug for Projection {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Projection").field("ty", &self.ty).field("nullable", &self.nullable).finish()
	}
}

/// Extracts the key of a document.
#[derive(Clone)]
pub(crate) struct KeyProjection(Arc<KeyFn>);

impl KeyProjection {
	pub(crate) fn of<T, K, F>(f: F) -> Self
	where
		T: 'static,
		K: Into<DocumentKey>,
		F: Fn(&T) -> K + Send + Sync + 'static,
	{
		Self(Arc::new(move |document: &dyn Any| Ok(document.downcast_ref::<T>().map(|d| f(d).into()))))
	}

	pub(crate) fn through(&self, upcast: Arc<Upcast>) -> Self {
		let inner = self.0.clone();
		Self(Arc::new(move |document: &dyn Any| match upcast(document) {
			Some(parent) => inner(parent),
			None => Ok(None),
		}))
	}

	pub(crate) fn resolve(&self, document: &dyn Any) -> Result<Option<DocumentKey>> {
		(self.0)(document)
	}
}
