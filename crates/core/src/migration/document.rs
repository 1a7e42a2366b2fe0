// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::any::TypeId;

use docrow_type::Result;

use crate::{design::Design, document::Document, row::Row, serializer::Serializer};

/// Rewrites stored rows from one version to the next.
pub trait DocumentMigration: Send + Sync {
	fn applies_to(&self, design: &Design) -> bool;

	fn migrate(&self, serializer: &dyn Serializer, row: &mut Row) -> Result<()>;
}

/// Selects the designs a document migration runs for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFilter {
	All,
	Table(String),
	Discriminator(String),
	Type(TypeId),
}

impl DocumentFilter {
	pub fn of<T: Document>() -> Self {
		DocumentFilter::Type(TypeId::of::<T>())
	}

	pub fn matches(&self, design: &Design) -> bool {
		match self {
			DocumentFilter::All => true,
			DocumentFilter::Table(table) => design.table() == table,
			DocumentFilter::Discriminator(discriminator) => design.discriminator() == discriminator,
			DocumentFilter::Type(type_id) => design.type_id() == *type_id,
		}
	}
}

/// Rewrites the raw document bytes.
pub struct ChangeDocument<F> {
	filter: DocumentFilter,
	change: F,
}

impl<F> ChangeDocument<F>
where
	F: Fn(&dyn Serializer, &[u8]) -> Result<Vec<u8>> + Send + Sync,
{
	pub fn new(filter: DocumentFilter, change: F) -> Self {
		Self {
			filter,
			change,
		}
	}
}

impl<F> DocumentMigration for ChangeDocument<F>
where
	F: Fn(&dyn Serializer, &[u8]) -> Result<Vec<u8>> + Send + Sync,
{
	fn applies_to(&self, design: &Design) -> bool {
		self.filter.matches(design)
	}

	fn migrate(&self, serializer: &dyn Serializer, row: &mut Row) -> Result<()> {
		let changed = (self.change)(serializer, row.document()?)?;
		row.set_document(changed);
		Ok(())
	}
}

/// Rewrites the document as a JSON tree.
pub struct ChangeDocumentJson<F> {
	filter: DocumentFilter,
	change: F,
}

impl<F> ChangeDocumentJson<F>
where
	F: Fn(&mut serde_json::Value) -> Result<()> + Send + Sync,
{
	pub fn new(filter: DocumentFilter, change: F) -> Self {
		Self {
			filter,
			change,
		}
	}
}

impl<F> DocumentMigration for ChangeDocumentJson<F>
where
	F: Fn(&mut serde_json::Value) -> Result<()> + Send + Sync,
{
	fn applies_to(&self, design: &Design) -> bool {
		self.filter.matches(design)
	}

	fn migrate(&self, serializer: &dyn Serializer, row: &mut Row) -> Result<()> {
		let mut document = serializer.deserialize(row.document()?)?;
		(self.change)(&mut document)?;
		row.set_document(serializer.serialize(&document)?);
		Ok(())
	}
}

/// Rewrites any columns of the row, including the document.
pub struct ChangeColumns<F> {
	filter: DocumentFilter,
	change: F,
}

impl<F> ChangeColumns<F>
where
	F: Fn(&mut Row) -> Result<()> + Send + Sync,
{
	pub fn new(filter: DocumentFilter, change: F) -> Self {
		Self {
			filter,
			change,
		}
	}
}

impl<F> DocumentMigration for ChangeColumns<F>
where
	F: Fn(&mut Row) -> Result<()> + Send + Sync,
{
	fn applies_to(&self, design: &Design) -> bool {
		self.filter.matches(design)
	}

	fn migrate(&self, _serializer: &dyn Serializer, row: &mut Row) -> Result<()> {
		(self.change)(row)
	}
}
