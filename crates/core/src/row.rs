// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_type::{DocumentKey, Etag, Result, Value, error, internal_error};
use indexmap::IndexMap;

use crate::{
	document::{Metadata, decode_metadata},
	table::system,
};

/// A row as read from or written to a document table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
	columns: IndexMap<String, Value>,
}

impl Row {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, column: &str) -> Option<&Value> {
		self.columns.get(column)
	}

	pub fn set(&mut self, column: impl Into<String>, value: Value) {
		self.columns.insert(column.into(), value);
	}

	pub fn remove(&mut self, column: &str) -> Option<Value> {
		self.columns.shift_remove(column)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.columns.iter()
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	pub fn key(&self) -> Result<DocumentKey> {
		self.required(system::ID)?
			.as_str()
			.map(DocumentKey::from)
			.ok_or_else(|| error!(internal_error!("row key is not text")))
	}

	pub fn etag(&self) -> Result<Etag> {
		self.required(system::ETAG)?.as_uuid().map(Etag).ok_or_else(|| error!(internal_error!("row etag is not a uuid")))
	}

	pub fn document(&self) -> Result<&[u8]> {
		self.required(system::DOCUMENT)?.as_blob().ok_or_else(|| error!(internal_error!("row document is not a blob")))
	}

	pub fn set_document(&mut self, bytes: Vec<u8>) {
		self.set(system::DOCUMENT, Value::Blob(bytes));
	}

	pub fn discriminator(&self) -> Result<&str> {
		self.required(system::DISCRIMINATOR)?
			.as_str()
			.ok_or_else(|| error!(internal_error!("row discriminator is not text")))
	}

	/// Rows written before versioning existed count as version 0.
	pub fn version(&self) -> i64 {
		self.get(system::VERSION).and_then(Value::as_i64).unwrap_or(0)
	}

	pub fn awaits_reprojection(&self) -> bool {
		self.get(system::AWAITS_REPROJECTION).and_then(Value::as_bool).unwrap_or(false)
	}

	pub fn metadata(&self) -> Result<Metadata> {
		match self.get(system::METADATA) {
			Some(Value::Blob(bytes)) => decode_metadata(bytes),
			_ => Ok(Metadata::new()),
		}
	}

	fn required(&self, column: &str) -> Result<&Value> {
		self.columns.get(column).ok_or_else(|| error!(internal_error!("row is missing column `{}`", column)))
	}
}

impl FromIterator<(String, Value)> for Row {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self {
			columns: iter.into_iter().collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_system_accessors() {
		let etag = Etag::generate();
		let mut row = Row::new();
		row.set(system::ID, Value::Utf8("a".into()));
		row.set(system::ETAG, Value::Utf8(etag.to_string()));
		row.set(system::DOCUMENT, Value::Blob(b"{}".to_vec()));
		row.set(system::DISCRIMINATOR, Value::Utf8("Entity".into()));
		row.set(system::VERSION, Value::Int8(2));
		row.set(system::AWAITS_REPROJECTION, Value::Int8(1));

		assert_eq!(row.key().unwrap().as_str(), "a");
		assert_eq!(row.etag().unwrap(), etag);
		assert_eq!(row.document().unwrap(), b"{}");
		assert_eq!(row.discriminator().unwrap(), "Entity");
		assert_eq!(row.version(), 2);
		assert!(row.awaits_reprojection());
	}

	#[test]
	fn test_missing_values_default() {
		let row = Row::new();
		assert_eq!(row.version(), 0);
		assert!(!row.awaits_reprojection());
		assert!(row.metadata().unwrap().is_empty());
		assert_eq!(row.key().unwrap_err().code, "INTERNAL_ERROR");
	}
}
