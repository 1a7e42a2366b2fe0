// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_type::{Result, Type, diagnostic::configuration, return_error};
use indexmap::IndexMap;

mod column;

pub use column::Column;

/// Names of the columns every document table carries.
pub mod system {
	pub const ID: &str = "Id";
	pub const ETAG: &str = "Etag";
	pub const CREATED_AT: &str = "CreatedAt";
	pub const MODIFIED_AT: &str = "ModifiedAt";
	pub const DOCUMENT: &str = "Document";
	pub const METADATA: &str = "Metadata";
	pub const DISCRIMINATOR: &str = "Discriminator";
	pub const AWAITS_REPROJECTION: &str = "AwaitsReprojection";
	pub const VERSION: &str = "Version";

	pub const ALL: [&str; 9] =
		[ID, ETAG, CREATED_AT, MODIFIED_AT, DOCUMENT, METADATA, DISCRIMINATOR, AWAITS_REPROJECTION, VERSION];

	pub fn is_system_column(name: &str) -> bool {
		ALL.iter().any(|column| column.eq_ignore_ascii_case(name))
	}
}

const KEY_MAX_LENGTH: usize = 1024;

/// A named table with an ordered set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
	name: String,
	columns: IndexMap<String, Column>,
}

impl Table {
	/// A bare table without any columns.
	pub fn new(name: impl Into<String>) -> Result<Self> {
		let name = name.into();
		validate_name(&name)?;
		Ok(Self {
			name,
			columns: IndexMap::new(),
		})
	}

	/// A document table carrying all system columns.
	pub fn document(name: impl Into<String>) -> Result<Self> {
		let mut table = Self::new(name)?;
		for column in [
			Column::new(system::ID, Type::Utf8).with_max_length(KEY_MAX_LENGTH).primary_key(),
			Column::new(system::ETAG, Type::Uuid),
			Column::new(system::CREATED_AT, Type::DateTime),
			Column::new(system::MODIFIED_AT, Type::DateTime),
			Column::new(system::DOCUMENT, Type::Blob),
			Column::new(system::METADATA, Type::Blob).nullable(true),
			Column::new(system::DISCRIMINATOR, Type::Utf8).with_max_length(KEY_MAX_LENGTH),
			Column::new(system::AWAITS_REPROJECTION, Type::Boolean),
			Column::new(system::VERSION, Type::Int4),
		] {
			table.add_column(column)?;
		}
		Ok(table)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn columns(&self) -> impl Iterator<Item = &Column> {
		self.columns.values()
	}

	pub fn column(&self, name: &str) -> Option<&Column> {
		self.columns.get(name)
	}

	pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
		self.columns.get_mut(name)
	}

	pub fn add_column(&mut self, column: Column) -> Result<()> {
		if self.columns.contains_key(&column.name) {
			return_error!(configuration::duplicate_column(&self.name, &column.name));
		}
		self.columns.insert(column.name.clone(), column);
		Ok(())
	}

	pub fn primary_key(&self) -> Result<&Column> {
		let mut keys = self.columns.values().filter(|c| c.primary_key);
		match (keys.next(), keys.count()) {
			(Some(column), 0) => Ok(column),
			(None, _) => return_error!(configuration::invalid_primary_key(&self.name, 0)),
			(Some(_), rest) => return_error!(configuration::invalid_primary_key(&self.name, rest + 1)),
		}
	}
}

fn validate_name(name: &str) -> Result<()> {
	if name.is_empty() {
		return_error!(configuration::invalid_table_name(name, "name must not be empty"));
	}
	if name.ends_with('_') {
		return_error!(configuration::invalid_table_name(name, "names ending with `_` are reserved"));
	}
	if name.contains('"') {
		return_error!(configuration::invalid_table_name(name, "name must not contain quotes"));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use docrow_type::ErrorKind;

	use super::*;

	#[test]
	fn test_document_table_has_system_columns() {
		let table = Table::document("Entities").unwrap();
		let names: Vec<_> = table.columns().map(|c| c.name.as_str()).collect();
		assert_eq!(names, system::ALL.to_vec());
		assert_eq!(table.primary_key().unwrap().name, system::ID);
	}

	#[test]
	fn test_trailing_underscore_rejected() {
		let err = Table::new("Entities_").unwrap_err();
		assert_eq!(err.code, "CONFIG_006");
		assert_eq!(err.kind(), ErrorKind::Configuration);
	}

	#[test]
	fn test_duplicate_column_rejected() {
		let mut table = Table::document("Entities").unwrap();
		let err = table.add_column(Column::new("Etag", Type::Utf8)).unwrap_err();
		assert_eq!(err.code, "CONFIG_005");
	}

	#[test]
	fn test_table_without_key() {
		let table = Table::new("Plain").unwrap();
		assert_eq!(table.primary_key().unwrap_err().code, "CONFIG_011");
	}

	#[test]
	fn test_is_system_column_ignores_case() {
		assert!(system::is_system_column("etag"));
		assert!(!system::is_system_column("Property"));
	}
}
