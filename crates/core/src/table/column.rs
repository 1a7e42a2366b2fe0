// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_type::{Type, Value};

/// A physical column of a document table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
	pub name: String,
	pub ty: Type,
	pub nullable: bool,
	pub max_length: Option<usize>,
	pub primary_key: bool,
	default: Option<Value>,
}

impl Column {
	/// A non-nullable column of the given type.
	pub fn new(name: impl Into<String>, ty: Type) -> Self {
		Self {
			name: name.into(),
			ty,
			nullable: false,
			max_length: None,
			primary_key: false,
			default: None,
		}
	}

	pub fn nullable(mut self, nullable: bool) -> Self {
		self.nullable = nullable;
		self
	}

	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}

	pub fn with_default(mut self, default: Value) -> Self {
		self.default = Some(default);
		self
	}

	pub fn primary_key(mut self) -> Self {
		self.primary_key = true;
		self
	}

	/// The default written into rows that predate the column.
	///
	/// A non-nullable column without an explicit default falls back to the
	/// zero value of its type; a nullable one defaults to NULL.
	pub fn default_value(&self) -> Option<Value> {
		match &self.default {
			Some(value) => Some(value.clone()),
			None if self.nullable => None,
			None => Some(self.ty.zero_value()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_non_nullable_defaults_to_zero_value() {
		let column = Column::new("Property", Type::Utf8);
		assert_eq!(column.default_value(), Some(Value::Utf8(String::new())));
	}

	#[test]
	fn test_nullable_has_no_default() {
		let column = Column::new("Property", Type::Utf8).nullable(true);
		assert_eq!(column.default_value(), None);
	}

	#[test]
	fn test_explicit_default_wins() {
		let column = Column::new("Count", Type::Int4).with_default(Value::Int4(7));
		assert_eq!(column.default_value(), Some(Value::Int4(7)));
	}
}
