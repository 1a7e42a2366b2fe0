// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Value;

/// The semantic type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
	Boolean,
	Int4,
	Int8,
	Float8,
	Utf8,
	Blob,
	Uuid,
	DateTime,
}

impl Type {
	/// The value a non-nullable column gets when no default is declared, so
	/// that rows written before the column existed stay valid.
	pub fn zero_value(&self) -> Value {
		match self {
			Type::Boolean => Value::Boolean(false),
			Type::Int4 => Value::Int4(0),
			Type::Int8 => Value::Int8(0),
			Type::Float8 => Value::Float8(0.0),
			Type::Utf8 => Value::Utf8(String::new()),
			Type::Blob => Value::Blob(vec![]),
			Type::Uuid => Value::Uuid(Uuid::nil()),
			Type::DateTime => Value::DateTime(DateTime::<Utc>::UNIX_EPOCH),
		}
	}

	/// Whether values of `other` can be stored in a column of this type.
	pub fn is_assignable_from(&self, other: Type) -> bool {
		match (self, other) {
			(a, b) if *a == b => true,
			(Type::Int8, Type::Int4) => true,
			(Type::Float8, Type::Int4) => true,
			_ => false,
		}
	}

	/// Widens a value of an assignable type into this type.
	pub fn coerce(&self, value: Value) -> Value {
		match (self, value) {
			(Type::Int8, Value::Int4(v)) => Value::Int8(v as i64),
			(Type::Float8, Value::Int4(v)) => Value::Float8(v as f64),
			(_, value) => value,
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Boolean => f.write_str("BOOLEAN"),
			Type::Int4 => f.write_str("INT4"),
			Type::Int8 => f.write_str("INT8"),
			Type::Float8 => f.write_str("FLOAT8"),
			Type::Utf8 => f.write_str("UTF8"),
			Type::Blob => f.write_str("BLOB"),
			Type::Uuid => f.write_str("UUID"),
			Type::DateTime => f.write_str("DATETIME"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_zero_value_for_text_is_empty_string() {
		assert_eq!(Type::Utf8.zero_value(), Value::Utf8(String::new()));
		assert_eq!(Type::Int4.zero_value(), Value::Int4(0));
		assert_eq!(Type::Boolean.zero_value(), Value::Boolean(false));
	}

	#[test]
	fn test_assignability() {
		assert!(Type::Utf8.is_assignable_from(Type::Utf8));
		assert!(Type::Int8.is_assignable_from(Type::Int4));
		assert!(!Type::Int4.is_assignable_from(Type::Int8));
		assert!(!Type::Utf8.is_assignable_from(Type::Int4));
	}

	#[test]
	fn test_coerce_widens() {
		assert_eq!(Type::Int8.coerce(Value::Int4(7)), Value::Int8(7));
		assert_eq!(Type::Utf8.coerce(Value::Utf8("x".into())), Value::Utf8("x".into()));
	}
}
