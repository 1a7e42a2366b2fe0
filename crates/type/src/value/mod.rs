// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod into;
mod r#type;

pub use into::IntoColumnValue;
pub use r#type::Type;

/// A column value, represented as a native Rust type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// Value is not defined (think null in common programming languages)
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// A 4-byte signed integer
	Int4(i32),
	/// An 8-byte signed integer
	Int8(i64),
	/// An 8-byte floating point
	Float8(f64),
	/// A UTF-8 encoded text
	Utf8(String),
	/// A binary large object
	Blob(Vec<u8>),
	/// A UUID of any version
	Uuid(Uuid),
	/// A point in time, in UTC
	DateTime(DateTime<Utc>),
}

impl Value {
	pub fn get_type(&self) -> Option<Type> {
		match self {
			Value::Undefined => None,
			Value::Boolean(_) => Some(Type::Boolean),
			Value::Int4(_) => Some(Type::Int4),
			Value::Int8(_) => Some(Type::Int8),
			Value::Float8(_) => Some(Type::Float8),
			Value::Utf8(_) => Some(Type::Utf8),
			Value::Blob(_) => Some(Type::Blob),
			Value::Uuid(_) => Some(Type::Uuid),
			Value::DateTime(_) => Some(Type::DateTime),
		}
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Utf8(s) => Some(s.as_str()),
			_ => None,
		}
	}

	pub fn as_blob(&self) -> Option<&[u8]> {
		match self {
			Value::Blob(b) => Some(b.as_slice()),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Boolean(b) => Some(*b),
			Value::Int4(v) => Some(*v != 0),
			Value::Int8(v) => Some(*v != 0),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int4(v) => Some(*v as i64),
			Value::Int8(v) => Some(*v),
			Value::Boolean(v) => Some(*v as i64),
			_ => None,
		}
	}

	pub fn as_uuid(&self) -> Option<Uuid> {
		match self {
			Value::Uuid(v) => Some(*v),
			Value::Utf8(s) => Uuid::parse_str(s).ok(),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Undefined => f.write_str("undefined"),
			Value::Boolean(v) => Display::fmt(v, f),
			Value::Int4(v) => Display::fmt(v, f),
			Value::Int8(v) => Display::fmt(v, f),
			Value::Float8(v) => Display::fmt(v, f),
			Value::Utf8(v) => Display::fmt(v, f),
			Value::Blob(v) => write!(f, "0x{}", v.iter().map(|b| format!("{:02x}", b)).collect::<String>()),
			Value::Uuid(v) => Display::fmt(v, f),
			Value::DateTime(v) => f.write_str(&v.to_rfc3339()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_get_type() {
		assert_eq!(Value::Undefined.get_type(), None);
		assert_eq!(Value::Utf8("a".into()).get_type(), Some(Type::Utf8));
		assert_eq!(Value::Int8(1).get_type(), Some(Type::Int8));
	}

	#[test]
	fn test_as_bool_accepts_integers() {
		assert_eq!(Value::Int8(1).as_bool(), Some(true));
		assert_eq!(Value::Int4(0).as_bool(), Some(false));
		assert_eq!(Value::Utf8("true".into()).as_bool(), None);
	}

	#[test]
	fn test_display_blob() {
		assert_eq!(Value::Blob(vec![0xde, 0xad]).to_string(), "0xdead");
	}
}
