// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Conversions between docrow values and SQLite storage classes.

use chrono::{DateTime, SecondsFormat, Utc};
use docrow_type::{Result, Type, Value, diagnostic::serialization, error};
use rusqlite::types::{Value as SqlValue, ValueRef};
use uuid::Uuid;

pub(crate) fn sql_type(ty: Type) -> &'static str {
	match ty {
		Type::Boolean | Type::Int4 | Type::Int8 => "INTEGER",
		Type::Float8 => "REAL",
		Type::Utf8 | Type::Uuid | Type::DateTime => "TEXT",
		Type::Blob => "BLOB",
	}
}

pub(crate) fn to_sql(value: &Value) -> SqlValue {
	match value {
		Value::Undefined => SqlValue::Null,
		Value::Boolean(v) => SqlValue::Integer(*v as i64),
		Value::Int4(v) => SqlValue::Integer(*v as i64),
		Value::Int8(v) => SqlValue::Integer(*v),
		Value::Float8(v) => SqlValue::Real(*v),
		Value::Utf8(v) => SqlValue::Text(v.clone()),
		Value::Blob(v) => SqlValue::Blob(v.clone()),
		Value::Uuid(v) => SqlValue::Text(v.hyphenated().to_string()),
		Value::DateTime(v) => SqlValue::Text(format_datetime(v)),
	}
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn format_datetime(value: &DateTime<Utc>) -> String {
	value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Reads a column, interpreting it as `ty` when the column type is known.
pub(crate) fn from_sql(raw: ValueRef<'_>, ty: Option<Type>) -> Result<Value> {
	let value = match (raw, ty) {
		(ValueRef::Null, _) => Value::Undefined,
		(ValueRef::Integer(v), Some(Type::Boolean)) => Value::Boolean(v != 0),
		(ValueRef::Integer(v), Some(Type::Int4)) => match i32::try_from(v) {
			Ok(v) => Value::Int4(v),
			Err(_) => Value::Int8(v),
		},
		(ValueRef::Integer(v), Some(Type::Float8)) => Value::Float8(v as f64),
		(ValueRef::Integer(v), _) => Value::Int8(v),
		(ValueRef::Real(v), _) => Value::Float8(v),
		(ValueRef::Text(bytes), ty) => {
			let text = std::str::from_utf8(bytes)
				.map_err(|e| error!(serialization::deserialize_failed("TEXT", e.to_string())))?;
			match ty {
				Some(Type::Uuid) => Uuid::parse_str(text)
					.map(Value::Uuid)
					.map_err(|e| error!(serialization::deserialize_failed("UUID", e.to_string())))?,
				Some(Type::DateTime) => DateTime::parse_from_rfc3339(text)
					.map(|v| Value::DateTime(v.with_timezone(&Utc)))
					.map_err(|e| error!(serialization::deserialize_failed("DATETIME", e.to_string())))?,
				_ => Value::Utf8(text.to_string()),
			}
		}
		(ValueRef::Blob(bytes), _) => Value::Blob(bytes.to_vec()),
	};
	Ok(value)
}

/// Renders a value as a SQL literal for `DEFAULT` clauses.
pub(crate) fn sql_literal(value: &Value) -> String {
	match to_sql(value) {
		SqlValue::Null => "NULL".to_string(),
		SqlValue::Integer(v) => v.to_string(),
		SqlValue::Real(v) => format!("{:?}", v),
		SqlValue::Text(v) => format!("'{}'", v.replace('\'', "''")),
		SqlValue::Blob(v) => format!("X'{}'", v.iter().map(|b| format!("{:02X}", b)).collect::<String>()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_uuid_and_datetime_are_text() {
		let uuid = Uuid::new_v4();
		assert_eq!(to_sql(&Value::Uuid(uuid)), SqlValue::Text(uuid.to_string()));

		let epoch = Value::DateTime(DateTime::<Utc>::UNIX_EPOCH);
		assert_eq!(to_sql(&epoch), SqlValue::Text("1970-01-01T00:00:00.000000Z".into()));
	}

	#[test]
	fn test_read_with_declared_type() {
		assert_eq!(from_sql(ValueRef::Integer(1), Some(Type::Boolean)).unwrap(), Value::Boolean(true));
		assert_eq!(from_sql(ValueRef::Integer(7), Some(Type::Int4)).unwrap(), Value::Int4(7));
		assert_eq!(from_sql(ValueRef::Integer(7), None).unwrap(), Value::Int8(7));
		assert_eq!(from_sql(ValueRef::Null, Some(Type::Utf8)).unwrap(), Value::Undefined);

		let uuid = Uuid::new_v4();
		let text = uuid.to_string();
		assert_eq!(from_sql(ValueRef::Text(text.as_bytes()), Some(Type::Uuid)).unwrap(), Value::Uuid(uuid));
	}

	#[test]
	fn test_datetime_roundtrip() {
		let now = Utc::now();
		let text = format_datetime(&now);
		let Value::DateTime(read) = from_sql(ValueRef::Text(text.as_bytes()), Some(Type::DateTime)).unwrap() else {
			panic!("expected a datetime");
		};
		assert_eq!(read.timestamp_micros(), now.timestamp_micros());
	}

	#[test]
	fn test_bad_uuid_is_rejected() {
		let err = from_sql(ValueRef::Text(b"nope"), Some(Type::Uuid)).unwrap_err();
		assert_eq!(err.code, "SERDE_002");
	}

	#[test]
	fn test_literals() {
		assert_eq!(sql_literal(&Value::Utf8("it's".into())), "'it''s'");
		assert_eq!(sql_literal(&Value::Boolean(false)), "0");
		assert_eq!(sql_literal(&Value::Blob(vec![0xab, 0x01])), "X'AB01'");
		assert_eq!(sql_literal(&Value::Float8(0.0)), "0.0");
	}
}
