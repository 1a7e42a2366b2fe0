// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Type, Value};

/// A Rust type that a projection may return.
///
/// The column type and nullability are known statically so that a projection
/// can be checked against its column when it is registered, not when the
/// first document is written.
pub trait IntoColumnValue {
	const TYPE: Type;
	const NULLABLE: bool = false;

	fn into_value(self) -> Value;
}

macro_rules! impl_into_column_value {
	($ty:ty, $kind:expr, $variant:ident) => {
		impl IntoColumnValue for $ty {
			const TYPE: Type = $kind;

			fn into_value(self) -> Value {
				Value::$variant(self.into())
			}
		}
	};
}

impl_into_column_value!(bool, Type::Boolean, Boolean);
impl_into_column_value!(i8, Type::Int4, Int4);
impl_into_column_value!(i16, Type::Int4, Int4);
impl_into_column_value!(i32, Type::Int4, Int4);
impl_into_column_value!(u8, Type::Int4, Int4);
impl_into_column_value!(u16, Type::Int4, Int4);
impl_into_column_value!(i64, Type::Int8, Int8);
impl_into_column_value!(u32, Type::Int8, Int8);
impl_into_column_value!(f32, Type::Float8, Float8);
impl_into_column_value!(f64, Type::Float8, Float8);
impl_into_column_value!(String, Type::Utf8, Utf8);
impl_into_column_value!(&str, Type::Utf8, Utf8);
impl_into_column_value!(Vec<u8>, Type::Blob, Blob);
impl_into_column_value!(Uuid, Type::Uuid, Uuid);
impl_into_column_value!(DateTime<Utc>, Type::DateTime, DateTime);

impl<T: IntoColumnValue> IntoColumnValue for Option<T> {
	const TYPE: Type = T::TYPE;
	const NULLABLE: bool = true;

	fn into_value(self) -> Value {
		match self {
			Some(value) => value.into_value(),
			None => Value::Undefined,
		}
	}
}
