// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_type::{Result, diagnostic::serialization, error};

/// Turns document trees into the bytes of the `Document` column and back.
///
/// Documents pass through `serde_json::Value` on their way to the serializer
/// so that document migrations can rewrite payloads without knowing the
/// concrete document type.
pub trait Serializer: Send + Sync {
	fn serialize(&self, value: &serde_json::Value) -> Result<Vec<u8>>;

	fn deserialize(&self, bytes: &[u8]) -> Result<serde_json::Value>;
}

/// Stores documents as UTF-8 JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
	fn serialize(&self, value: &serde_json::Value) -> Result<Vec<u8>> {
		serde_json::to_vec(value).map_err(|e| error!(serialization::serialize_failed("json", e.to_string())))
	}

	fn deserialize(&self, bytes: &[u8]) -> Result<serde_json::Value> {
		serde_json::from_slice(bytes).map_err(|e| error!(serialization::deserialize_failed("json", e.to_string())))
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn test_json_bytes_are_plain_json() {
		let bytes = JsonSerializer.serialize(&json!({"Property": "Asger"})).unwrap();
		assert_eq!(bytes, br#"{"Property":"Asger"}"#);
	}

	#[test]
	fn test_garbage_is_rejected() {
		let err = JsonSerializer.deserialize(b"{not json").unwrap_err();
		assert_eq!(err.code, "SERDE_002");
	}
}
