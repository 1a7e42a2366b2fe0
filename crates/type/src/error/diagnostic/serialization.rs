// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;

pub fn serialize_failed(type_name: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new("SERDE_001", format!("failed to serialize `{}`: {}", type_name, reason.into()))
		.label("serialization failed")
}

pub fn deserialize_failed(type_name: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic::new("SERDE_002", format!("failed to deserialize `{}`: {}", type_name, reason.into()))
		.label("deserialization failed")
}
