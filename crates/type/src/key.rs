// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	borrow::Borrow,
	fmt::{Display, Formatter},
	ops::Deref,
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The primary key of a stored document.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentKey(String);

impl DocumentKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	/// A fresh random key, used when no key projection is configured.
	pub fn random() -> Self {
		Self(Uuid::new_v4().to_string())
	}

	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}
}

impl Deref for DocumentKey {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		self.0.as_str()
	}
}

impl Borrow<str> for DocumentKey {
	fn borrow(&self) -> &str {
		self.0.as_str()
	}
}

impl From<&str> for DocumentKey {
	fn from(key: &str) -> Self {
		Self(key.to_string())
	}
}

impl From<String> for DocumentKey {
	fn from(key: String) -> Self {
		Self(key)
	}
}

impl From<Uuid> for DocumentKey {
	fn from(key: Uuid) -> Self {
		Self(key.to_string())
	}
}

impl Display for DocumentKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}
