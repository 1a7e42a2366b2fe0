// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::Deref,
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Concurrency token that changes on every successful write of a row.
///
/// Every row touched by one executor call receives the same etag, which is
/// why the same value doubles as the commit token of that call.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Etag(pub Uuid);

impl Etag {
	pub fn generate() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Deref for Etag {
	type Target = Uuid;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<Uuid> for Etag {
	fn from(uuid: Uuid) -> Self {
		Self(uuid)
	}
}

impl Display for Etag {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_is_unique() {
		assert_ne!(Etag::generate(), Etag::generate());
	}
}
