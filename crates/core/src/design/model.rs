// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	any::{TypeId, type_name},
	collections::HashMap,
	fmt::{Debug, Formatter},
	sync::Arc,
};

use docrow_type::{
	DocumentKey, Result,
	diagnostic::{argument, configuration},
	return_error,
};
use indexmap::IndexMap;

use super::{Design, DesignId};
use crate::{
	document::{AnyDocument, Document},
	migration::Migrations,
	serializer::Serializer,
	table::Table,
};

pub(crate) type KeyResolver = Arc<dyn Fn(&serde_json::Value) -> Option<DocumentKey> + Send + Sync>;

/// The frozen set of designs, tables and migrations shared by a store and
/// its sessions.
pub struct DocumentModel {
	pub(crate) designs: Vec<Design>,
	pub(crate) by_type: HashMap<TypeId, DesignId>,
	pub(crate) tables: IndexMap<String, Table>,
	pub(crate) migrations: Migrations,
	pub(crate) serializer: Arc<dyn Serializer>,
	pub(crate) key_resolver: Option<KeyResolver>,
}

impl DocumentModel {
	pub fn design(&self, id: DesignId) -> &Design {
		&self.designs[id.0]
	}

	pub fn designs(&self) -> impl Iterator<Item = &Design> {
		self.designs.iter()
	}

	pub fn design_for<T: Document>(&self) -> Result<&Design> {
		match self.by_type.get(&TypeId::of::<T>()) {
			Some(id) => Ok(self.design(*id)),
			None => return_error!(configuration::missing_design(type_name::<T>())),
		}
	}

	pub fn design_of(&self, document: &AnyDocument) -> Result<&Design> {
		match self.by_type.get(&document.type_id()) {
			Some(id) => Ok(self.design(*id)),
			None => return_error!(configuration::missing_design(document.type_name())),
		}
	}

	/// The design of a stored row, looked up among `design` and its
	/// subtypes.
	pub fn resolve<'a>(&'a self, design: &Design, discriminator: &str) -> Result<&'a Design> {
		match design.descendants_and_self.get(discriminator) {
			Some(id) => Ok(self.design(*id)),
			None => return_error!(argument::unknown_discriminator(&design.table, discriminator)),
		}
	}

	/// The design of a stored row, looked up among all designs of its table.
	pub fn resolve_in_table(&self, table: &str, discriminator: &str) -> Result<&Design> {
		match self.designs.iter().find(|d| d.table == table && d.discriminator == discriminator) {
			Some(design) => Ok(design),
			None => return_error!(argument::unknown_discriminator(table, discriminator)),
		}
	}

	pub fn tables(&self) -> &IndexMap<String, Table> {
		&self.tables
	}

	pub fn table(&self, name: &str) -> Result<&Table> {
		match self.tables.get(name) {
			Some(table) => Ok(table),
			None => return_error!(argument::unknown_table(name)),
		}
	}

	pub fn migrations(&self) -> &Migrations {
		&self.migrations
	}

	/// The version of the newest registered migration, 0 without any.
	pub fn version(&self) -> u32 {
		self.migrations.version()
	}

	pub fn serializer(&self) -> &dyn Serializer {
		self.serializer.as_ref()
	}

	/// The key of `document`: its design's key projection, then the
	/// configured resolver, then a fresh random key.
	pub fn key_of(&self, design: &Design, document: &AnyDocument) -> Result<DocumentKey> {
		if let Some(key) = design.key_of(document)? {
			return Ok(key);
		}
		if let Some(resolver) = &self.key_resolver {
			if let Some(key) = resolver(&design.to_json(document)?) {
				return Ok(key);
			}
		}
		Ok(DocumentKey::random())
	}
}

impl Debug for DocumentModel {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DocumentModel")
			.field("designs", &self.designs)
			.field("tables", &self.tables.keys().collect::<Vec<_>>())
			.field("version", &self.version())
			.finish()
	}
}
