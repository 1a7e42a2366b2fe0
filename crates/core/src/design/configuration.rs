// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	any::{TypeId, type_name},
	collections::HashMap,
	marker::PhantomData,
	sync::Arc,
};

use docrow_type::{
	DocumentKey, IntoColumnValue, Result, Value,
	diagnostic::{configuration, internal},
	error, return_error,
};
use indexmap::IndexMap;
use tracing::debug;

use super::{
	Design, DesignId, DocumentModel, KeyProjection, Projection,
	mapper::{ShortNameTypeMapper, TypeMapper},
	model::KeyResolver,
	projection::{Upcast, upcast},
};
use crate::{
	document::{Document, DocumentCodec, Metadata, TypedCodec},
	migration::{Migration, Migrations},
	serializer::{JsonSerializer, Serializer},
	table::{Column, Table, system},
};

struct Draft {
	table: String,
	discriminator: String,
	parent: Option<(DesignId, Arc<Upcast>)>,
	projections: IndexMap<String, Projection>,
	key: Option<KeyProjection>,
	codec: Arc<dyn DocumentCodec>,
}

/// Collects designs, tables and migrations before the store is built.
///
/// Building consumes the configuration, so nothing can be registered once a
/// [`DocumentModel`] exists.
pub struct Configuration {
	drafts: Vec<Draft>,
	by_type: HashMap<TypeId, DesignId>,
	tables: IndexMap<String, Table>,
	migrations: Migrations,
	serializer: Arc<dyn Serializer>,
	type_mapper: Arc<dyn TypeMapper>,
	key_resolver: Option<KeyResolver>,
}

impl Default for Configuration {
	fn default() -> Self {
		Self {
			drafts: vec![],
			by_type: HashMap::new(),
			tables: IndexMap::new(),
			migrations: Migrations::default(),
			serializer: Arc::new(JsonSerializer),
			type_mapper: Arc::new(ShortNameTypeMapper),
			key_resolver: None,
		}
	}
}

impl Configuration {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a root document type in the table named after it.
	pub fn document<T: Document>(&mut self) -> Result<DesignBuilder<'_, T>> {
		let table = self.type_mapper.table_name(type_name::<T>());
		self.register::<T>(table, None)
	}

	/// Registers a root document type in an explicitly named table.
	///
	/// Several root types may share a table as long as their discriminators
	/// differ.
	pub fn document_in<T: Document>(&mut self, table: impl Into<String>) -> Result<DesignBuilder<'_, T>> {
		self.register::<T>(table.into(), None)
	}

	/// Registers `C` as a subtype of the already registered `P`.
	///
	/// `C` embeds its parent and exposes it through `parent`. It is stored in
	/// the parent's table and inherits every parent projection and the
	/// parent's key.
	pub fn subdocument<C, P, F>(&mut self, parent: F) -> Result<DesignBuilder<'_, C>>
	where
		C: Document,
		P: Document,
		F: for<'a> Fn(&'a C) -> &'a P + Send + Sync + 'static,
	{
		let Some(parent_id) = self.by_type.get(&TypeId::of::<P>()).copied() else {
			return_error!(configuration::missing_parent_design(type_name::<C>(), type_name::<P>()));
		};
		let table = self.drafts[parent_id.0].table.clone();
		self.register::<C>(table, Some((parent_id, upcast::<C, P, F>(parent))))
	}

	/// Reopens an already registered design to add projections.
	pub fn design<T: Document>(&mut self) -> Result<DesignBuilder<'_, T>> {
		let Some(id) = self.by_type.get(&TypeId::of::<T>()).copied() else {
			return_error!(configuration::missing_design(type_name::<T>()));
		};
		Ok(DesignBuilder {
			config: self,
			id,
			_marker: PhantomData,
		})
	}

	pub fn migration(&mut self, migration: Migration) -> Result<&mut Self> {
		self.migrations.push(migration)?;
		Ok(self)
	}

	pub fn serializer(&mut self, serializer: impl Serializer + 'static) -> &mut Self {
		self.serializer = Arc::new(serializer);
		self
	}

	/// Sets how type names map to tables and discriminators. Affects only
	/// designs registered afterwards.
	pub fn type_mapper(&mut self, mapper: impl TypeMapper + 'static) -> &mut Self {
		self.type_mapper = Arc::new(mapper);
		self
	}

	/// Fallback key lookup for designs without a key projection.
	///
	/// The resolver sees the document as a JSON tree.
	pub fn key_resolver<F>(&mut self, resolver: F) -> &mut Self
	where
		F: Fn(&serde_json::Value) -> Option<DocumentKey> + Send + Sync + 'static,
	{
		self.key_resolver = Some(Arc::new(resolver));
		self
	}

	pub fn tables(&self) -> &IndexMap<String, Table> {
		&self.tables
	}

	/// Freezes the configuration.
	pub fn build(self) -> Result<DocumentModel> {
		let mut designs: Vec<Design> = Vec::with_capacity(self.drafts.len());

		for (index, draft) in self.drafts.into_iter().enumerate() {
			let mut projections = IndexMap::new();
			let mut key = None;

			if let Some((parent, upcast)) = &draft.parent {
				let parent = &designs[parent.0];
				for (column, projection) in &parent.projections {
					if column != system::DISCRIMINATOR {
						projections.insert(column.clone(), projection.through(upcast.clone()));
					}
				}
				key = parent.key.as_ref().map(|k| k.through(upcast.clone()));
			}

			for (column, projection) in draft.projections {
				projections.insert(column, projection);
			}
			if draft.key.is_some() {
				key = draft.key;
			}
			projections.insert(
				system::DISCRIMINATOR.to_string(),
				Projection::constant(Value::Utf8(draft.discriminator.clone())),
			);

			designs.push(Design {
				id: DesignId(index),
				table: draft.table,
				discriminator: draft.discriminator,
				parent: draft.parent.map(|(parent, _)| parent),
				projections,
				key,
				codec: draft.codec,
				descendants_and_self: IndexMap::new(),
			});
		}

		for index in 0..designs.len() {
			let discriminator = designs[index].discriminator.clone();
			let mut current = Some(DesignId(index));
			while let Some(id) = current {
				designs[id.0].descendants_and_self.insert(discriminator.clone(), DesignId(index));
				current = designs[id.0].parent;
			}
		}

		for table in self.tables.values() {
			table.primary_key()?;
		}

		debug!(designs = designs.len(), tables = self.tables.len(), version = self.migrations.version(), "model built");

		Ok(DocumentModel {
			designs,
			by_type: self.by_type,
			tables: self.tables,
			migrations: self.migrations,
			serializer: self.serializer,
			key_resolver: self.key_resolver,
		})
	}

	fn register<T: Document>(
		&mut self,
		table: String,
		parent: Option<(DesignId, Arc<Upcast>)>,
	) -> Result<DesignBuilder<'_, T>> {
		if self.by_type.contains_key(&TypeId::of::<T>()) {
			return_error!(configuration::design_already_registered(type_name::<T>()));
		}

		let discriminator = self.type_mapper.discriminator(type_name::<T>());
		self.ensure_discriminator_free(&table, &discriminator, None)?;
		if !self.tables.contains_key(&table) {
			self.tables.insert(table.clone(), Table::document(table.clone())?);
		}

		let id = DesignId(self.drafts.len());
		self.drafts.push(Draft {
			table,
			discriminator,
			parent,
			projections: IndexMap::new(),
			key: None,
			codec: Arc::new(TypedCodec::<T>::new()),
		});
		self.by_type.insert(TypeId::of::<T>(), id);

		Ok(DesignBuilder {
			config: self,
			id,
			_marker: PhantomData,
		})
	}

	fn ensure_discriminator_free(&self, table: &str, discriminator: &str, except: Option<DesignId>) -> Result<()> {
		let taken = self
			.drafts
			.iter()
			.enumerate()
			.any(|(index, d)| Some(DesignId(index)) != except && d.table == table && d.discriminator == discriminator);
		if taken {
			return_error!(configuration::duplicate_discriminator(table, discriminator));
		}
		Ok(())
	}

	fn add_projection(&mut self, id: DesignId, column: &str, projection: Projection) -> Result<()> {
		if system::is_system_column(column) {
			return_error!(configuration::reserved_column(column));
		}

		let draft = &self.drafts[id.0];
		let Some(table) = self.tables.get_mut(&draft.table) else {
			return Err(error!(internal::internal(format!("table `{}` of a registered design is missing", draft.table))));
		};

		match table.column_mut(column) {
			Some(existing) => {
				if !existing.ty.is_assignable_from(projection.ty()) {
					return_error!(configuration::projection_type_mismatch(
						&draft.table,
						column,
						existing.ty,
						projection.ty()
					));
				}
				if projection.is_nullable() {
					existing.nullable = true;
				}
			}
			// rows of sibling designs never fill a subtype's own columns
			None => {
				let nullable = projection.is_nullable() || draft.parent.is_some();
				table.add_column(Column::new(column, projection.ty()).nullable(nullable))?
			}
		}

		self.drafts[id.0].projections.insert(column.to_string(), projection);
		Ok(())
	}
}

/// Configures one registered design.
pub struct DesignBuilder<'a, T> {
	config: &'a mut Configuration,
	id: DesignId,
	_marker: PhantomData<fn() -> T>,
}

impl<'a, T: Document> DesignBuilder<'a, T> {
	pub fn id(&self) -> DesignId {
		self.id
	}

	pub fn table(&self) -> &str {
		&self.config.drafts[self.id.0].table
	}

	/// Uses a field of the document as its key.
	pub fn key<K, F>(self, key: F) -> Self
	where
		K: Into<DocumentKey>,
		F: Fn(&T) -> K + Send + Sync + 'static,
	{
		self.config.drafts[self.id.0].key = Some(KeyProjection::of(key));
		self
	}

	/// Projects a value of the document into a column.
	///
	/// The column is created on first use. A column that already exists must
	/// have a type the projection's values can be stored in.
	pub fn with<R, F>(self, column: &str, projection: F) -> Result<Self>
	where
		R: IntoColumnValue,
		F: Fn(&T) -> R + Send + Sync + 'static,
	{
		let projection = Projection::of(move |document: &T, _: &Metadata| projection(document));
		self.config.add_projection(self.id, column, projection)?;
		Ok(self)
	}

	/// Like [`with`](Self::with), but the projection also sees the metadata
	/// stored next to the document.
	pub fn with_metadata<R, F>(self, column: &str, projection: F) -> Result<Self>
	where
		R: IntoColumnValue,
		F: Fn(&T, &Metadata) -> R + Send + Sync + 'static,
	{
		self.config.add_projection(self.id, column, Projection::of(projection))?;
		Ok(self)
	}

	pub fn discriminator(self, discriminator: impl Into<String>) -> Result<Self> {
		let discriminator = discriminator.into();
		let table = self.config.drafts[self.id.0].table.clone();
		self.config.ensure_discriminator_free(&table, &discriminator, Some(self.id))?;
		self.config.drafts[self.id.0].discriminator = discriminator;
		Ok(self)
	}
}

#[cfg(test)]
mod tests {
	use docrow_type::{ErrorKind, Type};
	use serde::{Deserialize, Serialize};

	use super::*;
	use crate::document::{AnyDocument, Doc};

	#[derive(Debug, Clone, Serialize, Deserialize)]
	struct Entity {
		id: String,
		property: String,
		number: i32,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	struct Animal {
		id: String,
		name: String,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	struct Dog {
		animal: Animal,
		barks: bool,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	struct Puppy {
		dog: Dog,
		age: i32,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	struct Cat {
		animal: Animal,
	}

	fn entity() -> Entity {
		Entity {
			id: "a".into(),
			property: "Asger".into(),
			number: 2,
		}
	}

	fn puppy() -> Puppy {
		Puppy {
			dog: Dog {
				animal: Animal {
					id: "rex".into(),
					name: "Rex".into(),
				},
				barks: true,
			},
			age: 1,
		}
	}

	fn animals() -> Configuration {
		let mut config = Configuration::new();
		config.document::<Animal>().unwrap().key(|a: &Animal| a.id.clone()).with("Name", |a| a.name.clone()).unwrap();
		config.subdocument::<Dog, Animal, _>(|d: &Dog| &d.animal).unwrap().with("Barks", |d| d.barks).unwrap();
		config.subdocument::<Puppy, Dog, _>(|p: &Puppy| &p.dog).unwrap().with("Age", |p| p.age).unwrap();
		config.subdocument::<Cat, Animal, _>(|c: &Cat| &c.animal).unwrap();
		config
	}

	#[test]
	fn test_projection_creates_column() {
		let mut config = Configuration::new();
		config.document::<Entity>().unwrap().with("Property", |e| e.property.clone()).unwrap();

		let table = config.tables().get("Entity").unwrap();
		let column = table.column("Property").unwrap();
		assert_eq!(column.ty, Type::Utf8);
		assert!(!column.nullable);
	}

	#[test]
	fn test_type_mismatch_fails_at_registration() {
		let mut config = Configuration::new();
		let err = config
			.document::<Entity>()
			.unwrap()
			.with("Property", |e| e.property.clone())
			.unwrap()
			.with("Property", |e| e.number)
			.err()
			.unwrap();
		assert_eq!(err.code, "CONFIG_003");
		assert_eq!(err.kind(), ErrorKind::Configuration);
	}

	#[test]
	fn test_widening_projection_is_accepted() {
		let mut config = Configuration::new();
		config
			.document::<Entity>()
			.unwrap()
			.with("Number", |e| e.number as i64)
			.unwrap()
			.with("Number", |e| e.number)
			.unwrap();
	}

	#[test]
	fn test_system_column_is_reserved() {
		let mut config = Configuration::new();
		let err = config.document::<Entity>().unwrap().with("Etag", |e| e.id.clone()).err().unwrap();
		assert_eq!(err.code, "CONFIG_004");
	}

	#[test]
	fn test_register_twice() {
		let mut config = Configuration::new();
		config.document::<Entity>().unwrap();
		assert_eq!(config.document::<Entity>().err().unwrap().code, "CONFIG_009");
	}

	#[test]
	fn test_subdocument_requires_parent() {
		let mut config = Configuration::new();
		let err = config.subdocument::<Dog, Animal, _>(|d: &Dog| &d.animal).err().unwrap();
		assert_eq!(err.code, "CONFIG_010");
	}

	#[test]
	fn test_duplicate_discriminator_in_table() {
		let mut config = Configuration::new();
		config.document_in::<Entity>("Things").unwrap();
		let err = config.document_in::<Animal>("Things").unwrap().discriminator("Entity").err().unwrap();
		assert_eq!(err.code, "CONFIG_002");
	}

	#[test]
	fn test_subtype_columns_are_nullable() {
		let config = animals();
		let table = config.tables().get("Animal").unwrap();
		assert!(!table.column("Name").unwrap().nullable);
		assert!(table.column("Barks").unwrap().nullable);
		assert!(table.column("Age").unwrap().nullable);
		assert_eq!(config.tables().len(), 1);
	}

	#[test]
	fn test_subtype_reprojecting_parent_column_keeps_it_required() {
		let mut config = animals();
		config.design::<Dog>().unwrap().with("Name", |d| d.animal.name.clone()).unwrap();

		let table = config.tables().get("Animal").unwrap();
		assert!(!table.column("Name").unwrap().nullable);
	}

	#[test]
	fn test_inherited_projections() {
		let model = animals().build().unwrap();
		let design = model.design_for::<Puppy>().unwrap();
		let columns: Vec<_> = design.projections().keys().map(String::as_str).collect();
		assert_eq!(columns, vec!["Name", "Barks", "Age", "Discriminator"]);

		let doc = AnyDocument::from(Doc::new(puppy()));
		let values = design.project(&doc, &Metadata::new()).unwrap();
		assert_eq!(values["Name"], Value::Utf8("Rex".into()));
		assert_eq!(values["Barks"], Value::Boolean(true));
		assert_eq!(values["Age"], Value::Int4(1));
		assert_eq!(values["Discriminator"], Value::Utf8("Puppy".into()));
		assert_eq!(design.key_of(&doc).unwrap(), Some(DocumentKey::from("rex")));
	}

	#[test]
	fn test_parent_projection_registered_late_is_inherited() {
		let mut config = Configuration::new();
		config.document::<Animal>().unwrap().key(|a: &Animal| a.id.clone());
		config.subdocument::<Dog, Animal, _>(|d: &Dog| &d.animal).unwrap();
		config.design::<Animal>().unwrap().with("Name", |a| a.name.clone()).unwrap();

		let model = config.build().unwrap();
		assert!(model.design_for::<Dog>().unwrap().projections().contains_key("Name"));
	}

	#[test]
	fn test_descendants_and_self() {
		let model = animals().build().unwrap();
		let animal = model.design_for::<Animal>().unwrap();
		let dog = model.design_for::<Dog>().unwrap();
		let cat = model.design_for::<Cat>().unwrap();

		let mut all: Vec<_> = animal.descendants_and_self().keys().map(String::as_str).collect();
		all.sort();
		assert_eq!(all, vec!["Animal", "Cat", "Dog", "Puppy"]);

		let mut dogs: Vec<_> = dog.descendants_and_self().keys().map(String::as_str).collect();
		dogs.sort();
		assert_eq!(dogs, vec!["Dog", "Puppy"]);

		assert_eq!(cat.descendants_and_self().len(), 1);
		assert!(!cat.is_same_or_ancestor_of("Dog"));
	}
}
