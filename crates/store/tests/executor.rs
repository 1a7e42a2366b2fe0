// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Integration tests for batched command execution

use docrow_core::{
	AnyDocument, Configuration, DeleteCommand, DmlCommand, Doc, DocumentKey, ErrorKind, Etag, InsertCommand,
	Metadata, Result, UpdateCommand, Value,
};
use docrow_store::{Store, StoreConfig};
use docrow_testing::tempdir::temp_dir;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Entity {
	id: String,
	property: String,
}

fn create_store(config: StoreConfig) -> Result<Store> {
	let mut configuration = Configuration::new();
	configuration
		.document::<Entity>()?
		.key(|e: &Entity| e.id.clone())
		.with("Property", |e: &Entity| e.property.clone())?;
	Store::new(config, configuration.build()?)
}

fn entity(id: &str, property: &str) -> AnyDocument {
	AnyDocument::from(Doc::new(Entity {
		id: id.into(),
		property: property.into(),
	}))
}

fn insert(store: &Store, id: &str, property: &str) -> Result<DmlCommand> {
	let design = store.model().design_for::<Entity>()?;
	let document = entity(id, property);
	Ok(InsertCommand {
		table: design.table().to_string(),
		key: store.model().key_of(design, &document)?,
		columns: store.columns_for(design, &document, &Metadata::new())?,
	}
	.into())
}

fn update(store: &Store, id: &str, property: &str, expected_etag: Option<Etag>) -> Result<DmlCommand> {
	let design = store.model().design_for::<Entity>()?;
	Ok(UpdateCommand {
		table: design.table().to_string(),
		key: DocumentKey::from(id),
		expected_etag,
		columns: store.columns_for(design, &entity(id, property), &Metadata::new())?,
	}
	.into())
}

fn property(store: &Store, id: &str) -> Result<Option<String>> {
	Ok(store.get("Entity", id)?.and_then(|row| row.get("Property").and_then(|v| v.as_str().map(String::from))))
}

#[test]
fn test_insert_and_get() -> Result<()> {
	let store = create_store(StoreConfig::in_memory())?;
	let etag = store.execute(&[insert(&store, "a", "Asger")?])?;

	let row = store.get("Entity", "a")?.expect("row a");
	assert_eq!(row.etag()?, etag);
	assert_eq!(row.get("Property"), Some(&Value::Utf8("Asger".into())));
	assert_eq!(row.discriminator()?, "Entity");
	assert_eq!(row.version(), 0);
	assert!(!row.awaits_reprojection());
	assert!(store.get("Entity", "missing")?.is_none());
	Ok(())
}

#[test]
fn test_no_commands_is_an_argument_error() -> Result<()> {
	let store = create_store(StoreConfig::in_memory())?;
	let err = store.execute(&[]).unwrap_err();
	assert_eq!(err.code, "ARGUMENT_001");
	assert_eq!(err.kind(), ErrorKind::Argument);
	assert_eq!(store.stats().requests, 0);
	Ok(())
}

#[test]
fn test_one_etag_per_batch() -> Result<()> {
	let store = create_store(StoreConfig::in_memory())?;
	let before = store.stats();
	let etag = store.execute(&[insert(&store, "a", "1")?, insert(&store, "b", "2")?, insert(&store, "c", "3")?])?;

	for key in ["a", "b", "c"] {
		assert_eq!(store.get("Entity", key)?.expect("row").etag()?, etag);
	}

	let stats = store.stats();
	assert_eq!(stats.commands - before.commands, 3);
	assert_eq!(stats.last_written_etag, Some(etag));
	// one flush and three gets
	assert_eq!(stats.requests - before.requests, 4);
	Ok(())
}

#[test]
fn test_stale_etag_rejects_whole_batch() -> Result<()> {
	let store = create_store(StoreConfig::in_memory())?;
	let first = store.execute(&[insert(&store, "a", "Asger")?])?;
	let second = store.execute(&[update(&store, "a", "Lars", Some(first))?])?;
	assert_ne!(first, second);

	let err = store.execute(&[insert(&store, "b", "new")?, update(&store, "a", "Lost", Some(first))?]).unwrap_err();
	assert_eq!(err.code, "CONCURRENCY_001");
	assert!(err.is_concurrency());

	assert_eq!(property(&store, "a")?.as_deref(), Some("Lars"));
	assert!(store.get("Entity", "b")?.is_none());
	assert_eq!(store.stats().last_written_etag, Some(second));
	Ok(())
}

#[test]
fn test_update_without_etag_always_wins() -> Result<()> {
	let store = create_store(StoreConfig::in_memory())?;
	store.execute(&[insert(&store, "a", "Asger")?])?;
	store.execute(&[update(&store, "a", "Lars", None)?])?;
	assert_eq!(property(&store, "a")?.as_deref(), Some("Lars"));
	Ok(())
}

#[test]
fn test_update_of_missing_row_is_a_conflict() -> Result<()> {
	let store = create_store(StoreConfig::in_memory())?;
	let err = store.execute(&[update(&store, "ghost", "x", None)?]).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Concurrency);
	Ok(())
}

#[test]
fn test_duplicate_insert() -> Result<()> {
	let store = create_store(StoreConfig::in_memory())?;
	store.execute(&[insert(&store, "a", "Asger")?])?;

	let err = store.execute(&[insert(&store, "a", "again")?]).unwrap_err();
	assert_eq!(err.code, "DUPLICATE_001");
	assert_eq!(err.kind(), ErrorKind::DuplicateKey);
	assert_eq!(property(&store, "a")?.as_deref(), Some("Asger"));
	Ok(())
}

mod optional {
	use super::*;

	#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
	pub struct Entity {
		pub id: String,
		pub property: Option<String>,
	}
}

#[test]
fn test_not_null_violation_is_not_a_duplicate() {
	temp_dir(|dir| {
		let path = dir.join("test.db");
		let store = create_store(StoreConfig::file(&path)).unwrap();
		store.execute(&[insert(&store, "a", "Asger").unwrap()]).unwrap();
		drop(store);

		// the existing column stays NOT NULL
		let mut configuration = Configuration::new();
		configuration
			.document::<optional::Entity>()
			.unwrap()
			.key(|e: &optional::Entity| e.id.clone())
			.with("Property", |e: &optional::Entity| e.property.clone())
			.unwrap();
		let store = Store::new(StoreConfig::file(&path), configuration.build().unwrap()).unwrap();

		let design = store.model().design_for::<optional::Entity>().unwrap();
		let document = AnyDocument::from(Doc::new(optional::Entity {
			id: "fresh".into(),
			property: None,
		}));
		let command = InsertCommand {
			table: design.table().to_string(),
			key: DocumentKey::from("fresh"),
			columns: store.columns_for(design, &document, &Metadata::new()).unwrap(),
		};

		let err = store.execute(&[command.into()]).unwrap_err();
		assert_eq!(err.code, "STORE_003");
		assert_ne!(err.kind(), ErrorKind::DuplicateKey);
		assert!(store.get("Entity", "fresh").unwrap().is_none());
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_delete_with_etag() -> Result<()> {
	let store = create_store(StoreConfig::in_memory())?;
	let etag = store.execute(&[insert(&store, "a", "Asger")?])?;

	let stale = DeleteCommand {
		table: "Entity".into(),
		key: DocumentKey::from("a"),
		expected_etag: Some(Etag::generate()),
	};
	assert!(store.execute(&[stale.into()]).unwrap_err().is_concurrency());
	assert!(store.get("Entity", "a")?.is_some());

	let current = DeleteCommand {
		table: "Entity".into(),
		key: DocumentKey::from("a"),
		expected_etag: Some(etag),
	};
	store.execute(&[current.into()])?;
	assert!(store.get("Entity", "a")?.is_none());
	Ok(())
}

#[test]
fn test_parameter_limit_splits_batch() -> Result<()> {
	// an insert of Entity binds ten parameters
	let store = create_store(StoreConfig::in_memory().with_max_parameters(10))?;
	let before = store.stats().requests;
	store.execute(&[insert(&store, "a", "1")?, insert(&store, "b", "2")?, insert(&store, "c", "3")?])?;
	assert_eq!(store.stats().requests - before, 3);

	let store = create_store(StoreConfig::in_memory().with_max_parameters(20))?;
	let before = store.stats().requests;
	store.execute(&[insert(&store, "a", "1")?, insert(&store, "b", "2")?, insert(&store, "c", "3")?])?;
	assert_eq!(store.stats().requests - before, 2);
	Ok(())
}

#[test]
fn test_failed_flush_rolls_back_earlier_flushes() -> Result<()> {
	let store = create_store(StoreConfig::in_memory().with_max_parameters(10))?;
	let err = store
		.execute(&[insert(&store, "a", "1")?, insert(&store, "b", "2")?, update(&store, "c", "3", None)?])
		.unwrap_err();
	assert!(err.is_concurrency());

	assert!(store.get("Entity", "a")?.is_none());
	assert!(store.get("Entity", "b")?.is_none());
	assert_eq!(store.stats().commands, 0);
	Ok(())
}

#[test]
fn test_unknown_table() -> Result<()> {
	let store = create_store(StoreConfig::in_memory())?;
	let command = DeleteCommand {
		table: "Nope".into(),
		key: DocumentKey::from("a"),
		expected_etag: None,
	};
	assert_eq!(store.execute(&[command.into()]).unwrap_err().code, "ARGUMENT_005");
	Ok(())
}
