// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Integration tests for the unit of work

use docrow_core::{Configuration, DeleteCommand, DocumentKey, Metadata, QueryPlan, Result};
use docrow_session::{EntityState, Session};
use docrow_store::{Store, StoreConfig};
use docrow_testing::init_logging;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Animal {
	id: String,
	name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Dog {
	animal: Animal,
	breed: String,
}

fn create_store() -> Result<Store> {
	let mut configuration = Configuration::new();
	configuration.document::<Animal>()?.key(|a: &Animal| a.id.clone()).with("Name", |a| a.name.clone())?;
	configuration.subdocument::<Dog, Animal, _>(|d: &Dog| &d.animal)?.with("Breed", |d| d.breed.clone())?;
	Store::new(StoreConfig::in_memory(), configuration.build()?)
}

fn animal(id: &str, name: &str) -> Animal {
	Animal {
		id: id.into(),
		name: name.into(),
	}
}

fn dog(id: &str, name: &str) -> Dog {
	Dog {
		animal: animal(id, name),
		breed: "Beagle".into(),
	}
}

fn seed(store: &Store, animals: &[Animal]) -> Result<()> {
	let mut session = Session::new(store);
	for animal in animals {
		session.store(animal.clone())?;
	}
	session.save_changes()?;
	Ok(())
}

#[test]
fn test_store_then_save_inserts() -> Result<()> {
	let store = create_store()?;
	let mut session = Session::new(&store);
	let asger = session.store(animal("a", "Asger"))?;
	assert_eq!(session.etag_of(&asger), None);
	assert_eq!(session.managed_entities().next().map(|e| e.state()), Some(EntityState::Transient));

	let etag = session.save_changes()?.expect("an etag");
	assert_eq!(session.etag_of(&asger), Some(etag));
	assert_eq!(session.key_of(&asger), Some(DocumentKey::from("a")));
	assert_eq!(session.managed_entities().next().map(|e| e.state()), Some(EntityState::Loaded));
	assert_eq!(store.get("Animal", "a")?.expect("row").etag()?, etag);
	Ok(())
}

#[test]
fn test_save_without_changes_is_a_no_op() -> Result<()> {
	let store = create_store()?;
	let mut session = Session::new(&store);
	assert_eq!(session.save_changes()?, None);

	session.store(animal("a", "Asger"))?;
	let etag = session.save_changes()?;
	let requests = store.stats().requests;

	assert_eq!(session.save_changes()?, etag);
	assert_eq!(session.save_changes()?, etag);
	assert_eq!(store.stats().requests, requests);
	Ok(())
}

#[test]
fn test_load_returns_the_tracked_instance() -> Result<()> {
	let store = create_store()?;
	seed(&store, &[animal("a", "Asger")])?;

	let mut session = Session::new(&store);
	let first = session.load::<Animal>("a")?.expect("a");
	let requests = store.stats().requests;
	let second = session.load::<Animal>("a")?.expect("a");
	assert!(first.ptr_eq(&second));
	assert_eq!(store.stats().requests, requests);

	let (page, _) = session.query::<Animal>(&QueryPlan::new())?;
	assert!(page[0].ptr_eq(&first));
	Ok(())
}

#[test]
fn test_second_store_of_a_key_is_ignored() -> Result<()> {
	let store = create_store()?;
	let mut session = Session::new(&store);
	let first = session.store(animal("x", "first"))?;
	let second = session.store(animal("x", "second"))?;
	assert!(first.ptr_eq(&second));
	assert_eq!(session.managed_entities().count(), 1);

	let loaded = session.load::<Animal>("x")?.expect("x");
	assert_eq!(loaded.read().name, "first");
	session.save_changes()?;
	assert_eq!(Session::new(&store).load::<Animal>("x")?.expect("x").read().name, "first");
	Ok(())
}

#[test]
fn test_missing_document_is_not_tracked() -> Result<()> {
	let store = create_store()?;
	let mut session = Session::new(&store);
	assert!(session.load::<Animal>("ghost")?.is_none());
	assert!(session.load_any::<Animal>("ghost")?.is_none());
	assert_eq!(session.managed_entities().count(), 0);
	Ok(())
}

#[test]
fn test_only_changed_documents_are_written() -> Result<()> {
	let store = create_store()?;
	seed(&store, &[animal("a", "Asger"), animal("b", "Bent")])?;

	let mut session = Session::new(&store);
	let a = session.load::<Animal>("a")?.expect("a");
	let b = session.load::<Animal>("b")?.expect("b");
	let b_etag = session.etag_of(&b);
	a.write().name = "Lars".into();

	let commands = store.stats().commands;
	let etag = session.save_changes()?;
	assert_eq!(store.stats().commands - commands, 1);
	assert_eq!(session.etag_of(&a), etag);
	assert_eq!(session.etag_of(&b), b_etag);
	Ok(())
}

#[test]
fn test_delete_transitions() -> Result<()> {
	let store = create_store()?;
	seed(&store, &[animal("a", "Asger")])?;

	let mut session = Session::new(&store);
	let transient = session.store(animal("t", "Tmp"))?;
	session.delete(&transient);
	assert!(!session.is_tracked(&transient));

	let loaded = session.load::<Animal>("a")?.expect("a");
	session.delete(&loaded);
	assert!(session.is_tracked(&loaded));
	assert!(session.load::<Animal>("a")?.is_none());
	let (page, stats) = session.query::<Animal>(&QueryPlan::new())?;
	assert!(page.is_empty());
	assert_eq!(stats.retrieved_results, 0);
	assert_eq!(stats.total_results, 0);

	session.delete_by_key::<Animal>("untracked")?;
	session.save_changes()?;

	assert!(!session.is_tracked(&loaded));
	assert!(store.get("Animal", "a")?.is_none());
	assert!(store.get("Animal", "t")?.is_none());
	Ok(())
}

#[test]
fn test_concurrent_sessions_conflict() -> Result<()> {
	init_logging();
	let store = create_store()?;
	seed(&store, &[animal("a", "Asger")])?;

	let mut first = Session::new(&store);
	let mut second = Session::new(&store);
	let mine = first.load::<Animal>("a")?.expect("a");
	let theirs = second.load::<Animal>("a")?.expect("a");
	let etag = second.etag_of(&theirs);

	mine.write().name = "Lars".into();
	first.save_changes()?;

	theirs.write().name = "Jens".into();
	let err = second.save_changes().unwrap_err();
	assert!(err.is_concurrency());
	assert_eq!(second.etag_of(&theirs), etag);
	assert_eq!(Session::new(&store).load::<Animal>("a")?.expect("a").read().name, "Lars");
	Ok(())
}

#[test]
fn test_failed_save_keeps_session_state() -> Result<()> {
	let store = create_store()?;
	seed(&store, &[animal("a", "Asger")])?;

	let mut session = Session::new(&store);
	let fresh = session.store(animal("n", "New"))?;
	session.store(animal("a", "Duplicate"))?;

	assert_eq!(session.save_changes().unwrap_err().code, "DUPLICATE_001");
	assert!(store.get("Animal", "n")?.is_none());
	assert_eq!(session.etag_of(&fresh), None);
	assert!(session.managed_entities().all(|entity| entity.state() == EntityState::Transient));
	Ok(())
}

#[test]
fn test_exact_load_rejects_subtype() -> Result<()> {
	let store = create_store()?;
	let mut session = Session::new(&store);
	session.store(dog("d", "Rex"))?;
	session.store(animal("a", "Asger"))?;
	session.save_changes()?;

	let mut session = Session::new(&store);
	assert_eq!(session.load::<Animal>("d").unwrap_err().code, "ARGUMENT_002");
	let any = session.load_any::<Animal>("d")?.expect("d");
	assert_eq!(any.downcast::<Dog>().expect("a dog").read().breed, "Beagle");
	assert!(session.load::<Dog>("d")?.is_some());
	assert!(session.load::<Dog>("a")?.is_none());

	let (exact, _) = session.query::<Animal>(&QueryPlan::new())?;
	assert_eq!(exact.len(), 1);
	let (all, stats) = session.query_any::<Animal>(&QueryPlan::new())?;
	assert_eq!(all.len(), 2);
	assert_eq!(stats.total_results, 2);
	Ok(())
}

#[test]
fn test_metadata_is_saved_and_dirty_checked() -> Result<()> {
	let store = create_store()?;
	seed(&store, &[animal("a", "Asger")])?;

	let mut session = Session::new(&store);
	let a = session.load::<Animal>("a")?.expect("a");
	assert_eq!(session.metadata_of(&a), Some(Metadata::new()));

	let mut metadata = Metadata::new();
	metadata.insert("tags".into(), vec!["good".into()]);
	session.set_metadata(&a, metadata.clone())?;
	assert!(session.save_changes()?.is_some());

	let mut session = Session::new(&store);
	let a = session.load::<Animal>("a")?.expect("a");
	assert_eq!(session.metadata_of(&a), Some(metadata));

	let untracked = docrow_core::Doc::new(animal("u", "Untracked"));
	assert_eq!(session.set_metadata(&untracked, Metadata::new()).unwrap_err().code, "ARGUMENT_007");
	Ok(())
}

#[test]
fn test_deferred_commands_join_the_batch() -> Result<()> {
	let store = create_store()?;
	seed(&store, &[animal("a", "Asger")])?;

	let mut session = Session::new(&store);
	session.store(animal("b", "Bent"))?;
	session.defer(DeleteCommand {
		table: "Animal".into(),
		key: DocumentKey::from("a"),
		expected_etag: None,
	});

	let requests = store.stats().requests;
	session.save_changes()?;
	assert_eq!(store.stats().requests - requests, 1);
	assert!(store.get("Animal", "a")?.is_none());
	assert!(store.get("Animal", "b")?.is_some());
	Ok(())
}

#[test]
fn test_evict_and_clear() -> Result<()> {
	let store = create_store()?;
	seed(&store, &[animal("a", "Asger")])?;

	let mut session = Session::new(&store);
	let a = session.load::<Animal>("a")?.expect("a");
	a.write().name = "Changed".into();
	assert!(session.evict(&a));
	assert!(!session.evict(&a));
	assert_eq!(session.save_changes()?, None);

	let reloaded = session.load::<Animal>("a")?.expect("a");
	assert!(!reloaded.ptr_eq(&a));
	assert_eq!(reloaded.read().name, "Asger");

	session.clear();
	assert_eq!(session.managed_entities().count(), 0);
	Ok(())
}
