// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! # docrow
//!
//! docrow persists arbitrary serde documents as rows of SQLite tables. Each
//! row keeps the serialized document next to a set of projected columns
//! that can be filtered and sorted on.
//!
//! The system is composed of several crates:
//!
//! - [`core`]: the schema and projection model, commands and migrations.
//! - [`store`]: the command executor, schema migrator and reprojection worker.
//! - [`session`]: the unit of work with its identity map and dirty checking.
//!
//! ```ignore
//! let mut configuration = Configuration::new();
//! configuration.document::<Entity>()?.key(|e: &Entity| e.id.clone()).with("Property", |e| e.property.clone())?;
//! let store = docrow::memory(configuration)?;
//!
//! let mut session = store.open_session();
//! session.store(Entity { id: "x".into(), property: "Asger".into() })?;
//! session.save_changes()?;
//! ```

mod presets;

pub use docrow_core as core;
pub use docrow_core::{
	AnyDocument, ChangeColumns, ChangeDocument, ChangeDocumentJson, Configuration, DdlCommand, DeleteCommand,
	Direction, DmlCommand, Doc, Document, DocumentFilter, DocumentKey, DocumentMigration, DocumentMigrationMode,
	DocumentModel, Error, ErrorKind, Etag, Filter, InsertCommand, Metadata, Migration, QueryPlan, QueryStats,
	Result, Type, UpdateCommand, Value,
};
pub use docrow_session as session;
pub use docrow_session::{EntityState, ManagedEntity, Session};
pub use docrow_store as store;
pub use docrow_store::{
	DbPath, IsolationLevel, JournalMode, ReprojectionConfig, Store, StoreConfig, StoreStats, SynchronousMode,
	TableMode,
};
pub use presets::*;

/// Opens sessions on a [`Store`].
pub trait OpenSession {
	fn open_session(&self) -> Session;
}

impl OpenSession for Store {
	fn open_session(&self) -> Session {
		Session::new(self)
	}
}
