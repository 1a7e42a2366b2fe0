// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The schema and projection model of docrow.
//!
//! A [`Configuration`] collects document designs, tables and migrations and
//! is frozen into an immutable [`DocumentModel`] that the store and the
//! session share.

pub mod command;
pub mod design;
pub mod document;
pub mod migration;
pub mod query;
pub mod row;
pub mod schema;
pub mod serializer;
pub mod table;

pub use command::{DeleteCommand, DmlCommand, InsertCommand, UpdateCommand};
pub use design::{
	CachedTypeMapper, Configuration, Design, DesignBuilder, DesignId, DocumentModel, FullNameTypeMapper,
	Projection, ShortNameTypeMapper, TypeMapper,
};
pub use docrow_type::*;
pub use document::{AnyDocument, Doc, Document, Metadata};
pub use migration::{
	ChangeColumns, ChangeDocument, ChangeDocumentJson, DocumentFilter, DocumentMigration, DocumentMigrationMode,
	DocumentMigrator, Migration, Migrations,
};
pub use query::{Direction, Filter, OrderBy, QueryPlan, QueryStats};
pub use row::Row;
pub use schema::{DdlCommand, LiveColumn, LiveSchema, LiveTable, diff};
pub use serializer::{JsonSerializer, Serializer};
pub use table::{Column, Table, system};
