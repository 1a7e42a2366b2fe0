// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use docrow_type::{DocumentKey, Etag, Value};
use indexmap::IndexMap;

/// Writes a new row. Fails the batch if the key already exists.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertCommand {
	pub table: String,
	pub key: DocumentKey,
	pub columns: IndexMap<String, Value>,
}

/// Overwrites the listed columns of an existing row.
///
/// With an expected etag the row is only touched if its stored etag still
/// matches; without one the write always wins.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCommand {
	pub table: String,
	pub key: DocumentKey,
	pub expected_etag: Option<Etag>,
	pub columns: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCommand {
	pub table: String,
	pub key: DocumentKey,
	pub expected_etag: Option<Etag>,
}

/// A single row-level write handed to the executor.
#[derive(Debug, Clone, PartialEq)]
pub enum DmlCommand {
	Insert(InsertCommand),
	Update(UpdateCommand),
	Delete(DeleteCommand),
}

impl DmlCommand {
	pub fn table(&self) -> &str {
		match self {
			DmlCommand::Insert(cmd) => &cmd.table,
			DmlCommand::Update(cmd) => &cmd.table,
			DmlCommand::Delete(cmd) => &cmd.table,
		}
	}

	pub fn key(&self) -> &DocumentKey {
		match self {
			DmlCommand::Insert(cmd) => &cmd.key,
			DmlCommand::Update(cmd) => &cmd.key,
			DmlCommand::Delete(cmd) => &cmd.key,
		}
	}

	pub fn expected_etag(&self) -> Option<Etag> {
		match self {
			DmlCommand::Insert(_) => None,
			DmlCommand::Update(cmd) => cmd.expected_etag,
			DmlCommand::Delete(cmd) => cmd.expected_etag,
		}
	}

	/// Number of rows a successful execution of this command touches.
	pub fn expected_rows(&self) -> usize {
		1
	}

	pub fn is_insert(&self) -> bool {
		matches!(self, DmlCommand::Insert(_))
	}
}

impl From<InsertCommand> for DmlCommand {
	fn from(cmd: InsertCommand) -> Self {
		DmlCommand::Insert(cmd)
	}
}

impl From<UpdateCommand> for DmlCommand {
	fn from(cmd: UpdateCommand) -> Self {
		DmlCommand::Update(cmd)
	}
}

impl From<DeleteCommand> for DmlCommand {
	fn from(cmd: DeleteCommand) -> Self {
		DmlCommand::Delete(cmd)
	}
}

impl Display for DmlCommand {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			DmlCommand::Insert(cmd) => write!(f, "INSERT {}/{}", cmd.table, cmd.key),
			DmlCommand::Update(cmd) => write!(f, "UPDATE {}/{}", cmd.table, cmd.key),
			DmlCommand::Delete(cmd) => write!(f, "DELETE {}/{}", cmd.table, cmd.key),
		}
	}
}
