// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Transactional execution of DML batches.

use std::collections::HashMap;

use chrono::Utc;
use docrow_core::{DmlCommand, DocumentModel};
use docrow_type::{
	Etag, Result,
	diagnostic::{argument, concurrency, internal, store},
	error, return_error,
};
use rusqlite::{
	Connection, ErrorCode, Transaction, TransactionBehavior, fallible_iterator::FallibleIterator, ffi,
	types::Value as SqlValue,
};
use tracing::{debug, instrument, trace};

use crate::sql::{Naming, Statement, render_dml};

/// Outcome of a successful execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Execution {
	pub(crate) etag: Etag,
	/// Number of round trips the batch needed.
	pub(crate) flushes: usize,
}

pub(crate) struct Executor<'a> {
	pub(crate) model: &'a DocumentModel,
	pub(crate) naming: &'a Naming,
	pub(crate) max_parameters: usize,
	pub(crate) behavior: TransactionBehavior,
}

#[derive(Default)]
struct Pending<'c> {
	statements: Vec<(Statement, &'c DmlCommand)>,
	parameters: usize,
}

impl<'c> Pending<'c> {
	fn is_empty(&self) -> bool {
		self.statements.is_empty()
	}

	fn push(&mut self, statement: Statement, command: &'c DmlCommand) {
		self.parameters += statement.params.len();
		self.statements.push((statement, command));
	}
}

impl<'a> Executor<'a> {
	/// Applies all commands in one transaction under a single new etag.
	///
	/// Statements are sent in as few round trips as the parameter limit
	/// allows. If the number of affected rows of any round trip differs
	/// from the number the commands expect, the whole batch is rolled back
	/// and a concurrency error is returned.
	#[instrument(name = "store::execute", level = "debug", skip_all, fields(commands = commands.len()))]
	pub(crate) fn execute(&self, conn: &mut Connection, commands: &[DmlCommand]) -> Result<Execution> {
		if commands.is_empty() {
			return_error!(argument::no_commands());
		}

		let etag = Etag::generate();
		let now = Utc::now();
		let tx = conn
			.transaction_with_behavior(self.behavior)
			.map_err(|e| error!(store::transaction_failed(e.to_string())))?;

		let mut pending = Pending::default();
		let mut counter = 0;
		let mut flushes = 0;

		for command in commands {
			let table = self.model.table(command.table())?;
			let mut statement = render_dml(command, table, self.naming, etag, &now, &mut counter)?;

			if !pending.is_empty() && pending.parameters + statement.params.len() > self.max_parameters {
				self.flush(&tx, &mut pending)?;
				flushes += 1;
				counter = 0;
				statement = render_dml(command, table, self.naming, etag, &now, &mut counter)?;
			}
			pending.push(statement, command);
		}

		if !pending.is_empty() {
			self.flush(&tx, &mut pending)?;
			flushes += 1;
		}

		tx.commit().map_err(|e| error!(store::transaction_failed(e.to_string())))?;
		debug!(etag = %etag, flushes, "batch committed");

		Ok(Execution {
			etag,
			flushes,
		})
	}

	fn flush(&self, tx: &Transaction<'_>, pending: &mut Pending<'_>) -> Result<()> {
		let statements = std::mem::take(&mut pending.statements);
		pending.parameters = 0;

		let sql = statements.iter().map(|(s, _)| s.sql.as_str()).collect::<Vec<_>>().join(";\n");
		let params: HashMap<&str, &SqlValue> =
			statements.iter().flat_map(|(s, _)| s.params.iter().map(|(name, value)| (name.as_str(), value))).collect();
		let expected: usize = statements.iter().map(|(_, command)| command.expected_rows()).sum();

		trace!(statements = statements.len(), parameters = params.len(), "flushing batch");

		let mut batch = rusqlite::Batch::new(tx, &sql);
		let mut affected = 0;
		let mut index = 0;
		while let Some(mut stmt) = batch.next().map_err(|e| error!(store::statement_failed(e.to_string())))? {
			for position in 1..=stmt.parameter_count() {
				let Some(value) = stmt.parameter_name(position).and_then(|name| params.get(name)).copied() else {
					return Err(error!(internal::internal(format!("unbound parameter {} in `{}`", position, sql))));
				};
				stmt.raw_bind_parameter(position, value)
					.map_err(|e| error!(store::statement_failed(e.to_string())))?;
			}

			let command = statements.get(index).map(|(_, command)| *command);
			affected += stmt.raw_execute().map_err(|e| match command {
				Some(command) if command.is_insert() && is_duplicate_key(&e) => {
					error!(store::duplicate_key(command.table(), command.key()))
				}
				_ => error!(store::statement_failed(e.to_string())),
			})?;
			index += 1;
		}

		if affected != expected {
			debug!(expected, affected, "concurrency conflict, rolling back");
			return_error!(concurrency::batch_conflict(expected, affected));
		}
		Ok(())
	}
}

/// Whether `err` is a primary key or unique index violation. Other
/// constraint failures, such as NOT NULL, are not.
fn is_duplicate_key(err: &rusqlite::Error) -> bool {
	match err {
		rusqlite::Error::SqliteFailure(failure, _) => {
			failure.code == ErrorCode::ConstraintViolation
				&& matches!(failure.extended_code, ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE)
		}
		_ => false,
	}
}
