// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use chrono::{DateTime, Utc};
use docrow_core::{DmlCommand, Table, system};
use docrow_type::{Etag, Result, Value, diagnostic::argument, return_error};
use indexmap::IndexMap;

use super::{Naming, Statement, quote, value::to_sql};

const MAINTAINED: [&str; 4] = [system::ID, system::ETAG, system::CREATED_AT, system::MODIFIED_AT];

/// Renders one command, numbering its parameters from `counter`.
///
/// Every written row gets `etag` and `now` as modification time; inserted
/// rows also get `now` as creation time.
pub(crate) fn render_dml(
	command: &DmlCommand,
	table: &Table,
	naming: &Naming,
	etag: Etag,
	now: &DateTime<Utc>,
	counter: &mut usize,
) -> Result<Statement> {
	let mut statement = Statement::new();
	let target = naming.table(table.name());
	let etag = to_sql(&Value::Uuid(*etag));
	let now = to_sql(&Value::DateTime(*now));

	match command {
		DmlCommand::Insert(insert) => {
			let mut columns = vec![quote(system::ID), quote(system::ETAG), quote(system::CREATED_AT), quote(system::MODIFIED_AT)];
			let mut values = vec![
				statement.param(counter, to_sql(&Value::Utf8(insert.key.to_string()))),
				statement.param(counter, etag),
				statement.param(counter, now.clone()),
				statement.param(counter, now),
			];
			for (column, value) in user_columns(table, &insert.columns)? {
				columns.push(quote(column));
				values.push(statement.param(counter, to_sql(&value)));
			}
			statement.sql = format!("INSERT INTO {} ({}) VALUES ({})", target, columns.join(", "), values.join(", "));
		}
		DmlCommand::Update(update) => {
			let mut assignments = vec![
				format!("{} = {}", quote(system::ETAG), statement.param(counter, etag)),
				format!("{} = {}", quote(system::MODIFIED_AT), statement.param(counter, now)),
			];
			for (column, value) in user_columns(table, &update.columns)? {
				assignments.push(format!("{} = {}", quote(column), statement.param(counter, to_sql(&value))));
			}
			let predicate = key_predicate(&mut statement, counter, update.key.as_str(), update.expected_etag);
			statement.sql = format!("UPDATE {} SET {} WHERE {}", target, assignments.join(", "), predicate);
		}
		DmlCommand::Delete(delete) => {
			let predicate = key_predicate(&mut statement, counter, delete.key.as_str(), delete.expected_etag);
			statement.sql = format!("DELETE FROM {} WHERE {}", target, predicate);
		}
	}

	Ok(statement)
}

fn key_predicate(statement: &mut Statement, counter: &mut usize, key: &str, expected: Option<Etag>) -> String {
	let mut predicate = format!("{} = {}", quote(system::ID), statement.param(counter, to_sql(&Value::Utf8(key.into()))));
	if let Some(expected) = expected {
		let etag = statement.param(counter, to_sql(&Value::Uuid(*expected)));
		predicate.push_str(&format!(" AND {} = {}", quote(system::ETAG), etag));
	}
	predicate
}

/// The command's columns without the store-maintained ones, coerced to the
/// column types.
fn user_columns<'a>(table: &Table, columns: &'a IndexMap<String, Value>) -> Result<Vec<(&'a str, Value)>> {
	let mut result = Vec::with_capacity(columns.len());
	for (name, value) in columns {
		if MAINTAINED.contains(&name.as_str()) {
			continue;
		}
		let Some(column) = table.column(name) else {
			return_error!(argument::unknown_column(table.name(), name));
		};
		let value = match value {
			Value::Undefined if !column.nullable => column.default_value().unwrap_or(Value::Undefined),
			value => column.ty.coerce(value.clone()),
		};
		result.push((name.as_str(), value));
	}
	Ok(result)
}
