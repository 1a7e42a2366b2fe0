// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_core::{Direction, QueryPlan, Table, system};
use rusqlite::types::Value as SqlValue;

use super::{Naming, Statement, TOTAL_COLUMN, quote, value::to_sql};

pub(crate) fn render_get(naming: &Naming, table: &str, key: &str) -> Statement {
	Statement {
		sql: format!("SELECT * FROM {} WHERE {} = :id", naming.table(table), quote(system::ID)),
		params: vec![(":id".to_string(), SqlValue::Text(key.to_string()))],
	}
}

/// A page of rows of the given discriminators, each carrying the number of
/// matches before paging in an extra column.
pub(crate) fn render_query(naming: &Naming, table: &Table, discriminators: &[&str], plan: &QueryPlan) -> Statement {
	let (predicate, mut params) = render_predicate(discriminators, plan);

	let order = if plan.order_by.is_empty() {
		"rowid".to_string()
	} else {
		plan.order_by
			.iter()
			.map(|order| {
				let direction = match order.direction {
					Direction::Ascending => "ASC",
					Direction::Descending => "DESC",
				};
				format!("{} {}", quote(&order.column), direction)
			})
			.collect::<Vec<_>>()
			.join(", ")
	};

	let take = plan.take.map(|take| take as i64).unwrap_or(-1);
	params.push((":__take".to_string(), SqlValue::Integer(take)));
	params.push((":__skip".to_string(), SqlValue::Integer(plan.skip as i64)));

	Statement {
		sql: format!(
			"SELECT *, COUNT(*) OVER () AS {} FROM {} WHERE {} ORDER BY {} LIMIT :__take OFFSET :__skip",
			quote(TOTAL_COLUMN),
			naming.table(table.name()),
			predicate,
			order
		),
		params,
	}
}

pub(crate) fn render_count(naming: &Naming, table: &Table, discriminators: &[&str], plan: &QueryPlan) -> Statement {
	let (predicate, params) = render_predicate(discriminators, plan);
	Statement {
		sql: format!("SELECT COUNT(*) FROM {} WHERE {}", naming.table(table.name()), predicate),
		params,
	}
}

/// The next page of rows that need their projections rewritten, ordered by
/// key and starting after `after`.
pub(crate) fn render_pending(naming: &Naming, table: &str, version: u32, after: &str, limit: usize) -> Statement {
	Statement {
		sql: format!(
			"SELECT * FROM {} WHERE ({} = 1 OR {} < :version) AND {} > :after ORDER BY {} LIMIT :limit",
			naming.table(table),
			quote(system::AWAITS_REPROJECTION),
			quote(system::VERSION),
			quote(system::ID),
			quote(system::ID)
		),
		params: vec![
			(":version".to_string(), SqlValue::Integer(version as i64)),
			(":after".to_string(), SqlValue::Text(after.to_string())),
			(":limit".to_string(), SqlValue::Integer(limit as i64)),
		],
	}
}

fn render_predicate(discriminators: &[&str], plan: &QueryPlan) -> (String, Vec<(String, SqlValue)>) {
	let mut params = Vec::new();
	let placeholders = discriminators
		.iter()
		.enumerate()
		.map(|(index, discriminator)| {
			let name = format!(":__d{}", index);
			params.push((name.clone(), SqlValue::Text(discriminator.to_string())));
			name
		})
		.collect::<Vec<_>>();

	let mut predicate = format!("{} IN ({})", quote(system::DISCRIMINATOR), placeholders.join(", "));
	if let Some(filter) = &plan.filter {
		predicate.push_str(&format!(" AND ({})", filter.sql));
		for (name, value) in &filter.parameters {
			params.push((parameter_name(name), to_sql(value)));
		}
	}
	(predicate, params)
}

fn parameter_name(name: &str) -> String {
	match name.chars().next() {
		Some(':') | Some('@') | Some('$') => name.to_string(),
		_ => format!(":{}", name),
	}
}
