// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_type::{Result, Value, diagnostic::argument, return_error};
use indexmap::IndexMap;

use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Ascending,
	Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
	pub column: String,
	pub direction: Direction,
}

/// A raw SQL predicate over the columns of the queried table.
///
/// Parameters are referenced as `:name` inside `sql`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
	pub sql: String,
	pub parameters: IndexMap<String, Value>,
}

impl Filter {
	pub fn new(sql: impl Into<String>) -> Self {
		Self {
			sql: sql.into(),
			parameters: IndexMap::new(),
		}
	}

	pub fn bind(mut self, name: impl Into<String>, value: Value) -> Self {
		self.parameters.insert(name.into(), value);
		self
	}
}

/// A query against the documents of one design and its subtypes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryPlan {
	pub filter: Option<Filter>,
	pub order_by: Vec<OrderBy>,
	pub skip: usize,
	pub take: Option<usize>,
}

impl QueryPlan {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn filter(mut self, filter: Filter) -> Self {
		self.filter = Some(filter);
		self
	}

	pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
		self.order_by.push(OrderBy {
			column: column.into(),
			direction,
		});
		self
	}

	pub fn skip(mut self, skip: usize) -> Self {
		self.skip = skip;
		self
	}

	pub fn take(mut self, take: usize) -> Self {
		self.take = Some(take);
		self
	}

	/// Checks that ordering only refers to columns of `table`.
	pub fn validate(&self, table: &Table) -> Result<()> {
		for order in &self.order_by {
			if table.column(&order.column).is_none() {
				return_error!(argument::unknown_column(table.name(), &order.column));
			}
		}
		if self.take == Some(0) {
			return_error!(argument::invalid_query("take must be greater than zero"));
		}
		Ok(())
	}
}

/// Paging information of an executed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryStats {
	/// Matches before skip and take were applied.
	pub total_results: usize,
	pub retrieved_results: usize,
	/// Zero-based position of the first returned row among all matches.
	pub first_result: usize,
}
