// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;

use super::{DdlCommand, LiveSchema};
use crate::table::Table;

/// Computes the additive changes that bring `live` up to `declared`.
///
/// Missing tables are created and missing columns added. Columns or tables
/// present only in the database are left alone, and existing columns are
/// never altered.
pub fn diff(declared: &IndexMap<String, Table>, live: &LiveSchema) -> Vec<DdlCommand> {
	let mut result = Vec::new();
	for (name, table) in declared {
		match live.table(name) {
			None => result.push(DdlCommand::CreateTable(table.clone())),
			Some(existing) => {
				for column in table.columns() {
					if !existing.has_column(&column.name) {
						result.push(DdlCommand::AddColumn {
							table: name.clone(),
							column: column.clone(),
						});
					}
				}
			}
		}
	}
	result
}
