// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::Diagnostic;
use crate::value::Type;

/// No design was registered for the requested document type
pub fn missing_design(type_name: &str) -> Diagnostic {
	Diagnostic::new("CONFIG_001", format!("no design registered for document type `{}`", type_name))
		.label("unknown document type")
		.help("register the type with `Configuration::document` before building the store")
}

pub fn duplicate_discriminator(table: &str, discriminator: &str) -> Diagnostic {
	Diagnostic::new(
		"CONFIG_002",
		format!("discriminator `{}` is already used by another design in table `{}`", discriminator, table),
	)
	.label("duplicate discriminator")
	.help("give one of the designs an explicit discriminator")
}

/// Projection return type cannot be stored in the existing column
pub fn projection_type_mismatch(table: &str, column: &str, existing: Type, projected: Type) -> Diagnostic {
	Diagnostic::new(
		"CONFIG_003",
		format!(
			"projection for column `{}.{}` returns `{}` but the column is of type `{}`",
			table, column, projected, existing
		),
	)
	.label("projection type is not assignable to the column type")
	.help("change the projection's return type or project into a differently named column")
}

pub fn reserved_column(column: &str) -> Diagnostic {
	Diagnostic::new("CONFIG_004", format!("column `{}` is reserved for system use", column))
		.label("reserved column name")
		.help("document keys are configured with `key`, other system columns are maintained by the store")
}

pub fn duplicate_column(table: &str, column: &str) -> Diagnostic {
	Diagnostic::new("CONFIG_005", format!("table `{}` already has a column named `{}`", table, column))
		.label("column names must be unique within a table")
}

pub fn invalid_table_name(name: &str, reason: &str) -> Diagnostic {
	Diagnostic::new("CONFIG_006", format!("invalid table name `{}`: {}", name, reason)).label("invalid table name")
}

/// Migrations must be registered as 1, 2, 3, ...
pub fn migration_version_gap(expected: u32, actual: u32) -> Diagnostic {
	Diagnostic::new(
		"CONFIG_007",
		format!("migration registered with version {} but version {} was expected", actual, expected),
	)
	.label("migration versions must be consecutive and start at 1")
	.help("renumber the migrations so that there are no gaps")
}

pub fn database_not_initialized(tables: &[String]) -> Diagnostic {
	Diagnostic::new("CONFIG_008", "database is not empty and was not initialized by docrow")
		.label("foreign tables found")
		.help("use an empty database, or use ephemeral table mode for tests")
		.note(format!("found tables: {}", tables.join(", ")))
}

pub fn design_already_registered(type_name: &str) -> Diagnostic {
	Diagnostic::new("CONFIG_009", format!("document type `{}` is already registered", type_name))
		.label("duplicate design")
}

pub fn missing_parent_design(child: &str, parent: &str) -> Diagnostic {
	Diagnostic::new(
		"CONFIG_010",
		format!("cannot register `{}` as a subdocument of `{}` which has no design", child, parent),
	)
	.label("parent design must be registered first")
}

pub fn invalid_primary_key(table: &str, count: usize) -> Diagnostic {
	Diagnostic::new(
		"CONFIG_011",
		format!("table `{}` must have exactly one primary key column, found {}", table, count),
	)
	.label("invalid primary key")
}

/// The database was migrated by a newer configuration
pub fn schema_version_ahead(database: u32, configured: u32) -> Diagnostic {
	Diagnostic::new(
		"CONFIG_012",
		format!(
			"database schema is at version {} but only {} migrations are configured",
			database, configured
		),
	)
	.label("database is ahead of the configuration")
	.help("run a build that knows about every applied migration")
}
