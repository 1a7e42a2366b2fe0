// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Live schema introspection and reconciliation.

mod introspect;
mod migrator;

pub(crate) use migrator::{SchemaMigrator, drop_tables};
