// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SQLite backed storage for docrow documents.
//!
//! The [`Store`] owns a connection pool, reconciles the database schema
//! with a [`DocumentModel`](docrow_core::DocumentModel) when it opens, and
//! executes batches of DML commands atomically with optimistic concurrency.

mod config;
mod connection;
mod executor;
mod reprojection;
mod schema;
mod sql;
mod stats;
mod store;

pub use config::{DbPath, IsolationLevel, JournalMode, ReprojectionConfig, StoreConfig, SynchronousMode, TableMode};
pub use stats::StoreStats;
pub use store::{Materialized, Store};
