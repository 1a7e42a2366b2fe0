// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The docrow unit of work.
//!
//! A [`Session`] tracks the documents an application stores, loads and
//! deletes, hands back the same instance for the same key and turns the
//! accumulated changes into one atomic batch of commands on
//! [`Session::save_changes`].

mod entity;
mod session;

pub use entity::{EntityState, ManagedEntity};
pub use session::Session;
