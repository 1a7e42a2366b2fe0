// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Structured diagnostics carried by every docrow error.
//!
//! Constructors are grouped by the area that raises them. The code prefix of
//! each diagnostic determines its `ErrorKind`.

pub mod argument;
pub mod concurrency;
pub mod configuration;
pub mod internal;
pub mod migration;
pub mod render;
pub mod serialization;
pub mod store;

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Diagnostic {
	pub(crate) fn new(code: &str, message: impl Into<String>) -> Self {
		Self {
			code: code.to_string(),
			message: message.into(),
			label: None,
			help: None,
			notes: vec![],
			cause: None,
		}
	}

	pub(crate) fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub(crate) fn help(mut self, help: impl Into<String>) -> Self {
		self.help = Some(help.into());
		self
	}

	pub(crate) fn note(mut self, note: impl Into<String>) -> Self {
		self.notes.push(note.into());
		self
	}
}
