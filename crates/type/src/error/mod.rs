// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::{Deref, DerefMut},
};

pub mod diagnostic;
mod r#macro;

use diagnostic::{Diagnostic, render::DefaultRenderer};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Diagnostic);

/// Coarse classification of a diagnostic, derived from its code prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	Configuration,
	Concurrency,
	Argument,
	Migration,
	DuplicateKey,
	Resource,
	Serialization,
	Internal,
}

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Error {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let out = DefaultRenderer::render_string(&self.0);
		f.write_str(out.as_str())
	}
}

impl Error {
	pub fn diagnostic(self) -> Diagnostic {
		self.0
	}

	pub fn kind(&self) -> ErrorKind {
		let code = self.0.code.as_str();
		if code.starts_with("CONFIG_") {
			ErrorKind::Configuration
		} else if code.starts_with("CONCURRENCY_") {
			ErrorKind::Concurrency
		} else if code.starts_with("ARGUMENT_") {
			ErrorKind::Argument
		} else if code.starts_with("MIGRATION_") {
			ErrorKind::Migration
		} else if code.starts_with("DUPLICATE_") {
			ErrorKind::DuplicateKey
		} else if code.starts_with("STORE_") {
			ErrorKind::Resource
		} else if code.starts_with("SERDE_") {
			ErrorKind::Serialization
		} else {
			ErrorKind::Internal
		}
	}

	pub fn is_concurrency(&self) -> bool {
		self.kind() == ErrorKind::Concurrency
	}

	/// Attaches the error that caused this one.
	pub fn with_cause(mut self, cause: Error) -> Self {
		self.0.cause = Some(Box::new(cause.0));
		self
	}
}

impl std::error::Error for Error {}

impl From<Diagnostic> for Error {
	fn from(diagnostic: Diagnostic) -> Self {
		Error(diagnostic)
	}
}
