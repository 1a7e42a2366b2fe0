// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod error;
mod etag;
mod key;
pub mod value;

pub use error::{Error, ErrorKind, Result, diagnostic};
pub use etag::Etag;
pub use key::DocumentKey;
pub use value::{IntoColumnValue, Type, Value};
