// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashMap;

use parking_lot::RwLock;

/// Derives table names and discriminators from Rust type names.
pub trait TypeMapper: Send + Sync {
	fn discriminator(&self, type_name: &'static str) -> String;

	fn table_name(&self, type_name: &'static str) -> String {
		short_name(type_name).to_string()
	}
}

/// `my_crate::model::Entity` becomes `Entity`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShortNameTypeMapper;

impl TypeMapper for ShortNameTypeMapper {
	fn discriminator(&self, type_name: &'static str) -> String {
		short_name(type_name).to_string()
	}
}

/// Uses the full path of the type as discriminator.
#[derive(Debug, Default, Clone, Copy)]
pub struct FullNameTypeMapper;

impl TypeMapper for FullNameTypeMapper {
	fn discriminator(&self, type_name: &'static str) -> String {
		type_name.to_string()
	}
}

/// Memoizes the discriminators of another mapper.
pub struct CachedTypeMapper<M> {
	inner: M,
	cache: RwLock<HashMap<&'static str, String>>,
}

impl<M: TypeMapper> CachedTypeMapper<M> {
	pub fn new(inner: M) -> Self {
		Self {
			inner,
			cache: RwLock::new(HashMap::new()),
		}
	}
}

impl<M: TypeMapper> TypeMapper for CachedTypeMapper<M> {
	fn discriminator(&self, type_name: &'static str) -> String {
		if let Some(hit) = self.cache.read().get(type_name) {
			return hit.clone();
		}
		let discriminator = self.inner.discriminator(type_name);
		self.cache.write().insert(type_name, discriminator.clone());
		discriminator
	}

	fn table_name(&self, type_name: &'static str) -> String {
		self.inner.table_name(type_name)
	}
}

fn short_name(type_name: &str) -> &str {
	let base = type_name.split('<').next().unwrap_or(type_name);
	base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
	use std::any::type_name;

	use super::*;

	struct Entity;

	#[test]
	fn test_short_name() {
		assert_eq!(ShortNameTypeMapper.discriminator(type_name::<Entity>()), "Entity");
		assert_eq!(ShortNameTypeMapper.table_name(type_name::<Entity>()), "Entity");
		assert_eq!(short_name("a::b::Wrapper<a::b::Inner>"), "Wrapper");
	}

	#[test]
	fn test_full_name() {
		let name = FullNameTypeMapper.discriminator(type_name::<Entity>());
		assert!(name.ends_with("tests::Entity"));
		assert!(name.contains("::"));
	}

	#[test]
	fn test_cached_mapper() {
		let mapper = CachedTypeMapper::new(ShortNameTypeMapper);
		assert_eq!(mapper.discriminator(type_name::<Entity>()), "Entity");
		assert_eq!(mapper.discriminator(type_name::<Entity>()), "Entity");
		assert_eq!(mapper.cache.read().len(), 1);
	}
}
