// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docrow_core::{DeleteCommand, DmlCommand, Etag, InsertCommand, UpdateCommand};
use docrow_type::Result;
use tracing::{debug, instrument};

use super::Session;
use crate::entity::EntityState;

impl Session {
	/// Writes every pending change as one atomic batch and returns the
	/// etag shared by all written rows.
	///
	/// Without pending changes nothing is sent to the database and the etag
	/// of the previous save is returned. On failure, including a
	/// concurrency conflict, the session is left as it was.
	#[instrument(name = "session::save_changes", level = "debug", skip_all, fields(tracked = self.entities.len()))]
	pub fn save_changes(&mut self) -> Result<Option<Etag>> {
		let model = self.store.model().clone();
		let mut commands: Vec<DmlCommand> = Vec::new();
		// entity index and its new serialized form, `None` for deletes
		let mut written: Vec<(usize, Option<Vec<u8>>)> = Vec::new();

		for (index, entity) in self.entities.values().enumerate() {
			let design = model.design(entity.design);
			match entity.state {
				EntityState::Deleted => {
					commands.push(
						DeleteCommand {
							table: entity.table.clone(),
							key: entity.key.clone(),
							expected_etag: entity.etag,
						}
						.into(),
					);
					written.push((index, None));
				}
				EntityState::Transient => {
					let encoded = design.encode(&entity.document, model.serializer())?;
					commands.push(
						InsertCommand {
							table: entity.table.clone(),
							key: entity.key.clone(),
							columns: self.store.columns_for(design, &entity.document, &entity.metadata)?,
						}
						.into(),
					);
					written.push((index, Some(encoded)));
				}
				EntityState::Loaded => {
					let encoded = design.encode(&entity.document, model.serializer())?;
					if !entity.is_dirty(&encoded) {
						continue;
					}
					commands.push(
						UpdateCommand {
							table: entity.table.clone(),
							key: entity.key.clone(),
							expected_etag: entity.etag,
							columns: self.store.columns_for(design, &entity.document, &entity.metadata)?,
						}
						.into(),
					);
					written.push((index, Some(encoded)));
				}
			}
		}
		commands.extend(self.deferred.iter().cloned());

		if commands.is_empty() {
			debug!("no pending changes");
			return Ok(self.last_etag);
		}

		let etag = self.store.execute(&commands)?;

		let mut deleted = Vec::new();
		for (index, encoded) in written {
			let Some((identity, entity)) = self.entities.get_index_mut(index) else {
				continue;
			};
			match encoded {
				Some(encoded) => entity.persisted(etag, encoded),
				None => deleted.push(identity.clone()),
			}
		}
		for identity in deleted {
			self.entities.shift_remove(&identity);
		}
		self.deferred.clear();
		self.last_etag = Some(etag);

		debug!(commands = commands.len(), etag = %etag, "changes saved");
		Ok(Some(etag))
	}
}
