// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeSet;

use crate::error::Fallible;
use crate::store::KeyValueStore;
use crate::types::entry::EntryId;

/// The key the learned set is persisted under.
pub const LEARNED_KEY: &str = "learned";

/// The set of entries the user has marked as learned.
///
/// The set is persisted as a JSON array of ids in ascending order, so the
/// serialized form depends only on membership.
#[derive(Default, Debug, PartialEq)]
pub struct LearnedSet {
    ids: BTreeSet<EntryId>,
}

impl LearnedSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read the learned set from the store. A missing, unreadable, or
    /// malformed value yields the empty set.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(LEARNED_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::empty(),
            Err(e) => {
                log::warn!("Failed to read the learned set, starting empty: {e}");
                return Self::empty();
            }
        };
        match serde_json::from_str::<Vec<EntryId>>(&raw) {
            Ok(ids) => Self {
                ids: ids.into_iter().collect(),
            },
            Err(e) => {
                log::warn!("Malformed learned set, starting empty: {e}");
                Self::empty()
            }
        }
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The learned share of a dataset of `total` entries, as a rounded
    /// percentage.
    pub fn percent_of(&self, total: usize) -> u32 {
        if total == 0 {
            return 0;
        }
        ((self.ids.len() as f64 / total as f64) * 100.0).round() as u32
    }

    /// Flip the membership of `id` and write the set through to the store.
    /// Returns whether `id` is now learned. If the write fails, the
    /// in-memory set is left unchanged.
    pub fn toggle(&mut self, id: EntryId, store: &mut dyn KeyValueStore) -> Fallible<bool> {
        let learned = if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        };
        let result = self.serialize().and_then(|raw| store.set(LEARNED_KEY, &raw));
        if let Err(e) = result {
            if learned {
                self.ids.remove(&id);
            } else {
                self.ids.insert(id);
            }
            return Err(e);
        }
        log::debug!("Entry {id} learned={learned}");
        Ok(learned)
    }

    fn serialize(&self) -> Fallible<String> {
        let ids: Vec<EntryId> = self.ids.iter().copied().collect();
        Ok(serde_json::to_string(&ids)?)
    }
}
