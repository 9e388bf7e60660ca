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

use std::fmt::Display;
use std::fmt::Formatter;

use rand::RngCore;
use rand::seq::SliceRandom;

use crate::dataset::Dataset;
use crate::learned::LearnedSet;
use crate::types::entry::PhraseEntry;

/// The most entries a "new words" session contains.
pub const NEW_WORDS_LIMIT: usize = 15;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TopicFilter {
    All,
    Topic(String),
}

impl TopicFilter {
    /// Parse a form value: `all` means every topic.
    pub fn parse(value: &str) -> Self {
        match value {
            "" | "all" => TopicFilter::All,
            topic => TopicFilter::Topic(topic.to_string()),
        }
    }

    fn admits(&self, entry: &PhraseEntry) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Topic(topic) => entry.topic() == topic,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionSize {
    /// At most this many entries, learned or not.
    Count(usize),
    /// Only entries not yet learned, at most `NEW_WORDS_LIMIT`.
    NewOnly,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionError {
    /// Nothing is left to practice after filtering.
    EmptyPool,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::EmptyPool => write!(f, "Everything in this topic is already learned!"),
        }
    }
}

/// The shuffled entries of one practice session. Never empty.
#[derive(Clone, Debug)]
pub struct SessionQueue {
    entries: Vec<PhraseEntry>,
}

impl SessionQueue {
    pub fn entries(&self) -> &[PhraseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<&PhraseEntry> {
        self.entries.get(index)
    }
}

pub fn build_session(
    dataset: &Dataset,
    learned: &LearnedSet,
    topic: &TopicFilter,
    size: SessionSize,
    rng: &mut dyn RngCore,
) -> Result<SessionQueue, SessionError> {
    let mut pool: Vec<PhraseEntry> = dataset
        .entries()
        .iter()
        .filter(|entry| topic.admits(entry))
        .filter(|entry| match size {
            SessionSize::Count(_) => true,
            SessionSize::NewOnly => !learned.contains(entry.id()),
        })
        .cloned()
        .collect();
    let limit = match size {
        SessionSize::Count(count) => count,
        SessionSize::NewOnly => NEW_WORDS_LIMIT,
    };
    pool.shuffle(rng);
    pool.truncate(limit);
    if pool.is_empty() {
        return Err(SessionError::EmptyPool);
    }
    log::debug!("Built a session of {} entries ({topic:?}, {size:?})", pool.len());
    Ok(SessionQueue { entries: pool })
}
