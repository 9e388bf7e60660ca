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

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;
use std::time::Instant;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::entry::EntryId;
use crate::types::entry::PhraseEntry;

const BUILTIN: &str = include_str!("../data/phrases.toml");

/// The language tag used when the dataset does not declare one.
pub const DEFAULT_LANG: &str = "de-DE";

/// The static, read-only collection of phrase entries.
pub struct Dataset {
    /// The BCP 47 tag of the source language, used for speech.
    lang: String,
    entries: Vec<PhraseEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DatasetFile {
    lang: Option<String>,
    #[serde(default)]
    phrase: Vec<PhraseEntry>,
}

impl Dataset {
    #[cfg(test)]
    pub fn new(entries: Vec<PhraseEntry>) -> Fallible<Self> {
        Self::with_lang(DEFAULT_LANG, entries)
    }

    /// Build a dataset, checking that ids are unique and every entry has
    /// text on both sides and a topic.
    pub fn with_lang(lang: &str, entries: Vec<PhraseEntry>) -> Fallible<Self> {
        if entries.is_empty() {
            return fail("dataset is empty.");
        }
        let mut seen: HashSet<EntryId> = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id()) {
                return fail(format!("duplicate entry id: {}", entry.id()));
            }
            if entry.de().trim().is_empty() || entry.ru().trim().is_empty() {
                return fail(format!("entry {} is missing text.", entry.id()));
            }
            if entry.topic().trim().is_empty() {
                return fail(format!("entry {} has no topic.", entry.id()));
            }
        }
        Ok(Self {
            lang: lang.to_string(),
            entries,
        })
    }

    /// The dataset compiled into the binary.
    pub fn builtin() -> Fallible<Self> {
        let file = parse_file(BUILTIN)?;
        Self::with_lang(file.lang.as_deref().unwrap_or(DEFAULT_LANG), file.phrase)
    }

    /// Load a dataset from a TOML file, or from every `.toml` file under a
    /// directory.
    pub fn load(path: &Path) -> Fallible<Self> {
        if !path.exists() {
            return fail("dataset path does not exist.");
        }
        log::debug!("Loading dataset from {}...", path.display());
        let start = Instant::now();
        let mut files = Vec::new();
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry?;
                let file = entry.path();
                if file.is_file() && file.extension().is_some_and(|ext| ext == "toml") {
                    files.push(parse_file(&read_to_string(file)?)?);
                }
            }
        } else {
            files.push(parse_file(&read_to_string(path)?)?);
        }
        let mut lang: Option<String> = None;
        let mut entries = Vec::new();
        for file in files {
            if let Some(file_lang) = file.lang {
                match &lang {
                    Some(existing) if *existing != file_lang => {
                        return fail(format!(
                            "dataset files disagree on language: {existing} and {file_lang}."
                        ));
                    }
                    _ => lang = Some(file_lang),
                }
            }
            entries.extend(file.phrase);
        }
        let duration = start.elapsed().as_millis();
        log::debug!("Loaded {} entries in {duration}ms.", entries.len());
        Self::with_lang(lang.as_deref().unwrap_or(DEFAULT_LANG), entries)
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn entries(&self) -> &[PhraseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: EntryId) -> Option<&PhraseEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Distinct topics, in order of first appearance.
    pub fn topics(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|entry| entry.topic())
            .filter(|topic| seen.insert(*topic))
            .collect()
    }

    /// Entries whose German or Russian text contains `query`, ignoring case.
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a PhraseEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.matches(query))
    }
}

fn parse_file(content: &str) -> Fallible<DatasetFile> {
    let file: DatasetFile = toml::from_str(content)?;
    Ok(file)
}
