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

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// The unique identifier of a phrase entry.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u32);

impl EntryId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A phrase pair: German source text and its Russian translation.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct PhraseEntry {
    id: EntryId,
    /// The German text.
    #[serde(deserialize_with = "trimmed")]
    de: String,
    /// The Russian translation.
    #[serde(deserialize_with = "trimmed")]
    ru: String,
    /// The topic tag, e.g. `food`.
    #[serde(deserialize_with = "trimmed")]
    topic: String,
    /// An optional grammar note, in Markdown.
    #[serde(default)]
    grammar: Option<String>,
}

fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    Ok(text.trim().to_string())
}

impl PhraseEntry {
    pub fn new(
        id: u32,
        de: impl Into<String>,
        ru: impl Into<String>,
        topic: impl Into<String>,
        grammar: Option<&str>,
    ) -> Self {
        Self {
            id: EntryId::new(id),
            de: de.into().trim().to_string(),
            ru: ru.into().trim().to_string(),
            topic: topic.into().trim().to_string(),
            grammar: grammar.map(|g| g.trim().to_string()),
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn de(&self) -> &str {
        &self.de
    }

    pub fn ru(&self) -> &str {
        &self.ru
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn grammar(&self) -> Option<&str> {
        self.grammar
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }

    /// Case-insensitive substring match against both sides of the pair.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.de.to_lowercase().contains(&query) || self.ru.to_lowercase().contains(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        let entry = PhraseEntry::new(1, "Ich habe Hunger.", "Я голоден.", "food", None);
        assert!(entry.matches(""));
        assert!(entry.matches("hunger"));
        assert!(entry.matches("ГОЛОД"));
        assert!(!entry.matches("Durst"));
    }

    #[test]
    fn test_empty_grammar_is_none() {
        let entry = PhraseEntry::new(1, "Hallo", "Привет", "greetings", Some("  "));
        assert_eq!(entry.grammar(), None);
    }

    #[test]
    fn test_deserialized_text_is_trimmed() -> Result<(), toml::de::Error> {
        let entry: PhraseEntry = toml::from_str(
            "id = 1\nde = \" Ich habe Hunger. \"\nru = \"Я голоден.\\n\"\ntopic = \" food\"\n",
        )?;
        assert_eq!(entry.de(), "Ich habe Hunger.");
        assert_eq!(entry.ru(), "Я голоден.");
        assert_eq!(entry.topic(), "food");
        Ok(())
    }
}
