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

use crate::error::ErrorReport;
use crate::error::fail;

/// The practice modes a session can be played in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Mode {
    #[default]
    Flashcard,
    Quiz,
    Match,
    Builder,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Flashcard, Mode::Quiz, Mode::Match, Mode::Builder];

    /// The identifier used in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Flashcard => "flashcards",
            Mode::Quiz => "quiz",
            Mode::Match => "match",
            Mode::Builder => "builder",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Flashcard => "Cards",
            Mode::Quiz => "Quiz",
            Mode::Match => "Pairs",
            Mode::Builder => "Builder",
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Mode {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "flashcards" => Ok(Mode::Flashcard),
            "quiz" => Ok(Mode::Quiz),
            "match" => Ok(Mode::Match),
            "builder" => Ok(Mode::Builder),
            _ => fail(format!("Invalid mode: {}", value)),
        }
    }
}
