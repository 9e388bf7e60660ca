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

//! The four practice modes. Each mode plays one round per queue entry and
//! decides on its own when the session may advance.

pub mod builder;
pub mod flashcard;
pub mod matching;
pub mod quiz;

use rand::RngCore;
use rand::seq::SliceRandom;

use crate::cue::Cues;
use crate::dataset::Dataset;
use crate::mode::builder::BuilderRound;
use crate::mode::flashcard::FlashcardRound;
use crate::mode::matching::MatchRound;
use crate::mode::quiz::QuizRound;
use crate::types::entry::PhraseEntry;
use crate::types::mode::Mode;

/// Identifies a round within the lifetime of the process.
pub type RoundId = u64;

/// Everything a round needs from the outside world.
pub struct RoundContext<'a> {
    pub dataset: &'a Dataset,
    pub rng: &'a mut dyn RngCore,
    pub cues: &'a mut dyn Cues,
}

impl RoundContext<'_> {
    /// Speak source-language text.
    pub fn speak(&mut self, text: &str) {
        self.cues.speak(text, self.dataset.lang());
    }

    pub fn vibrate(&mut self, pattern: &[u32]) {
        self.cues.vibrate(pattern);
    }
}

/// The mode-local state of the round being played.
pub enum Round {
    Flashcard(FlashcardRound),
    Quiz(QuizRound),
    Match(MatchRound),
    Builder(BuilderRound),
}

impl Round {
    pub fn new(mode: Mode, id: RoundId, item: &PhraseEntry, ctx: &mut RoundContext) -> Self {
        log::debug!("Round {id}: {mode} for entry {}", item.id());
        match mode {
            Mode::Flashcard => Round::Flashcard(FlashcardRound::new(item)),
            Mode::Quiz => Round::Quiz(QuizRound::new(item, ctx)),
            Mode::Match => Round::Match(MatchRound::new(id, item, ctx)),
            Mode::Builder => Round::Builder(BuilderRound::new(item, ctx)),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Round::Flashcard(_) => Mode::Flashcard,
            Round::Quiz(_) => Mode::Quiz,
            Round::Match(_) => Mode::Match,
            Round::Builder(_) => Mode::Builder,
        }
    }

    /// Whether the player has finished this round.
    pub fn can_advance(&self) -> bool {
        match self {
            Round::Flashcard(round) => round.can_advance(),
            Round::Quiz(round) => round.can_advance(),
            Round::Match(round) => round.can_advance(),
            Round::Builder(round) => round.can_advance(),
        }
    }

    /// True until the player has interacted with the round.
    pub fn is_untouched(&self) -> bool {
        match self {
            Round::Flashcard(round) => round.is_untouched(),
            Round::Quiz(round) => round.is_untouched(),
            Round::Match(round) => round.is_untouched(),
            Round::Builder(round) => round.is_untouched(),
        }
    }
}

/// Up to `n` distinct entries other than `item`, sampled uniformly.
pub fn sample_others(
    dataset: &Dataset,
    item: &PhraseEntry,
    n: usize,
    rng: &mut dyn RngCore,
) -> Vec<PhraseEntry> {
    let others: Vec<&PhraseEntry> = dataset
        .entries()
        .iter()
        .filter(|entry| entry.id() != item.id())
        .collect();
    others
        .choose_multiple(rng, n)
        .map(|entry| (*entry).clone())
        .collect()
}
