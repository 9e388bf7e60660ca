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

use rand::seq::SliceRandom;

use crate::mode::RoundContext;
use crate::mode::sample_others;
use crate::types::entry::EntryId;
use crate::types::entry::PhraseEntry;

/// How many options a question offers, if the dataset is large enough.
pub const OPTION_COUNT: usize = 4;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mark {
    Unmarked,
    Correct,
    Wrong,
}

pub struct QuizOption {
    id: EntryId,
    text: String,
    mark: Mark,
}

impl QuizOption {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Answer {
    /// The question was already answered, or the option does not exist.
    Ignored,
    Correct,
    Wrong,
}

/// Shows the translation and asks for the German text among four options.
pub struct QuizRound {
    item: PhraseEntry,
    options: Vec<QuizOption>,
}

impl QuizRound {
    /// Build the options and pronounce the answer.
    pub fn new(item: &PhraseEntry, ctx: &mut RoundContext) -> Self {
        let mut entries = sample_others(ctx.dataset, item, OPTION_COUNT - 1, &mut *ctx.rng);
        entries.push(item.clone());
        entries.shuffle(&mut *ctx.rng);
        let options = entries
            .into_iter()
            .map(|entry| QuizOption {
                id: entry.id(),
                text: entry.de().to_string(),
                mark: Mark::Unmarked,
            })
            .collect();
        ctx.speak(item.de());
        Self {
            item: item.clone(),
            options,
        }
    }

    pub fn item(&self) -> &PhraseEntry {
        &self.item
    }

    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    pub fn is_answered(&self) -> bool {
        self.options.iter().any(|option| option.mark == Mark::Correct)
    }

    /// Pick the option at `index`. The first pick settles the question; the
    /// right answer is always revealed.
    pub fn answer(&mut self, index: usize, ctx: &mut RoundContext) -> Answer {
        if self.is_answered() || index >= self.options.len() {
            return Answer::Ignored;
        }
        if self.options[index].id == self.item.id() {
            self.options[index].mark = Mark::Correct;
            ctx.vibrate(&[50]);
            Answer::Correct
        } else {
            self.options[index].mark = Mark::Wrong;
            let item_id = self.item.id();
            if let Some(option) = self.options.iter_mut().find(|option| option.id == item_id) {
                option.mark = Mark::Correct;
            }
            ctx.vibrate(&[50, 50, 50]);
            Answer::Wrong
        }
    }

    pub fn can_advance(&self) -> bool {
        self.is_answered()
    }

    pub fn is_untouched(&self) -> bool {
        !self.is_answered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::Cue;
    use crate::cue::CueQueue;
    use crate::dataset::Dataset;
    use crate::error::Fallible;
    use crate::mode::testing::rng;
    use crate::mode::testing::small_dataset;

    fn correct_count(round: &QuizRound) -> usize {
        round
            .options()
            .iter()
            .filter(|option| option.mark() == Mark::Correct)
            .count()
    }

    #[test]
    fn test_options_contain_the_item() -> Fallible<()> {
        let dataset = small_dataset()?;
        for seed in 0..20 {
            let mut rng = rng(seed);
            let mut cues = CueQueue::new();
            let mut ctx = RoundContext {
                dataset: &dataset,
                rng: &mut rng,
                cues: &mut cues,
            };
            let item = &dataset.entries()[(seed as usize) % dataset.len()];
            let round = QuizRound::new(item, &mut ctx);
            assert_eq!(round.options().len(), OPTION_COUNT);
            assert_eq!(
                round
                    .options()
                    .iter()
                    .filter(|option| option.text() == item.de())
                    .count(),
                1
            );
            assert!(!round.can_advance());
            assert_eq!(
                cues.cues(),
                &[Cue::Speak {
                    text: item.de().to_string(),
                    lang: "de-DE".to_string(),
                }]
            );
        }
        Ok(())
    }

    #[test]
    fn test_every_pick_marks_exactly_one_correct() -> Fallible<()> {
        let dataset = small_dataset()?;
        let item = dataset.entries()[2].clone();
        for index in 0..OPTION_COUNT {
            let mut rng = rng(7);
            let mut cues = CueQueue::new();
            let mut ctx = RoundContext {
                dataset: &dataset,
                rng: &mut rng,
                cues: &mut cues,
            };
            let mut round = QuizRound::new(&item, &mut ctx);
            let picked_item = round.options()[index].text() == item.de();
            let answer = round.answer(index, &mut ctx);
            assert_eq!(correct_count(&round), 1);
            assert!(round.can_advance());
            if picked_item {
                assert_eq!(answer, Answer::Correct);
            } else {
                assert_eq!(answer, Answer::Wrong);
                assert_eq!(round.options()[index].mark(), Mark::Wrong);
            }
            // The correct option is the one carrying the item's text.
            let correct = round
                .options()
                .iter()
                .find(|option| option.mark() == Mark::Correct)
                .unwrap();
            assert_eq!(correct.text(), item.de());
        }
        Ok(())
    }

    #[test]
    fn test_second_pick_is_ignored() -> Fallible<()> {
        let dataset = small_dataset()?;
        let mut rng = rng(3);
        let mut cues = CueQueue::new();
        let mut ctx = RoundContext {
            dataset: &dataset,
            rng: &mut rng,
            cues: &mut cues,
        };
        let item = dataset.entries()[0].clone();
        let mut round = QuizRound::new(&item, &mut ctx);
        let wrong = round
            .options()
            .iter()
            .position(|option| option.text() != item.de())
            .unwrap();
        assert_eq!(round.answer(wrong, &mut ctx), Answer::Wrong);
        for index in 0..OPTION_COUNT {
            assert_eq!(round.answer(index, &mut ctx), Answer::Ignored);
        }
        assert_eq!(correct_count(&round), 1);
        assert_eq!(round.answer(99, &mut ctx), Answer::Ignored);
        Ok(())
    }

    #[test]
    fn test_small_dataset_gives_fewer_options() -> Fallible<()> {
        let dataset = Dataset::new(vec![
            PhraseEntry::new(1, "Ja", "Да", "basics", None),
            PhraseEntry::new(2, "Nein", "Нет", "basics", None),
        ])?;
        let mut rng = rng(0);
        let mut cues = CueQueue::new();
        let mut ctx = RoundContext {
            dataset: &dataset,
            rng: &mut rng,
            cues: &mut cues,
        };
        let round = QuizRound::new(&dataset.entries()[0], &mut ctx);
        assert_eq!(round.options().len(), 2);
        Ok(())
    }
}
