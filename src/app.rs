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

use rand::rngs::StdRng;

use crate::cue::Cue;
use crate::cue::CueQueue;
use crate::dataset::Dataset;
use crate::error::Fallible;
use crate::learned::LearnedSet;
use crate::mode::Round;
use crate::mode::RoundContext;
use crate::mode::matching::Pick;
use crate::mode::matching::RevertTicket;
use crate::mode::quiz::Answer;
use crate::session::builder::SessionError;
use crate::session::builder::SessionSize;
use crate::session::builder::TopicFilter;
use crate::session::builder::build_session;
use crate::session::controller::ControllerError;
use crate::session::controller::Controller;
use crate::store::KeyValueStore;
use crate::types::entry::EntryId;
use crate::types::mode::Mode;

/// A user action.
#[derive(Clone, PartialEq, Debug)]
pub enum Intent {
    BuildSession { topic: TopicFilter, size: SessionSize },
    SelectMode(Mode),
    Start,
    /// Flashcard: turn the card over.
    Flip,
    /// Quiz: choose an option.
    Answer(usize),
    /// Match: pick a card.
    Pick(usize),
    /// Builder: move a word between the bank and the answer.
    MoveToken(usize),
    /// Builder: check the answer.
    Check,
    Advance,
    /// Leave the completion screen.
    Finish,
    /// Abandon the session.
    Leave,
    ToggleLearned(EntryId),
    /// Forget all progress. Callers must have asked the user first.
    ResetProgress,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Outcome {
    Applied,
    /// Nothing happened, e.g. a second answer to a quiz question.
    Ignored,
    Rejected(ControllerError),
    EmptyPool,
    /// A Match pair was wrong; the ticket must be redeemed after a delay.
    Mismatch(RevertTicket),
}

impl From<ControllerError> for Outcome {
    fn from(value: ControllerError) -> Self {
        Outcome::Rejected(value)
    }
}

/// The whole application state.
pub struct App {
    dataset: Dataset,
    store: Box<dyn KeyValueStore>,
    learned: LearnedSet,
    controller: Controller,
    rng: StdRng,
    cues: CueQueue,
    notice: Option<String>,
}

impl App {
    pub fn new(dataset: Dataset, store: Box<dyn KeyValueStore>, rng: StdRng) -> Self {
        let learned = LearnedSet::load(store.as_ref());
        log::debug!("{} of {} entries learned", learned.len(), dataset.len());
        Self {
            dataset,
            store,
            learned,
            controller: Controller::new(),
            rng,
            cues: CueQueue::new(),
            notice: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn learned(&self) -> &LearnedSet {
        &self.learned
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Cues produced since the last call.
    pub fn take_cues(&mut self) -> Vec<Cue> {
        self.cues.drain()
    }

    /// The one-shot message for the next page, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn dispatch(&mut self, intent: Intent) -> Fallible<Outcome> {
        let mut ctx = RoundContext {
            dataset: &self.dataset,
            rng: &mut self.rng,
            cues: &mut self.cues,
        };
        let controller = &mut self.controller;
        let outcome = match intent {
            Intent::BuildSession { topic, size } => {
                ctx.vibrate(&[50]);
                match build_session(ctx.dataset, &self.learned, &topic, size, &mut *ctx.rng) {
                    Ok(queue) => {
                        controller.preview(queue);
                        Outcome::Applied
                    }
                    Err(e @ SessionError::EmptyPool) => {
                        self.notice = Some(e.to_string());
                        Outcome::EmptyPool
                    }
                }
            }
            Intent::SelectMode(mode) => match controller.select_mode(mode, &mut ctx) {
                Ok(()) => Outcome::Applied,
                Err(e) => e.into(),
            },
            Intent::Start => match controller.start(&mut ctx) {
                Ok(()) => Outcome::Applied,
                Err(e) => e.into(),
            },
            Intent::Flip => match controller.round_mut() {
                Ok(Round::Flashcard(round)) => {
                    round.flip(&mut ctx);
                    Outcome::Applied
                }
                Ok(_) => ControllerError::WrongMode.into(),
                Err(e) => e.into(),
            },
            Intent::Answer(index) => match controller.round_mut() {
                Ok(Round::Quiz(round)) => match round.answer(index, &mut ctx) {
                    Answer::Ignored => Outcome::Ignored,
                    _ => Outcome::Applied,
                },
                Ok(_) => ControllerError::WrongMode.into(),
                Err(e) => e.into(),
            },
            Intent::Pick(index) => match controller.round_mut() {
                Ok(Round::Match(round)) => match round.pick(index, &mut ctx) {
                    Pick::Ignored => Outcome::Ignored,
                    Pick::Mismatched(ticket) => Outcome::Mismatch(ticket),
                    Pick::Matched { won: true } => {
                        log::debug!("All pairs found");
                        Outcome::Applied
                    }
                    Pick::Pending | Pick::Matched { won: false } => Outcome::Applied,
                },
                Ok(_) => ControllerError::WrongMode.into(),
                Err(e) => e.into(),
            },
            Intent::MoveToken(token) => match controller.round_mut() {
                Ok(Round::Builder(round)) => {
                    if round.toggle(token, &mut ctx) {
                        Outcome::Applied
                    } else {
                        Outcome::Ignored
                    }
                }
                Ok(_) => ControllerError::WrongMode.into(),
                Err(e) => e.into(),
            },
            Intent::Check => match controller.round_mut() {
                Ok(Round::Builder(round)) => {
                    round.check(&mut ctx);
                    Outcome::Applied
                }
                Ok(_) => ControllerError::WrongMode.into(),
                Err(e) => e.into(),
            },
            Intent::Advance => match controller.advance(&mut ctx) {
                Ok(_) => Outcome::Applied,
                Err(e) => e.into(),
            },
            Intent::Finish => match controller.finish() {
                Ok(()) => Outcome::Applied,
                Err(e) => e.into(),
            },
            Intent::Leave => {
                controller.abandon();
                Outcome::Applied
            }
            Intent::ToggleLearned(id) => {
                if ctx.dataset.get(id).is_none() {
                    log::warn!("Toggling unknown entry {id}");
                    Outcome::Ignored
                } else {
                    ctx.vibrate(&[20]);
                    self.learned.toggle(id, self.store.as_mut())?;
                    Outcome::Applied
                }
            }
            Intent::ResetProgress => {
                self.store.clear()?;
                self.learned = LearnedSet::empty();
                controller.reset();
                self.cues = CueQueue::new();
                self.notice = None;
                log::info!("Progress reset");
                Outcome::Applied
            }
        };
        Ok(outcome)
    }

    /// Redeem a Match revert ticket.
    pub fn revert(&mut self, ticket: RevertTicket) -> bool {
        self.controller.revert_mismatch(ticket)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::learned::LEARNED_KEY;
    use crate::mode::testing::small_dataset;
    use crate::session::controller::Phase;
    use crate::store::MemoryStore;

    fn app() -> Fallible<App> {
        Ok(App::new(
            small_dataset()?,
            Box::new(MemoryStore::new()),
            StdRng::seed_from_u64(0),
        ))
    }

    fn build(topic: &str, size: SessionSize) -> Intent {
        Intent::BuildSession {
            topic: TopicFilter::parse(topic),
            size,
        }
    }

    #[test]
    fn test_flashcard_session_end_to_end() -> Fallible<()> {
        let mut app = app()?;
        assert_eq!(
            app.dispatch(build("food", SessionSize::Count(10)))?,
            Outcome::Applied
        );
        let Phase::Previewing(queue) = app.controller().phase() else {
            panic!("expected a preview");
        };
        assert_eq!(queue.len(), 3);
        assert_eq!(app.dispatch(Intent::Start)?, Outcome::Applied);
        for _ in 0..3 {
            assert_eq!(app.dispatch(Intent::Flip)?, Outcome::Applied);
            assert_eq!(app.dispatch(Intent::Advance)?, Outcome::Applied);
        }
        assert_eq!(app.controller().completed_count(), Some(3));
        assert_eq!(app.dispatch(Intent::Finish)?, Outcome::Applied);
        assert!(matches!(app.controller().phase(), Phase::Idle));
        let cues = app.take_cues();
        assert!(cues.contains(&Cue::Vibrate {
            pattern: vec![100, 50, 100],
        }));
        assert!(app.take_cues().is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_pool_leaves_a_notice() -> Fallible<()> {
        let mut app = app()?;
        for id in [1, 2, 3] {
            app.dispatch(Intent::ToggleLearned(EntryId::new(id)))?;
        }
        assert_eq!(
            app.dispatch(build("food", SessionSize::NewOnly))?,
            Outcome::EmptyPool
        );
        assert!(matches!(app.controller().phase(), Phase::Idle));
        assert!(app.take_notice().is_some());
        assert!(app.take_notice().is_none());
        Ok(())
    }

    #[test]
    fn test_wrong_mode_intent_is_rejected() -> Fallible<()> {
        let mut app = app()?;
        app.dispatch(build("all", SessionSize::Count(2)))?;
        app.dispatch(Intent::Start)?;
        assert_eq!(
            app.dispatch(Intent::Check)?,
            Outcome::Rejected(ControllerError::WrongMode)
        );
        assert_eq!(
            app.dispatch(Intent::Pick(0))?,
            Outcome::Rejected(ControllerError::WrongMode)
        );
        Ok(())
    }

    #[test]
    fn test_intent_without_session_is_rejected() -> Fallible<()> {
        let mut app = app()?;
        assert_eq!(
            app.dispatch(Intent::Advance)?,
            Outcome::Rejected(ControllerError::NotInProgress)
        );
        assert_eq!(
            app.dispatch(Intent::Start)?,
            Outcome::Rejected(ControllerError::NotPreviewing)
        );
        Ok(())
    }

    #[test]
    fn test_toggle_and_reset() -> Fallible<()> {
        let mut app = app()?;
        app.dispatch(Intent::ToggleLearned(EntryId::new(2)))?;
        assert!(app.learned().contains(EntryId::new(2)));
        assert_eq!(
            app.dispatch(Intent::ToggleLearned(EntryId::new(404)))?,
            Outcome::Ignored
        );
        app.dispatch(build("all", SessionSize::Count(2)))?;
        assert_eq!(app.dispatch(Intent::ResetProgress)?, Outcome::Applied);
        assert!(app.learned().is_empty());
        assert!(matches!(app.controller().phase(), Phase::Idle));
        assert_eq!(app.store.get(LEARNED_KEY)?, None);
        Ok(())
    }

    #[test]
    fn test_learned_set_survives_restart() -> Fallible<()> {
        let mut store = MemoryStore::new();
        store.set(LEARNED_KEY, "[1,3]")?;
        let app = App::new(small_dataset()?, Box::new(store), StdRng::seed_from_u64(0));
        assert_eq!(app.learned().len(), 2);
        Ok(())
    }
}
