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

use crate::mode::Round;
use crate::mode::RoundContext;
use crate::mode::RoundId;
use crate::mode::matching::RevertTicket;
use crate::session::builder::SessionQueue;
use crate::types::entry::PhraseEntry;
use crate::types::mode::Mode;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ControllerError {
    NotPreviewing,
    NotInProgress,
    NotCompleted,
    /// The mode cannot change once play has begun.
    ModeLocked,
    /// The current round is not finished.
    CannotAdvance,
    /// The action belongs to a different mode than the one being played.
    WrongMode,
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            ControllerError::NotPreviewing => "no session is being previewed",
            ControllerError::NotInProgress => "no session is in progress",
            ControllerError::NotCompleted => "the session is not completed",
            ControllerError::ModeLocked => "the mode cannot change after play has begun",
            ControllerError::CannotAdvance => "the current round is not finished",
            ControllerError::WrongMode => "the action does not apply to the current mode",
        };
        write!(f, "{message}")
    }
}

/// A session being played.
pub struct Play {
    queue: SessionQueue,
    index: usize,
    round_id: RoundId,
    round: Round,
}

impl Play {
    pub fn queue(&self) -> &SessionQueue {
        &self.queue
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn round(&self) -> &Round {
        &self.round
    }
}

pub enum Phase {
    Idle,
    Previewing(SessionQueue),
    InProgress(Play),
    Completed(SessionQueue),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Advanced {
    Next,
    Completed,
}

/// Owns the session state machine:
///
/// ```text
/// Idle -> Previewing -> InProgress -> Completed -> Idle
/// ```
pub struct Controller {
    phase: Phase,
    mode: Mode,
    next_round: RoundId,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            mode: Mode::default(),
            next_round: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Show a freshly built queue. Replaces any previous session.
    pub fn preview(&mut self, queue: SessionQueue) {
        self.phase = Phase::Previewing(queue);
    }

    pub fn start(&mut self, ctx: &mut RoundContext) -> Result<(), ControllerError> {
        let queue = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Previewing(queue) => queue,
            other => {
                self.phase = other;
                return Err(ControllerError::NotPreviewing);
            }
        };
        let round_id = self.next_round_id();
        // Queues are never empty.
        let round = Round::new(self.mode, round_id, &queue.entries()[0], ctx);
        log::debug!("Session started: {} entries, mode {}", queue.len(), self.mode);
        self.phase = Phase::InProgress(Play {
            queue,
            index: 0,
            round_id,
            round,
        });
        Ok(())
    }

    /// Change the mode. Allowed before play, and on the first round as long
    /// as the player has not touched it; the round is then rebuilt.
    pub fn select_mode(&mut self, mode: Mode, ctx: &mut RoundContext) -> Result<(), ControllerError> {
        if let Phase::InProgress(play) = &self.phase {
            if play.index != 0 || !play.round.is_untouched() {
                return Err(ControllerError::ModeLocked);
            }
        }
        self.mode = mode;
        ctx.vibrate(&[30]);
        let id = self.next_round_id();
        if let Phase::InProgress(play) = &mut self.phase {
            if let Some(item) = play.queue.get(play.index) {
                play.round = Round::new(mode, id, item, ctx);
                play.round_id = id;
            }
        }
        Ok(())
    }

    /// Move on to the next entry, once the current round allows it.
    pub fn advance(&mut self, ctx: &mut RoundContext) -> Result<Advanced, ControllerError> {
        let mut play = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::InProgress(play) if play.round.can_advance() => play,
            Phase::InProgress(play) => {
                self.phase = Phase::InProgress(play);
                return Err(ControllerError::CannotAdvance);
            }
            other => {
                self.phase = other;
                return Err(ControllerError::NotInProgress);
            }
        };
        let index = play.index + 1;
        let Some(item) = play.queue.get(index).cloned() else {
            log::info!("Session completed: {} entries practiced", play.queue.len());
            ctx.vibrate(&[100, 50, 100]);
            self.phase = Phase::Completed(play.queue);
            return Ok(Advanced::Completed);
        };
        let id = self.next_round_id();
        play.index = index;
        play.round = Round::new(self.mode, id, &item, ctx);
        play.round_id = id;
        self.phase = Phase::InProgress(play);
        Ok(Advanced::Next)
    }

    /// Leave the completion screen for the dashboard.
    pub fn finish(&mut self) -> Result<(), ControllerError> {
        match self.phase {
            Phase::Completed(_) => {
                self.phase = Phase::Idle;
                Ok(())
            }
            _ => Err(ControllerError::NotCompleted),
        }
    }

    /// Drop whatever session exists and return to the dashboard.
    pub fn abandon(&mut self) {
        if !matches!(self.phase, Phase::Idle) {
            log::debug!("Session abandoned");
        }
        self.phase = Phase::Idle;
    }

    /// Forget the session and the selected mode. Round ids keep counting so
    /// tickets issued before the reset stay stale.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.mode = Mode::default();
    }

    /// The round being played.
    pub fn round_mut(&mut self) -> Result<&mut Round, ControllerError> {
        match &mut self.phase {
            Phase::InProgress(play) => Ok(&mut play.round),
            _ => Err(ControllerError::NotInProgress),
        }
    }

    /// Apply a deferred Match revert. Stale tickets are ignored.
    pub fn revert_mismatch(&mut self, ticket: RevertTicket) -> bool {
        match &mut self.phase {
            Phase::InProgress(Play {
                round: Round::Match(round),
                ..
            }) => round.revert(ticket),
            _ => false,
        }
    }

    /// The id of the round being played.
    pub fn round_id(&self) -> Option<RoundId> {
        match &self.phase {
            Phase::InProgress(play) => Some(play.round_id),
            _ => None,
        }
    }

    /// The entry of the round being played.
    pub fn current(&self) -> Option<&PhraseEntry> {
        match &self.phase {
            Phase::InProgress(play) => play.queue.get(play.index),
            _ => None,
        }
    }

    /// The fraction of the session already done.
    pub fn progress(&self) -> f64 {
        match &self.phase {
            Phase::Idle | Phase::Previewing(_) => 0.0,
            Phase::InProgress(play) => play.index as f64 / play.queue.len() as f64,
            Phase::Completed(_) => 1.0,
        }
    }

    /// How many entries the completed session covered.
    pub fn completed_count(&self) -> Option<usize> {
        match &self.phase {
            Phase::Completed(queue) => Some(queue.len()),
            _ => None,
        }
    }

    fn next_round_id(&mut self) -> RoundId {
        let id = self.next_round;
        self.next_round += 1;
        id
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::Cue;
    use crate::cue::CueQueue;
    use crate::dataset::Dataset;
    use crate::error::Fallible;
    use crate::learned::LearnedSet;
    use crate::mode::matching::CardState;
    use crate::mode::matching::Pick;
    use crate::mode::testing::rng;
    use crate::mode::testing::small_dataset;
    use crate::session::builder::SessionSize;
    use crate::session::builder::TopicFilter;
    use crate::session::builder::build_session;

    fn queue(dataset: &Dataset, count: usize) -> SessionQueue {
        build_session(
            dataset,
            &LearnedSet::empty(),
            &TopicFilter::All,
            SessionSize::Count(count),
            &mut rng(99),
        )
        .unwrap()
    }

    #[test]
    fn test_completes_after_exactly_n_advances() -> Fallible<()> {
        let dataset = small_dataset()?;
        let mut rng = rng(0);
        let mut cues = CueQueue::new();
        let mut ctx = RoundContext {
            dataset: &dataset,
            rng: &mut rng,
            cues: &mut cues,
        };
        let mut controller = Controller::new();
        assert_eq!(controller.progress(), 0.0);
        controller.preview(queue(&dataset, 4));
        assert_eq!(controller.progress(), 0.0);
        controller.start(&mut ctx).unwrap();
        for step in 1..=4 {
            assert!(matches!(controller.phase(), Phase::InProgress(_)));
            let result = controller.advance(&mut ctx).unwrap();
            if step < 4 {
                assert_eq!(result, Advanced::Next);
                assert_eq!(controller.progress(), step as f64 / 4.0);
            } else {
                assert_eq!(result, Advanced::Completed);
            }
        }
        assert!(matches!(controller.phase(), Phase::Completed(_)));
        assert_eq!(controller.progress(), 1.0);
        assert_eq!(controller.completed_count(), Some(4));
        assert_eq!(
            controller.advance(&mut ctx),
            Err(ControllerError::NotInProgress)
        );
        controller.finish().unwrap();
        assert!(matches!(controller.phase(), Phase::Idle));
        assert!(cues.cues().contains(&Cue::Vibrate {
            pattern: vec![100, 50, 100],
        }));
        Ok(())
    }

    #[test]
    fn test_start_requires_preview() -> Fallible<()> {
        let dataset = small_dataset()?;
        let mut rng = rng(0);
        let mut cues = CueQueue::new();
        let mut ctx = RoundContext {
            dataset: &dataset,
            rng: &mut rng,
            cues: &mut cues,
        };
        let mut controller = Controller::new();
        assert_eq!(controller.start(&mut ctx), Err(ControllerError::NotPreviewing));
        assert_eq!(controller.finish(), Err(ControllerError::NotCompleted));
        assert!(matches!(controller.phase(), Phase::Idle));
        Ok(())
    }

    #[test]
    fn test_quiz_blocks_advance_until_answered() -> Fallible<()> {
        let dataset = small_dataset()?;
        let mut rng = rng(1);
        let mut cues = CueQueue::new();
        let mut ctx = RoundContext {
            dataset: &dataset,
            rng: &mut rng,
            cues: &mut cues,
        };
        let mut controller = Controller::new();
        controller.select_mode(Mode::Quiz, &mut ctx).unwrap();
        controller.preview(queue(&dataset, 2));
        controller.start(&mut ctx).unwrap();
        assert_eq!(
            controller.advance(&mut ctx),
            Err(ControllerError::CannotAdvance)
        );
        let Round::Quiz(round) = controller.round_mut().unwrap() else {
            panic!("expected a quiz round");
        };
        round.answer(0, &mut ctx);
        assert_eq!(controller.advance(&mut ctx), Ok(Advanced::Next));
        Ok(())
    }

    #[test]
    fn test_mode_locks_after_first_interaction() -> Fallible<()> {
        let dataset = small_dataset()?;
        let mut rng = rng(2);
        let mut cues = CueQueue::new();
        let mut ctx = RoundContext {
            dataset: &dataset,
            rng: &mut rng,
            cues: &mut cues,
        };
        let mut controller = Controller::new();
        controller.preview(queue(&dataset, 3));
        controller.select_mode(Mode::Builder, &mut ctx).unwrap();
        controller.start(&mut ctx).unwrap();
        // Still untouched: switching rebuilds the round.
        controller.select_mode(Mode::Match, &mut ctx).unwrap();
        let Round::Match(round) = controller.round_mut().unwrap() else {
            panic!("expected a match round");
        };
        round.pick(0, &mut ctx);
        assert_eq!(
            controller.select_mode(Mode::Quiz, &mut ctx),
            Err(ControllerError::ModeLocked)
        );
        assert_eq!(controller.mode(), Mode::Match);
        Ok(())
    }

    #[test]
    fn test_mode_locks_after_first_entry() -> Fallible<()> {
        let dataset = small_dataset()?;
        let mut rng = rng(3);
        let mut cues = CueQueue::new();
        let mut ctx = RoundContext {
            dataset: &dataset,
            rng: &mut rng,
            cues: &mut cues,
        };
        let mut controller = Controller::new();
        controller.preview(queue(&dataset, 3));
        controller.start(&mut ctx).unwrap();
        controller.advance(&mut ctx).unwrap();
        assert_eq!(
            controller.select_mode(Mode::Quiz, &mut ctx),
            Err(ControllerError::ModeLocked)
        );
        Ok(())
    }

    #[test]
    fn test_match_round_consumes_one_entry() -> Fallible<()> {
        let dataset = small_dataset()?;
        let mut rng = rng(4);
        let mut cues = CueQueue::new();
        let mut ctx = RoundContext {
            dataset: &dataset,
            rng: &mut rng,
            cues: &mut cues,
        };
        let mut controller = Controller::new();
        controller.select_mode(Mode::Match, &mut ctx).unwrap();
        controller.preview(queue(&dataset, 2));
        controller.start(&mut ctx).unwrap();
        let first = controller.current().unwrap().id();
        let Round::Match(round) = controller.round_mut().unwrap() else {
            panic!("expected a match round");
        };
        assert!(round.cards().iter().any(|card| card.entry_id() == first));
        for i in 0..round.cards().len() {
            if round.cards()[i].state() != CardState::Open {
                continue;
            }
            let id = round.cards()[i].entry_id();
            let j = (0..round.cards().len())
                .find(|j| *j != i && round.cards()[*j].entry_id() == id)
                .unwrap();
            round.pick(i, &mut ctx);
            assert!(matches!(round.pick(j, &mut ctx), Pick::Matched { .. }));
        }
        assert_eq!(controller.advance(&mut ctx), Ok(Advanced::Next));
        let Phase::InProgress(play) = controller.phase() else {
            panic!("expected play");
        };
        assert_eq!(play.index(), 1);
        assert_ne!(controller.current().unwrap().id(), first);
        Ok(())
    }

    /// Pick two cards from different entries and return the revert ticket.
    fn mismatch(controller: &mut Controller, ctx: &mut RoundContext) -> RevertTicket {
        let Round::Match(round) = controller.round_mut().unwrap() else {
            panic!("expected a match round");
        };
        let id = round.cards()[0].entry_id();
        let other = (1..round.cards().len())
            .find(|i| round.cards()[*i].entry_id() != id)
            .unwrap();
        round.pick(0, ctx);
        let Pick::Mismatched(ticket) = round.pick(other, ctx) else {
            panic!("expected a mismatch");
        };
        ticket
    }

    #[test]
    fn test_revert_through_controller() -> Fallible<()> {
        let dataset = small_dataset()?;
        let mut rng = rng(5);
        let mut cues = CueQueue::new();
        let mut ctx = RoundContext {
            dataset: &dataset,
            rng: &mut rng,
            cues: &mut cues,
        };
        let mut controller = Controller::new();
        controller.select_mode(Mode::Match, &mut ctx).unwrap();
        controller.preview(queue(&dataset, 3));
        controller.start(&mut ctx).unwrap();
        let ticket = mismatch(&mut controller, &mut ctx);
        assert!(controller.revert_mismatch(ticket));
        assert!(!controller.revert_mismatch(ticket));
        let Round::Match(round) = controller.round_mut().unwrap() else {
            panic!("expected a match round");
        };
        assert!(
            round
                .cards()
                .iter()
                .all(|card| card.state() == CardState::Open)
        );
        Ok(())
    }

    #[test]
    fn test_stale_revert_is_ignored_by_a_new_round() -> Fallible<()> {
        let dataset = small_dataset()?;
        let mut rng = rng(6);
        let mut cues = CueQueue::new();
        let mut ctx = RoundContext {
            dataset: &dataset,
            rng: &mut rng,
            cues: &mut cues,
        };
        let mut controller = Controller::new();
        controller.select_mode(Mode::Match, &mut ctx).unwrap();
        controller.preview(queue(&dataset, 3));
        controller.start(&mut ctx).unwrap();
        let stale = mismatch(&mut controller, &mut ctx);

        // Restart before the revert fires.
        controller.abandon();
        controller.preview(queue(&dataset, 3));
        controller.start(&mut ctx).unwrap();
        mismatch(&mut controller, &mut ctx);
        assert!(!controller.revert_mismatch(stale));
        let Round::Match(round) = controller.round_mut().unwrap() else {
            panic!("expected a match round");
        };
        let waiting = round
            .cards()
            .iter()
            .filter(|card| card.state() == CardState::Mismatched)
            .count();
        assert_eq!(waiting, 2);
        Ok(())
    }

    #[test]
    fn test_abandon_returns_to_idle() -> Fallible<()> {
        let dataset = small_dataset()?;
        let mut rng = rng(7);
        let mut cues = CueQueue::new();
        let mut ctx = RoundContext {
            dataset: &dataset,
            rng: &mut rng,
            cues: &mut cues,
        };
        let mut controller = Controller::new();
        controller.preview(queue(&dataset, 3));
        controller.start(&mut ctx).unwrap();
        controller.abandon();
        assert!(matches!(controller.phase(), Phase::Idle));
        assert!(controller.current().is_none());
        Ok(())
    }

    #[test]
    fn test_reset_keeps_round_ids_unique() -> Fallible<()> {
        let dataset = small_dataset()?;
        let mut rng = rng(8);
        let mut cues = CueQueue::new();
        let mut ctx = RoundContext {
            dataset: &dataset,
            rng: &mut rng,
            cues: &mut cues,
        };
        let mut controller = Controller::new();
        controller.preview(queue(&dataset, 3));
        controller.start(&mut ctx).unwrap();
        let before = controller.round_id().unwrap();
        controller.reset();
        assert!(matches!(controller.phase(), Phase::Idle));
        assert_eq!(controller.mode(), Mode::default());
        controller.preview(queue(&dataset, 3));
        controller.start(&mut ctx).unwrap();
        assert!(controller.round_id().unwrap() > before);
        Ok(())
    }
}
