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
use crate::mode::RoundId;
use crate::mode::sample_others;
use crate::types::entry::EntryId;
use crate::types::entry::PhraseEntry;

/// How many entries a grid is built from, if the dataset is large enough.
pub const PAIR_COUNT: usize = 4;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    De,
    Ru,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CardState {
    Open,
    Selected,
    /// Part of a wrong pair, waiting to be turned back to `Open`.
    Mismatched,
    Matched,
}

pub struct MatchCard {
    id: EntryId,
    text: String,
    side: Side,
    state: CardState,
}

impl MatchCard {
    /// The entry this card was made from.
    pub fn entry_id(&self) -> EntryId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn state(&self) -> CardState {
        self.state
    }
}

/// Entitles the holder to turn a mismatched pair back over, as long as the
/// round it was issued for is still being played.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RevertTicket {
    pub round: RoundId,
    serial: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pick {
    Ignored,
    /// The card is held until a second card is picked.
    Pending,
    Matched { won: bool },
    Mismatched(RevertTicket),
}

struct Mismatch {
    serial: u64,
    cards: [usize; 2],
}

/// A grid of German and Russian cards to be paired up.
pub struct MatchRound {
    id: RoundId,
    cards: Vec<MatchCard>,
    pending: Option<usize>,
    matched: usize,
    mismatches: Vec<Mismatch>,
    next_serial: u64,
    touched: bool,
}

impl MatchRound {
    pub fn new(id: RoundId, item: &PhraseEntry, ctx: &mut RoundContext) -> Self {
        let mut pool = vec![item.clone()];
        pool.extend(sample_others(ctx.dataset, item, PAIR_COUNT - 1, &mut *ctx.rng));
        let mut cards = Vec::with_capacity(pool.len() * 2);
        for entry in pool {
            cards.push(MatchCard {
                id: entry.id(),
                text: entry.de().to_string(),
                side: Side::De,
                state: CardState::Open,
            });
            cards.push(MatchCard {
                id: entry.id(),
                text: entry.ru().to_string(),
                side: Side::Ru,
                state: CardState::Open,
            });
        }
        cards.shuffle(&mut *ctx.rng);
        Self {
            id,
            cards,
            pending: None,
            matched: 0,
            mismatches: Vec::new(),
            next_serial: 0,
            touched: false,
        }
    }

    pub fn cards(&self) -> &[MatchCard] {
        &self.cards
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched
    }

    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn is_won(&self) -> bool {
        self.matched == self.pair_count()
    }

    pub fn pick(&mut self, index: usize, ctx: &mut RoundContext) -> Pick {
        let Some(card) = self.cards.get(index) else {
            return Pick::Ignored;
        };
        if card.state != CardState::Open {
            return Pick::Ignored;
        }
        self.touched = true;
        ctx.vibrate(&[20]);
        if card.side == Side::De {
            ctx.speak(&card.text);
        }
        self.cards[index].state = CardState::Selected;

        let Some(first) = self.pending.take() else {
            self.pending = Some(index);
            return Pick::Pending;
        };
        if self.cards[first].id == self.cards[index].id {
            self.cards[first].state = CardState::Matched;
            self.cards[index].state = CardState::Matched;
            self.matched += 1;
            ctx.vibrate(&[50]);
            Pick::Matched {
                won: self.is_won(),
            }
        } else {
            self.cards[first].state = CardState::Mismatched;
            self.cards[index].state = CardState::Mismatched;
            ctx.vibrate(&[30, 30]);
            let serial = self.next_serial;
            self.next_serial += 1;
            self.mismatches.push(Mismatch {
                serial,
                cards: [first, index],
            });
            Pick::Mismatched(RevertTicket {
                round: self.id,
                serial,
            })
        }
    }

    /// Turn a mismatched pair back over. Returns false if the ticket belongs
    /// to another round or was already used.
    pub fn revert(&mut self, ticket: RevertTicket) -> bool {
        if ticket.round != self.id {
            return false;
        }
        let Some(position) = self
            .mismatches
            .iter()
            .position(|mismatch| mismatch.serial == ticket.serial)
        else {
            return false;
        };
        let mismatch = self.mismatches.remove(position);
        for index in mismatch.cards {
            if self.cards[index].state == CardState::Mismatched {
                self.cards[index].state = CardState::Open;
            }
        }
        true
    }

    pub fn can_advance(&self) -> bool {
        self.is_won()
    }

    pub fn is_untouched(&self) -> bool {
        !self.touched
    }
}
