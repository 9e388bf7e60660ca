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

use crate::mode::RoundContext;
use crate::types::entry::PhraseEntry;

/// Shows the German side; flipping reveals the translation and grammar note.
/// There is nothing to get wrong, so the round can always be advanced.
pub struct FlashcardRound {
    item: PhraseEntry,
    revealed: bool,
    flipped: bool,
}

impl FlashcardRound {
    pub fn new(item: &PhraseEntry) -> Self {
        Self {
            item: item.clone(),
            revealed: false,
            flipped: false,
        }
    }

    pub fn item(&self) -> &PhraseEntry {
        &self.item
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Turn the card over. Every flip pronounces the German text.
    pub fn flip(&mut self, ctx: &mut RoundContext) {
        self.revealed = !self.revealed;
        self.flipped = true;
        ctx.speak(self.item.de());
    }

    pub fn can_advance(&self) -> bool {
        true
    }

    pub fn is_untouched(&self) -> bool {
        !self.flipped
    }
}
