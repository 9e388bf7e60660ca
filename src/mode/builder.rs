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
use crate::types::entry::PhraseEntry;

/// Punctuation ignored when comparing sentences.
const IGNORED_PUNCTUATION: [char; 4] = ['.', ',', '?', '!'];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    Unchecked,
    Correct,
    Incorrect,
}

/// The player rebuilds the German sentence from its shuffled words.
pub struct BuilderRound {
    item: PhraseEntry,
    /// Every word of the sentence. Tokens are referred to by index.
    tokens: Vec<String>,
    /// Token indices still in the word bank, in display order.
    bank: Vec<usize>,
    /// Token indices placed in the answer, in order.
    assembly: Vec<usize>,
    verdict: Verdict,
    solved: bool,
    touched: bool,
}

impl BuilderRound {
    pub fn new(item: &PhraseEntry, ctx: &mut RoundContext) -> Self {
        let tokens: Vec<String> = item.de().split_whitespace().map(String::from).collect();
        let mut bank: Vec<usize> = (0..tokens.len()).collect();
        bank.shuffle(&mut *ctx.rng);
        Self {
            item: item.clone(),
            tokens,
            bank,
            assembly: Vec::new(),
            verdict: Verdict::Unchecked,
            solved: false,
            touched: false,
        }
    }

    pub fn item(&self) -> &PhraseEntry {
        &self.item
    }

    pub fn token(&self, index: usize) -> &str {
        &self.tokens[index]
    }

    pub fn bank(&self) -> &[usize] {
        &self.bank
    }

    pub fn assembly(&self) -> &[usize] {
        &self.assembly
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Move a token from the bank to the end of the answer, or from the
    /// answer back to the end of the bank. Returns false if there is no such
    /// token.
    pub fn toggle(&mut self, token: usize, ctx: &mut RoundContext) -> bool {
        let moved = if let Some(position) = self.assembly.iter().position(|t| *t == token) {
            self.assembly.remove(position);
            self.bank.push(token);
            ctx.vibrate(&[10]);
            true
        } else if let Some(position) = self.bank.iter().position(|t| *t == token) {
            self.bank.remove(position);
            self.assembly.push(token);
            ctx.vibrate(&[10]);
            ctx.speak(&self.tokens[token]);
            true
        } else {
            false
        };
        self.touched |= moved;
        moved
    }

    pub fn assembled_text(&self) -> String {
        let words: Vec<&str> = self
            .assembly
            .iter()
            .map(|token| self.tokens[*token].as_str())
            .collect();
        words.join(" ")
    }

    /// Compare the answer with the original sentence. Can be repeated any
    /// number of times.
    pub fn check(&mut self, ctx: &mut RoundContext) -> bool {
        self.touched = true;
        if sentences_match(&self.assembled_text(), self.item.de()) {
            self.verdict = Verdict::Correct;
            self.solved = true;
            ctx.vibrate(&[50]);
            true
        } else {
            self.verdict = Verdict::Incorrect;
            ctx.vibrate(&[50, 50]);
            false
        }
    }

    pub fn can_advance(&self) -> bool {
        self.solved
    }

    pub fn is_untouched(&self) -> bool {
        !self.touched
    }
}

fn normalize(sentence: &str) -> String {
    let stripped: String = sentence
        .chars()
        .filter(|c| !IGNORED_PUNCTUATION.contains(c))
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether two sentences are equal up to case, spacing and `.,?!`.
pub fn sentences_match(answer: &str, expected: &str) -> bool {
    normalize(answer) == normalize(expected)
}
