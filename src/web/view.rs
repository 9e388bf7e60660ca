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

use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::app::App;
use crate::markdown::markdown_to_html_inline;
use crate::mode::Round;
use crate::mode::builder::BuilderRound;
use crate::mode::builder::Verdict;
use crate::mode::flashcard::FlashcardRound;
use crate::mode::matching::CardState;
use crate::mode::matching::MatchCard;
use crate::mode::matching::MatchRound;
use crate::mode::matching::Side;
use crate::mode::quiz::Mark;
use crate::mode::quiz::QuizRound;
use crate::session::builder::SessionQueue;
use crate::session::controller::Play;
use crate::types::entry::PhraseEntry;
use crate::types::mode::Mode;

/// Session sizes offered on the dashboard. `new` means unlearned entries only.
const SIZES: [(&str, &str); 4] = [
    ("10", "10 phrases"),
    ("20", "20 phrases"),
    ("50", "50 phrases"),
    ("new", "New words"),
];

/// A form that posts a single action, with hidden parameters.
fn action_form(action: &str, params: &[(&str, String)], class: &str, label: Markup) -> Markup {
    html! {
        form action="/" method="post" {
            input type="hidden" name="action" value=(action);
            @for (name, value) in params {
                input type="hidden" name=(name) value=(value);
            }
            button type="submit" class=(class) { (label) }
        }
    }
}

fn disabled_button(class: &str, label: Markup) -> Markup {
    html! {
        button type="button" class=(class) disabled { (label) }
    }
}

pub fn dashboard(app: &App, notice: Option<&str>) -> Markup {
    html! {
        div.dashboard {
            h1 { "What do we practice today?" }
            @if let Some(notice) = notice {
                div.notice { (notice) }
            }
            form action="/" method="post" {
                input type="hidden" name="action" value="Prepare";
                label for="topic-select" { "Topic" }
                select #topic-select name="topic" {
                    option value="all" { "ALL" }
                    @for topic in app.dataset().topics() {
                        option value=(topic) { (topic.to_uppercase()) }
                    }
                }
                div.sizes {
                    @for (value, label) in SIZES {
                        button.main-btn type="submit" name="count" value=(value) { (label) }
                    }
                }
            }
        }
    }
}

fn tab_class(mode: Mode, current: Mode) -> &'static str {
    if mode == current {
        "mode-tab active"
    } else {
        "mode-tab"
    }
}

fn mode_tabs(current: Mode) -> Markup {
    html! {
        div.mode-tabs {
            @for mode in Mode::ALL {
                (action_form("Mode", &[("mode", mode.as_str().to_string())], tab_class(mode, current), html! { (mode.label()) }))
            }
        }
    }
}

pub fn preview(queue: &SessionQueue, mode: Mode) -> Markup {
    html! {
        div.preview {
            h2 { (queue.len()) " phrases in this session" }
            (mode_tabs(mode))
            div #preview-list {
                @for item in queue.entries() {
                    div.preview-item {
                        span { b { (item.de()) } }
                        span.muted { (item.ru()) }
                    }
                }
            }
            div.controls {
                (action_form("Start", &[], "main-btn", html! { "Start" }))
                (action_form("Leave", &[], "link-btn", html! { "Back" }))
            }
        }
    }
}

pub fn game(play: &Play, item: Option<&PhraseEntry>, progress: f64) -> Markup {
    let round = play.round();
    let topic = item.map(|item| item.topic());
    let width = format!("width: {:.0}%", progress * 100.0);
    let unlocked = play.index() == 0 && round.is_untouched();
    let body = match round {
        Round::Flashcard(round) => flashcard(round),
        Round::Quiz(round) => quiz(round),
        Round::Match(round) => matching(round),
        Round::Builder(round) => builder(round),
    };
    let next_label = match round {
        Round::Flashcard(_) => "Got it",
        Round::Quiz(_) | Round::Builder(_) => "Next",
        Round::Match(_) => "Great",
    };
    html! {
        div.game {
            div.step-progress {
                div #step-bar style=(width) {}
            }
            div.step-count {
                @if let Some(topic) = topic {
                    span.topic { (topic.to_uppercase()) " · " }
                }
                (play.index() + 1) " / " (play.queue().len())
            }
            @if unlocked {
                (mode_tabs(round.mode()))
            }
            div #game-area {
                (body)
            }
            div.controls {
                @if round.can_advance() {
                    (action_form("Next", &[], "action-btn", html! { (next_label) }))
                }
                (action_form("Leave", &[], "link-btn", html! { "Quit" }))
            }
        }
    }
}

fn flashcard(round: &FlashcardRound) -> Markup {
    let item = round.item();
    let class = if round.is_revealed() {
        "fc-card flipped"
    } else {
        "fc-card"
    };
    let face = if round.is_revealed() {
        html! {
            div.fc-face.back {
                div.translation { (item.ru()) }
                @if let Some(grammar) = item.grammar() {
                    div.grammar { (PreEscaped(markdown_to_html_inline(grammar))) }
                }
            }
        }
    } else {
        html! {
            div.fc-face.front { (item.de()) }
        }
    };
    html! {
        div.fc-scene {
            (action_form("Flip", &[], class, face))
        }
    }
}

fn option_class(mark: Mark) -> &'static str {
    match mark {
        Mark::Unmarked => "quiz-btn",
        Mark::Correct => "quiz-btn correct",
        Mark::Wrong => "quiz-btn wrong",
    }
}

fn quiz(round: &QuizRound) -> Markup {
    let answered = round.is_answered();
    html! {
        h2.prompt { (round.item().ru()) }
        div.quiz-grid {
            @for (index, option) in round.options().iter().enumerate() {
                @let class = option_class(option.mark());
                @if answered {
                    (disabled_button(class, html! { (option.text()) }))
                } @else {
                    (action_form("Answer", &[("index", index.to_string())], class, html! { (option.text()) }))
                }
            }
        }
    }
}

fn card_class(card: &MatchCard) -> String {
    let side = match card.side() {
        Side::De => "de",
        Side::Ru => "ru",
    };
    let state = match card.state() {
        CardState::Open => "",
        CardState::Selected => " selected",
        CardState::Mismatched => " selected mismatched",
        CardState::Matched => " matched",
    };
    format!("match-card {side}{state}")
}

fn matching(round: &MatchRound) -> Markup {
    html! {
        h3.prompt { "Find the pairs" }
        div.match-grid {
            @for (index, card) in round.cards().iter().enumerate() {
                @let class = card_class(card);
                @if card.state() == CardState::Open {
                    (action_form("Pick", &[("index", index.to_string())], &class, html! { (card.text()) }))
                } @else {
                    (disabled_button(&class, html! { (card.text()) }))
                }
            }
        }
        div.match-count { (round.matched_pairs()) " / " (round.pair_count()) }
    }
}

fn builder(round: &BuilderRound) -> Markup {
    let message = match round.verdict() {
        Verdict::Unchecked => html! {},
        Verdict::Correct => html! { div.build-msg.correct { "Correct!" } },
        Verdict::Incorrect => html! { div.build-msg.wrong { "Not quite" } },
    };
    html! {
        h3.prompt { (round.item().ru()) }
        div.builder-area #drop-zone {
            @for token in round.assembly() {
                (action_form("Move", &[("index", token.to_string())], "word-chip", html! { (round.token(*token)) }))
            }
        }
        div.word-bank {
            @for token in round.bank() {
                (action_form("Move", &[("index", token.to_string())], "word-chip", html! { (round.token(*token)) }))
            }
        }
        (message)
        @if !round.can_advance() {
            (action_form("Check", &[], "action-btn", html! { "Check" }))
        }
    }
}

pub fn completed(count: usize) -> Markup {
    html! {
        div.completed {
            div.trophy { "🏆" }
            h1 { "Well done!" }
            p { "You practiced " (count) " phrases." }
            (action_form("Finish", &[], "main-btn", html! { "Finish" }))
        }
    }
}

pub fn dictionary(app: &App, query: &str) -> Markup {
    let lang = app.dataset().lang();
    html! {
        div.dictionary {
            form.search action="/dictionary" method="get" {
                input #search-input type="search" name="q" value=(query) placeholder="Search";
                button type="submit" { "Search" }
            }
            div #dict-list {
                @for entry in app.dataset().search(query) {
                    @let learned = app.learned().contains(entry.id());
                    div.dict-item.learned[learned] {
                        (action_form(
                            "Toggle",
                            &[("id", entry.id().to_string()), ("q", query.to_string())],
                            if learned { "check-circle checked" } else { "check-circle" },
                            html! { "✓" },
                        ))
                        button.dict-text.speak type="button" data-text=(entry.de()) data-lang=(lang) {
                            b { (entry.de()) }
                            span { (entry.ru()) }
                        }
                    }
                }
            }
            form.confirm action="/" method="post" data-question="Reset all progress?" {
                input type="hidden" name="action" value="Reset";
                input type="hidden" name="confirm" value="";
                button.link-btn type="submit" { "Reset progress" }
            }
        }
    }
}
