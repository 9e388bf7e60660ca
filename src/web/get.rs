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

use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use serde::Deserialize;

use crate::error::Fallible;
use crate::mode::Round;
use crate::mode::matching::CardState;
use crate::session::controller::Phase;
use crate::web::state::MutableState;
use crate::web::state::ServerState;
use crate::web::template::HeaderStats;
use crate::web::template::Page;
use crate::web::template::page_template;
use crate::web::view;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let delay = state.mismatch_delay.as_millis() as u64;
    let mut mutable = state.lock();
    respond(render_root(&mut mutable, delay))
}

#[derive(Deserialize)]
pub struct DictionaryQuery {
    #[serde(default)]
    q: String,
}

pub async fn dictionary_handler(
    State(state): State<ServerState>,
    Query(query): Query<DictionaryQuery>,
) -> (StatusCode, Html<String>) {
    let mut mutable = state.lock();
    let body = view::dictionary(&mutable.app, query.q.trim());
    respond(render_page(&mut mutable, body, None))
}

fn respond(result: Fallible<Markup>) -> (StatusCode, Html<String>) {
    match result {
        Ok(html) => (StatusCode::OK, Html(html.into_string())),
        Err(e) => {
            log::error!("{e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("Internal Server Error".to_string()),
            )
        }
    }
}

fn render_root(mutable: &mut MutableState, delay: u64) -> Fallible<Markup> {
    let notice = mutable.app.take_notice();
    let controller = mutable.app.controller();
    let mut reload_after = None;
    let body = match controller.phase() {
        Phase::Idle => view::dashboard(&mutable.app, notice.as_deref()),
        Phase::Previewing(queue) => view::preview(queue, controller.mode()),
        Phase::InProgress(play) => {
            if let Round::Match(round) = play.round() {
                let waiting = round
                    .cards()
                    .iter()
                    .any(|card| card.state() == CardState::Mismatched);
                if waiting {
                    // Give the revert task a head start.
                    reload_after = Some(delay + 50);
                }
            }
            view::game(play, controller.current(), controller.progress())
        }
        Phase::Completed(_) => view::completed(controller.completed_count().unwrap_or_default()),
    };
    render_page(mutable, body, reload_after)
}

/// Wrap a body in the page chrome, handing the pending cues to the browser.
fn render_page(
    mutable: &mut MutableState,
    body: Markup,
    reload_after: Option<u64>,
) -> Fallible<Markup> {
    let app = &mut mutable.app;
    let stats = HeaderStats {
        learned: app.learned().len(),
        percent: app.learned().percent_of(app.dataset().len()),
    };
    let cues = app.take_cues();
    page_template(
        Page {
            stats,
            cues: &cues,
            reload_after,
        },
        body,
    )
}
