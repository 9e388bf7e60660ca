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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;
use serde::Deserialize;
use tokio::time::sleep;

use crate::app::Intent;
use crate::app::Outcome;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::mode::matching::RevertTicket;
use crate::session::builder::SessionSize;
use crate::session::builder::TopicFilter;
use crate::types::entry::EntryId;
use crate::types::mode::Mode;
use crate::web::state::ServerState;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
enum Action {
    Prepare,
    Mode,
    Start,
    Flip,
    Answer,
    Pick,
    Move,
    Check,
    Next,
    Finish,
    Leave,
    Toggle,
    Reset,
}

#[derive(Debug, Deserialize)]
pub struct FormData {
    action: Action,
    topic: Option<String>,
    /// A number of entries, or `new`.
    count: Option<String>,
    mode: Option<Mode>,
    index: Option<usize>,
    id: Option<u32>,
    confirm: Option<String>,
    /// The dictionary search to return to.
    q: Option<String>,
}

impl FormData {
    /// Translate the form into an intent. `None` means there is nothing to
    /// do.
    fn intent(&self) -> Fallible<Option<Intent>> {
        let intent = match self.action {
            Action::Prepare => Intent::BuildSession {
                topic: TopicFilter::parse(self.topic.as_deref().unwrap_or("all")),
                size: parse_size(self.count.as_deref())?,
            },
            Action::Mode => Intent::SelectMode(required(self.mode, "mode")?),
            Action::Start => Intent::Start,
            Action::Flip => Intent::Flip,
            Action::Answer => Intent::Answer(required(self.index, "index")?),
            Action::Pick => Intent::Pick(required(self.index, "index")?),
            Action::Move => Intent::MoveToken(required(self.index, "index")?),
            Action::Check => Intent::Check,
            Action::Next => Intent::Advance,
            Action::Finish => Intent::Finish,
            Action::Leave => Intent::Leave,
            Action::Toggle => Intent::ToggleLearned(EntryId::new(required(self.id, "id")?)),
            Action::Reset => {
                if self.confirm.as_deref() != Some("yes") {
                    log::warn!("Reset without confirmation.");
                    return Ok(None);
                }
                Intent::ResetProgress
            }
        };
        Ok(Some(intent))
    }

    /// Where the browser goes next.
    fn redirect(&self) -> Redirect {
        match (self.action, self.q.as_deref()) {
            (Action::Toggle, Some(q)) if !q.is_empty() => {
                let q = utf8_percent_encode(q, NON_ALPHANUMERIC);
                Redirect::to(&format!("/dictionary?q={q}"))
            }
            (Action::Toggle, _) => Redirect::to("/dictionary"),
            _ => Redirect::to("/"),
        }
    }
}

fn required<T>(value: Option<T>, name: &str) -> Fallible<T> {
    value.ok_or_else(|| ErrorReport::new(format!("missing form field: {name}")))
}

fn parse_size(count: Option<&str>) -> Fallible<SessionSize> {
    match count {
        Some("new") => Ok(SessionSize::NewOnly),
        Some(count) => match count.parse::<usize>() {
            Ok(n) if n > 0 => Ok(SessionSize::Count(n)),
            _ => fail(format!("invalid session size: {count}")),
        },
        None => fail("missing form field: count"),
    }
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    match action_handler(&state, &form) {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e}");
        }
    }
    form.redirect()
}

fn action_handler(state: &ServerState, form: &FormData) -> Fallible<()> {
    let Some(intent) = form.intent()? else {
        return Ok(());
    };
    let mut mutable = state.lock();
    let outcome = mutable.app.dispatch(intent.clone())?;
    match outcome {
        Outcome::Applied | Outcome::EmptyPool => {}
        Outcome::Ignored => {
            log::debug!("Ignored {intent:?}");
        }
        Outcome::Rejected(e) => {
            log::warn!("Rejected {intent:?}: {e}");
        }
        Outcome::Mismatch(ticket) => {
            let handle = schedule_revert(state, ticket);
            mutable.reverts.push((ticket.round, handle));
        }
    }
    mutable.abort_stale_reverts();
    Ok(())
}

/// Turn a wrong Match pair back over once the player has seen it.
fn schedule_revert(state: &ServerState, ticket: RevertTicket) -> tokio::task::AbortHandle {
    let state = state.clone();
    let task = tokio::spawn(async move {
        sleep(state.mismatch_delay).await;
        let mut mutable = state.lock();
        if mutable.app.revert(ticket) {
            log::debug!("Reverted mismatch in round {}", ticket.round);
        }
    });
    task.abort_handle()
}
