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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use tokio::task::AbortHandle;

use crate::app::App;
use crate::mode::RoundId;

#[derive(Clone)]
pub struct ServerState {
    pub mismatch_delay: Duration,
    pub mutable: Arc<Mutex<MutableState>>,
}

impl ServerState {
    pub fn new(mismatch_delay: Duration, app: App) -> Self {
        Self {
            mismatch_delay,
            mutable: Arc::new(Mutex::new(MutableState {
                app,
                reverts: Vec::new(),
            })),
        }
    }

    /// Lock the mutable state, recovering it if a handler panicked.
    pub fn lock(&self) -> MutexGuard<'_, MutableState> {
        self.mutable.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct MutableState {
    pub app: App,
    /// Scheduled Match reverts and the round they belong to.
    pub reverts: Vec<(RoundId, AbortHandle)>,
}

impl MutableState {
    /// Abort the revert tasks of rounds that are no longer being played, and
    /// forget the ones that already ran.
    pub fn abort_stale_reverts(&mut self) {
        let current = self.app.controller().round_id();
        self.reverts.retain(|(round, handle)| {
            if handle.is_finished() {
                false
            } else if Some(*round) == current {
                true
            } else {
                log::debug!("Aborting revert for round {round}");
                handle.abort();
                false
            }
        });
    }
}
