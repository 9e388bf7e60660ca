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

use maud::DOCTYPE;
use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::cue::Cue;
use crate::error::Fallible;

/// What the header shows on every page.
pub struct HeaderStats {
    pub learned: usize,
    pub percent: u32,
}

pub struct Page<'a> {
    pub stats: HeaderStats,
    pub cues: &'a [Cue],
    /// Reload the page after this many milliseconds, so that a pending Match
    /// revert shows up.
    pub reload_after: Option<u64>,
}

pub fn page_template(page: Page, body: Markup) -> Fallible<Markup> {
    let cues = cues_json(page.cues)?;
    let percent = format!("width: {}%", page.stats.percent);
    Ok(html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "wortkarten" }
                link rel="stylesheet" href="/style.css";
            }
            body data-reload-after=[page.reload_after] {
                header {
                    nav {
                        a href="/" { "Practice" }
                        a href="/dictionary" { "Dictionary" }
                    }
                    div.stats {
                        span #header-learned { (page.stats.learned) }
                        " learned · "
                        span #header-percent { (page.stats.percent) "%" }
                    }
                    div.global-progress {
                        div.bar style=(percent) {}
                    }
                }
                main {
                    (body)
                }
                script #cues type="application/json" { (PreEscaped(cues)) }
                script src="/script.js" {};
            }
        }
    })
}

/// Serialize cues for embedding in a `<script>` element.
fn cues_json(cues: &[Cue]) -> Fallible<String> {
    let json = serde_json::to_string(cues)?;
    Ok(json.replace("</", "<\\/"))
}
