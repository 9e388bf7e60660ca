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

use serde::Serialize;

/// Fire-and-forget feedback: speech and vibration. Implementations must
/// never fail; an unsupported capability is silently skipped.
pub trait Cues {
    fn speak(&mut self, text: &str, lang: &str);

    fn vibrate(&mut self, pattern: &[u32]);
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Cue {
    Speak { text: String, lang: String },
    Vibrate { pattern: Vec<u32> },
}

/// Buffers cues until the next page is rendered, which hands them to the
/// browser to play.
#[derive(Default, Debug)]
pub struct CueQueue {
    cues: Vec<Cue>,
}

impl CueQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn drain(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

impl Cues for CueQueue {
    fn speak(&mut self, text: &str, lang: &str) {
        self.cues.push(Cue::Speak {
            text: text.to_string(),
            lang: lang.to_string(),
        });
    }

    fn vibrate(&mut self, pattern: &[u32]) {
        self.cues.push(Cue::Vibrate {
            pattern: pattern.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_the_queue() {
        let mut queue = CueQueue::new();
        queue.speak("Hallo", "de-DE");
        queue.vibrate(&[50, 50]);
        let cues = queue.drain();
        assert_eq!(cues.len(), 2);
        assert!(queue.cues().is_empty());
    }

    #[test]
    fn test_serialization() {
        let cues = vec![
            Cue::Speak {
                text: "Hallo".to_string(),
                lang: "de-DE".to_string(),
            },
            Cue::Vibrate {
                pattern: vec![100, 50, 100],
            },
        ];
        let json = serde_json::to_string(&cues).unwrap();
        assert_eq!(
            json,
            r#"[{"kind":"speak","text":"Hallo","lang":"de-DE"},{"kind":"vibrate","pattern":[100,50,100]}]"#
        );
    }
}
