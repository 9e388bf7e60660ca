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

use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use crate::collection::open_store;
use crate::collection::resolve_directory;
use crate::error::Fallible;
use crate::store::KeyValueStore;

/// Forget every learned entry in the collection, after asking unless `yes`.
pub fn reset_progress(directory: Option<String>, yes: bool) -> Fallible<()> {
    let directory = resolve_directory(directory)?;
    if !yes {
        print!("Reset all progress in {}? [y/N] ", directory.display());
        stdout().flush()?;
        let mut answer = String::new();
        stdin().read_line(&mut answer)?;
        if !confirmed(&answer) {
            println!("Aborted.");
            return Ok(());
        }
    }
    let mut store = open_store(&directory)?;
    store.clear()?;
    log::info!("Progress reset");
    println!("Progress reset.");
    Ok(())
}

fn confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::DB_FILE;
    use crate::helper::create_tmp_directory;
    use crate::learned::LEARNED_KEY;

    #[test]
    fn test_confirmed() {
        assert!(confirmed("y\n"));
        assert!(confirmed(" YES "));
        assert!(!confirmed("\n"));
        assert!(!confirmed("no"));
    }

    #[test]
    fn test_reset_clears_the_store() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        {
            let mut store = open_store(&dir)?;
            store.set(LEARNED_KEY, "[1,2]")?;
        }
        reset_progress(Some(dir.display().to_string()), true)?;
        assert!(dir.join(DB_FILE).exists());
        let store = open_store(&dir)?;
        assert_eq!(store.get(LEARNED_KEY)?, None);
        Ok(())
    }
}
