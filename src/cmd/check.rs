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

use std::path::Path;

use crate::dataset::Dataset;
use crate::error::Fallible;

/// Load a dataset file or directory, or the built-in one, and report whether
/// it is valid.
pub fn check_dataset(dataset: Option<String>) -> Fallible<()> {
    let dataset = match dataset {
        Some(path) => Dataset::load(Path::new(&path))?,
        None => Dataset::builtin()?,
    };
    log::debug!(
        "{} entries in {} topics",
        dataset.len(),
        dataset.topics().len()
    );
    println!("ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use super::check_dataset;
    use crate::error::Fallible;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_builtin_dataset() {
        assert!(check_dataset(None).is_ok());
    }

    #[test]
    fn test_non_existent_path() {
        assert!(check_dataset(Some("./derpherp.toml".to_string())).is_err());
    }

    #[test]
    fn test_duplicate_ids() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let path = dir.join("phrases.toml");
        write(
            &path,
            "[[phrase]]\nid = 1\nde = \"Ja\"\nru = \"Да\"\ntopic = \"basics\"\n\n\
             [[phrase]]\nid = 1\nde = \"Nein\"\nru = \"Нет\"\ntopic = \"basics\"\n",
        )?;
        let result = check_dataset(Some(path.display().to_string()));
        assert_eq!(
            result.err().unwrap().to_string(),
            "error: duplicate entry id: 1"
        );
        Ok(())
    }
}
