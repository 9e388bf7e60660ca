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

use std::env::current_dir;
use std::path::Path;
use std::path::PathBuf;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::SqliteStore;

pub const DB_FILE: &str = "wortkarten.db";

/// A directory holding the progress database and optional configuration,
/// plus the dataset being practiced.
pub struct Collection {
    pub directory: PathBuf,
    pub config: Config,
    pub store: SqliteStore,
    pub dataset: Dataset,
}

impl Collection {
    /// Open the collection in `directory` (default: the current directory).
    /// `dataset` overrides the dataset named in the configuration; with
    /// neither, the built-in dataset is used.
    pub fn new(directory: Option<String>, dataset: Option<String>) -> Fallible<Self> {
        let directory = resolve_directory(directory)?;
        let config = Config::load(&directory)?;
        let dataset = load_dataset(&directory, &config, dataset)?;
        let store = open_store(&directory)?;
        Ok(Self {
            directory,
            config,
            store,
            dataset,
        })
    }
}

pub fn resolve_directory(directory: Option<String>) -> Fallible<PathBuf> {
    let directory: PathBuf = match directory {
        Some(dir) => PathBuf::from(dir),
        None => current_dir()?,
    };
    if directory.exists() {
        Ok(directory.canonicalize()?)
    } else {
        fail("directory does not exist.")
    }
}

pub fn open_store(directory: &Path) -> Fallible<SqliteStore> {
    let db_path: PathBuf = directory.join(DB_FILE);
    let db_path: &str = db_path
        .to_str()
        .ok_or_else(|| ErrorReport::new("invalid path"))?;
    SqliteStore::new(db_path)
}

/// Pick the dataset: the explicit path, then the configured one (relative
/// to the collection), then the built-in one.
pub fn load_dataset(
    directory: &Path,
    config: &Config,
    dataset: Option<String>,
) -> Fallible<Dataset> {
    match (dataset, &config.dataset) {
        (Some(path), _) => Dataset::load(Path::new(&path)),
        (None, Some(path)) => Dataset::load(&directory.join(path)),
        (None, None) => Dataset::builtin(),
    }
}
