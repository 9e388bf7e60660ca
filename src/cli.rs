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

use clap::Parser;

use crate::cmd::check::check_dataset;
use crate::cmd::reset::reset_progress;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::web::server::start_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Practice in the browser.
    Serve {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// A dataset file, or a directory of dataset files.
        #[arg(long)]
        dataset: Option<String>,
        /// The port to listen on. Overrides the configuration file.
        #[arg(long)]
        port: Option<u16>,
        /// Do not open the browser.
        #[arg(long)]
        no_open: bool,
    },
    /// Check the integrity of a dataset. By default, the built-in one.
    Check {
        /// A dataset file, or a directory of dataset files.
        #[arg(long)]
        dataset: Option<String>,
    },
    /// Print learning progress.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// A dataset file, or a directory of dataset files.
        #[arg(long)]
        dataset: Option<String>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Forget which entries are learned.
    Reset {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            directory,
            dataset,
            port,
            no_open,
        } => {
            let mut collection = Collection::new(directory, dataset)?;
            if let Some(port) = port {
                collection.config.port = port;
            }
            if no_open {
                collection.config.open_browser = false;
            }
            start_server(collection).await
        }
        Command::Check { dataset } => check_dataset(dataset),
        Command::Stats {
            directory,
            dataset,
            format,
        } => print_stats(directory, dataset, format),
        Command::Reset { directory, yes } => reset_progress(directory, yes),
    }
}
