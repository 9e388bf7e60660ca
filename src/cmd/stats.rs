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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use serde::Serialize;

use crate::collection::Collection;
use crate::dataset::Dataset;
use crate::error::Fallible;
use crate::learned::LEARNED_KEY;
use crate::learned::LearnedSet;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(
    directory: Option<String>,
    dataset: Option<String>,
    format: StatsFormat,
) -> Fallible<()> {
    let collection = Collection::new(directory, dataset)?;
    let learned = LearnedSet::load(&collection.store);
    let mut stats = collect_stats(&collection.dataset, &learned);
    stats.last_updated = collection
        .store
        .updated_at(LEARNED_KEY)?
        .map(|ts| ts.to_string());
    match format {
        StatsFormat::Text => {
            println!("Entries: {}", stats.entry_count);
            println!(
                "Learned: {} ({}%)",
                stats.learned_count, stats.learned_percent
            );
            if let Some(last_updated) = &stats.last_updated {
                println!("Last updated: {last_updated}");
            }
            for topic in &stats.topics {
                println!(
                    "  {}: {} / {}",
                    topic.topic, topic.learned_count, topic.entry_count
                );
            }
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

fn collect_stats(dataset: &Dataset, learned: &LearnedSet) -> Stats {
    let topics = dataset
        .topics()
        .into_iter()
        .map(|topic| {
            let entries = dataset.entries().iter().filter(|entry| entry.topic() == topic);
            let (entry_count, learned_count) =
                entries.fold((0, 0), |(total, learned_count), entry| {
                    let hit = usize::from(learned.contains(entry.id()));
                    (total + 1, learned_count + hit)
                });
            TopicStats {
                topic: topic.to_string(),
                entry_count,
                learned_count,
            }
        })
        .collect();
    Stats {
        entry_count: dataset.len(),
        learned_count: learned.len(),
        learned_percent: learned.percent_of(dataset.len()),
        last_updated: None,
        topics,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Stats {
    entry_count: usize,
    learned_count: usize,
    learned_percent: u32,
    last_updated: Option<String>,
    topics: Vec<TopicStats>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TopicStats {
    topic: String,
    entry_count: usize,
    learned_count: usize,
}
