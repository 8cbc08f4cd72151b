//! Completed flyer library
//!
//! Maps job ids to their street-grouped flyers and keeps a separate,
//! deterministic display order: ascending by completion time (oldest
//! first), ties in first-seen order, undated records last.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::flyer::Flyer;

/// Flyers of one job grouped by street key
pub type StreetMap = BTreeMap<String, Vec<Flyer>>;

/// Presentation state of one completed job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedJobRecord {
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub streets: StreetMap,
}

impl CompletedJobRecord {
    pub fn flyer_count(&self) -> usize {
        self.streets.values().map(Vec::len).sum()
    }
}

/// A full snapshot of a completed job's resolved flyers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub job_id: String,
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub streets: StreetMap,
}

/// Completed-job records plus their display order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlyerLibrary {
    records: HashMap<String, CompletedJobRecord>,
    order: Vec<String>,
}

impl FlyerLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completion, replacing any earlier snapshot of the same job
    ///
    /// Idempotent: merging the same completion twice leaves the library as
    /// merging it once.
    pub fn merge_completion(&mut self, completion: Completion) {
        let Completion {
            job_id,
            title,
            created_at,
            completed_at,
            streets,
        } = completion;

        let streets = dedup_flyers(streets);

        match self.records.get_mut(&job_id) {
            Some(record) => {
                record.title = title;
                record.streets = streets;
                if completed_at.is_some() {
                    record.completed_at = completed_at;
                }
                if created_at.is_some() {
                    record.created_at = created_at;
                }
            }
            None => {
                self.records.insert(
                    job_id.clone(),
                    CompletedJobRecord {
                        title,
                        created_at,
                        completed_at,
                        streets,
                    },
                );
            }
        }

        if !self.order.contains(&job_id) {
            self.order.push(job_id);
        }
        self.resort();
    }

    /// Stable sort keeps first-seen order for equal completion times
    fn resort(&mut self) {
        let records = &self.records;
        self.order.sort_by_key(|id| {
            let completed_at = records.get(id).and_then(|r| r.completed_at);
            (completed_at.is_none(), completed_at)
        });
    }

    pub fn get(&self, job_id: &str) -> Option<&CompletedJobRecord> {
        self.records.get(job_id)
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.records.contains_key(job_id)
    }

    /// Job ids in display order
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Records in display order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CompletedJobRecord)> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).map(|record| (id.as_str(), record)))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_flyers(&self) -> usize {
        self.records.values().map(CompletedJobRecord::flyer_count).sum()
    }
}

/// Keeps the first occurrence of every flyer id across all streets
fn dedup_flyers(streets: StreetMap) -> StreetMap {
    let mut seen = HashSet::new();
    streets
        .into_iter()
        .filter_map(|(street, flyers)| {
            let unique: Vec<Flyer> = flyers
                .into_iter()
                .filter(|flyer| seen.insert(flyer.id.clone()))
                .collect();
            (!unique.is_empty()).then_some((street, unique))
        })
        .collect()
}
