//! Daily rotation of free entry-level stories
//!
//! Every client computes the same selection for the same calendar date
//! without talking to a server: the date is turned into a seed, a small
//! linear congruential generator drives a Fisher-Yates shuffle of the
//! entry-level pool, and the shuffled order is cut into slices. The pool is
//! taken newest first, so the result does not depend on the order a client
//! happened to receive the catalog in.
//!
//! The generator constants, the shuffle direction and the slice sizes are
//! part of the cross-client contract. Changing any of them changes which
//! stories every reader sees on a given day.

use chrono::{Datelike, NaiveDate};
use lexiread_config::RotationConfig;
use lexiread_core::{ContentItem, ProficiencyLevel, StoryId};
use serde::Serialize;

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233_280;

/// Deterministic pseudo-random sequence in `[0, 1)`
///
/// `state = (state * 9301 + 49297) mod 233280`, output `state / 233280`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    /// Any seed is accepted; it is reduced modulo 233280 first, which leaves
    /// the sequence unchanged
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % LCG_MODULUS,
        }
    }

    /// Current internal state
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advances the generator and returns the next value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }
}

/// `year * 10000 + month * 100 + day`, month 1-based
///
/// Years before 1 AD never occur in practice; they are clamped to zero so
/// the seed stays unsigned.
pub fn date_seed(date: NaiveDate) -> u64 {
    let year = u64::try_from(date.year()).unwrap_or(0);
    year * 10_000 + u64::from(date.month()) * 100 + u64::from(date.day())
}

/// Stories ordered newest first; equal timestamps keep their input order
pub fn newest_first(items: &[ContentItem]) -> Vec<&ContentItem> {
    let mut sorted: Vec<&ContentItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

/// In-place Fisher-Yates shuffle walking from the last index down to 1
fn shuffle<T>(items: &mut [T], rng: &mut SeededRandom) {
    for i in (1..items.len()).rev() {
        let j = (rng.next_f64() * (i + 1) as f64).floor() as usize;
        items.swap(i, j);
    }
}

/// Where a story landed in today's rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationSlot {
    /// Free to read today
    Unlocked,
    /// Shown locked as a teaser
    Preview,
    /// Entry-level but not part of today's selection
    FullyLocked,
}

/// Result of the daily selection
///
/// The three lists are disjoint and together hold exactly the input pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPartition {
    pub date: NaiveDate,
    pub entry_level: ProficiencyLevel,
    pub unlocked: Vec<StoryId>,
    pub preview_locked: Vec<StoryId>,
    pub fully_locked: Vec<StoryId>,
}

impl DailyPartition {
    /// Returns the slot of `id`, or None if it was not in the pool
    pub fn slot(&self, id: &StoryId) -> Option<RotationSlot> {
        if self.unlocked.contains(id) {
            Some(RotationSlot::Unlocked)
        } else if self.preview_locked.contains(id) {
            Some(RotationSlot::Preview)
        } else if self.fully_locked.contains(id) {
            Some(RotationSlot::FullyLocked)
        } else {
            None
        }
    }

    pub fn is_unlocked(&self, id: &StoryId) -> bool {
        self.unlocked.contains(id)
    }

    pub fn is_preview(&self, id: &StoryId) -> bool {
        self.preview_locked.contains(id)
    }

    /// Unlocked followed by preview ids
    pub fn daily_ids(&self) -> impl Iterator<Item = &StoryId> {
        self.unlocked.iter().chain(self.preview_locked.iter())
    }

    /// Total number of stories in the pool
    pub fn len(&self) -> usize {
        self.unlocked.len() + self.preview_locked.len() + self.fully_locked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Selector parameterised by slice sizes and the rotating level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRotation {
    unlocked_per_day: usize,
    preview_per_day: usize,
    entry_level: ProficiencyLevel,
}

impl Default for DailyRotation {
    fn default() -> Self {
        Self::new(&RotationConfig::default())
    }
}

impl DailyRotation {
    pub fn new(config: &RotationConfig) -> Self {
        Self {
            unlocked_per_day: config.unlocked_per_day,
            preview_per_day: config.preview_per_day,
            entry_level: config.entry_level,
        }
    }

    /// Partitions the entry-level stories of a full catalog with the
    /// default slice sizes
    pub fn from_items(date: NaiveDate, items: &[ContentItem]) -> DailyPartition {
        Self::default().partition_items(date, items)
    }

    /// Partitions the stories at the rotating level, newest first
    pub fn partition_items(&self, date: NaiveDate, items: &[ContentItem]) -> DailyPartition {
        let pool: Vec<StoryId> = newest_first(items)
            .into_iter()
            .filter(|item| item.level == self.entry_level)
            .map(|item| item.id.clone())
            .collect();
        self.partition(date, &pool)
    }

    /// Partitions an already filtered pool of ids
    pub fn partition(&self, date: NaiveDate, pool: &[StoryId]) -> DailyPartition {
        let mut shuffled = pool.to_vec();
        let mut rng = SeededRandom::new(date_seed(date));
        shuffle(&mut shuffled, &mut rng);

        let unlocked_end = self.unlocked_per_day.min(shuffled.len());
        let preview_end = (unlocked_end + self.preview_per_day).min(shuffled.len());

        let fully_locked = shuffled.split_off(preview_end);
        let preview_locked = shuffled.split_off(unlocked_end);
        let unlocked = shuffled;

        log::debug!(
            "Rotation for {}: {} unlocked, {} preview, {} locked",
            date,
            unlocked.len(),
            preview_locked.len(),
            fully_locked.len()
        );

        DailyPartition {
            date,
            entry_level: self.entry_level,
            unlocked,
            preview_locked,
            fully_locked,
        }
    }
}

/// Partitions `pool` for `date` with four unlocked and four preview stories
///
/// Pure and infallible; an empty pool yields an empty partition.
pub fn compute_daily_partition(date: NaiveDate, pool: &[StoryId]) -> DailyPartition {
    DailyRotation::default().partition(date, pool)
}
