//! Lock labels for the dashboard listing

use crate::rotation::{newest_first, DailyPartition};
use lexiread_core::ContentItem;
use serde::Serialize;

/// How a story is presented in the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Can be opened
    Unlocked,
    /// Entry-level teaser, locked today
    Preview,
    /// Requires a subscription
    Premium,
}

impl LockState {
    pub fn is_locked(&self) -> bool {
        !matches!(self, LockState::Unlocked)
    }
}

/// A story paired with its lock state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry<'a> {
    pub item: &'a ContentItem,
    pub lock: LockState,
}

/// Labels the catalog for display
///
/// Subscribers get every story unlocked. Everyone else gets today's
/// unlocked stories first, then the preview stories, then all stories above
/// the entry level. Entry-level stories outside today's selection are left
/// out. Within each group the newest story comes first.
pub fn label_catalog<'a>(
    items: &'a [ContentItem],
    partition: &DailyPartition,
    subscriber: bool,
) -> Vec<CatalogEntry<'a>> {
    let items = newest_first(items);

    if subscriber {
        return items
            .into_iter()
            .map(|item| CatalogEntry {
                item,
                lock: LockState::Unlocked,
            })
            .collect();
    }

    let unlocked = items
        .iter()
        .copied()
        .filter(|item| partition.is_unlocked(&item.id))
        .map(|item| CatalogEntry {
            item,
            lock: LockState::Unlocked,
        });

    let preview = items
        .iter()
        .copied()
        .filter(|item| partition.is_preview(&item.id))
        .map(|item| CatalogEntry {
            item,
            lock: LockState::Preview,
        });

    let premium = items
        .iter()
        .copied()
        .filter(|item| {
            item.level != partition.entry_level
                && !partition.is_unlocked(&item.id)
                && !partition.is_preview(&item.id)
        })
        .map(|item| CatalogEntry {
            item,
            lock: LockState::Premium,
        });

    unlocked.chain(preview).chain(premium).collect()
}
