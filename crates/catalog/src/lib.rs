//! Lexiread story catalog
//!
//! Decides which stories a reader can open today:
//!
//! - `rotation`: deterministic daily selection of free entry-level stories
//! - `listing`: lock labels for the dashboard listing
//! - `access`: the guard applied when a story is opened
//! - `filter`: dashboard search and filters
//! - `countdown`: time left until the rotation changes

pub mod access;
pub mod countdown;
pub mod filter;
pub mod listing;
pub mod rotation;

pub use access::{check_access, AccessDecision};
pub use countdown::{format_countdown, time_until_rotation};
pub use filter::{LibraryFilter, RatingThreshold, ReadTimeBucket};
pub use listing::{label_catalog, CatalogEntry, LockState};
pub use rotation::{
    compute_daily_partition, date_seed, newest_first, DailyPartition, DailyRotation,
    RotationSlot, SeededRandom,
};
