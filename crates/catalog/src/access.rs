//! Access guard applied when a story is opened

use crate::rotation::DailyPartition;
use lexiread_core::{AppError, ContentItem};
use serde::Serialize;

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Granted,
    /// Story is above the entry level and the reader has no subscription
    PremiumRequired,
    /// Entry-level story that is not unlocked today
    DailyAccessExpired,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    /// Short title for a denial notice
    pub fn title(&self) -> Option<&'static str> {
        match self {
            AccessDecision::Granted => None,
            AccessDecision::PremiumRequired => Some("Premium required"),
            AccessDecision::DailyAccessExpired => Some("Access expired"),
        }
    }

    /// Converts a denial into the matching application error
    pub fn into_result(self, item: &ContentItem) -> Result<(), AppError> {
        let story = item.id.to_string();
        match self {
            AccessDecision::Granted => Ok(()),
            AccessDecision::PremiumRequired => Err(AppError::PremiumRequired { story }),
            AccessDecision::DailyAccessExpired => Err(AppError::DailyAccessExpired { story }),
        }
    }
}

/// Decides whether `item` may be opened today
pub fn check_access(
    item: &ContentItem,
    subscriber: bool,
    partition: &DailyPartition,
) -> AccessDecision {
    if subscriber {
        return AccessDecision::Granted;
    }

    let decision = if item.level != partition.entry_level {
        AccessDecision::PremiumRequired
    } else if partition.is_unlocked(&item.id) {
        AccessDecision::Granted
    } else {
        AccessDecision::DailyAccessExpired
    };

    if !decision.is_granted() {
        log::info!("Access to story {} denied: {:?}", item.id, decision);
    }
    decision
}
