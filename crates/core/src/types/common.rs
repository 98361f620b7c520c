//! Small value types used by more than one model

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, as stored by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Current wall-clock time; a clock set before 1970 reads as the epoch
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX));
        Self(millis)
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}

/// Self-check for values that arrive from outside the process
///
/// Returns every problem found rather than stopping at the first one.
pub trait Validator {
    fn validate(&self) -> Result<(), Vec<String>>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_number() {
        let created = Timestamp::from_millis(1_740_787_200_000);
        assert_eq!(serde_json::to_string(&created).unwrap(), "1740787200000");

        let parsed: Timestamp = serde_json::from_str("1740787200000").unwrap();
        assert_eq!(parsed, created);
    }

    #[test]
    fn test_orders_by_time() {
        assert!(Timestamp::from(1_000) < Timestamp::from(2_000));
        assert_eq!(Timestamp::default().as_millis(), 0);
    }

    #[test]
    fn test_now_is_after_epoch() {
        assert!(Timestamp::now() > Timestamp::default());
    }
}
