//! Dashboard search and filters

use lexiread_core::{ContentItem, ProficiencyLevel};
use std::str::FromStr;

/// Read-time ranges offered on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTimeBucket {
    /// 1 to 3 minutes
    Short,
    /// 4 to 7 minutes
    Medium,
    /// 8 minutes or more
    Long,
}

impl ReadTimeBucket {
    pub fn contains(&self, minutes: u32) -> bool {
        match self {
            ReadTimeBucket::Short => (1..=3).contains(&minutes),
            ReadTimeBucket::Medium => (4..=7).contains(&minutes),
            ReadTimeBucket::Long => minutes >= 8,
        }
    }
}

impl FromStr for ReadTimeBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1-3" | "short" => Ok(ReadTimeBucket::Short),
            "4-7" | "medium" => Ok(ReadTimeBucket::Medium),
            "8+" | "long" => Ok(ReadTimeBucket::Long),
            other => Err(format!("unknown read time '{}', expected 1-3, 4-7 or 8+", other)),
        }
    }
}

/// Minimum average rating, `1+` to `4+`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingThreshold(u8);

impl RatingThreshold {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(stars: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&stars).then_some(Self(stars))
    }

    pub fn stars(&self) -> u8 {
        self.0
    }

    pub fn accepts(&self, rating: f32) -> bool {
        rating >= f32::from(self.0)
    }
}

impl FromStr for RatingThreshold {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_end_matches('+');
        digits
            .parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("unknown rating '{}', expected 1+ to 4+", s.trim()))
    }
}

/// Combined dashboard filter; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryFilter {
    pub search: String,
    pub level: Option<ProficiencyLevel>,
    pub category: Option<String>,
    pub read_time: Option<ReadTimeBucket>,
    pub min_rating: Option<RatingThreshold>,
}

impl LibraryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_level(mut self, level: ProficiencyLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_read_time(mut self, bucket: ReadTimeBucket) -> Self {
        self.read_time = Some(bucket);
        self
    }

    pub fn with_min_rating(mut self, threshold: RatingThreshold) -> Self {
        self.min_rating = Some(threshold);
        self
    }

    /// Clears every criterion
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        let search_match = item
            .title
            .to_lowercase()
            .contains(&self.search.to_lowercase());

        let level_match = self.level.is_none_or(|level| item.level == level);

        let category_match = match &self.category {
            None => true,
            Some(wanted) => item.category.as_deref() == Some(wanted.as_str()),
        };

        // Missing values count as zero, like an unrated story
        let read_time_match = self
            .read_time
            .is_none_or(|bucket| bucket.contains(item.read_time_minutes.unwrap_or(0)));

        let rating_match = self
            .min_rating
            .is_none_or(|threshold| threshold.accepts(item.rating.unwrap_or(0.0)));

        search_match && level_match && category_match && read_time_match && rating_match
    }

    /// Keeps the entries whose story matches, preserving order
    pub fn apply<'a, T, F>(&self, entries: &'a [T], item_of: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> &ContentItem,
    {
        entries.iter().filter(|e| self.matches(item_of(*e))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<ContentItem> {
        vec![
            ContentItem::new("1", "The Red Fox", ProficiencyLevel::A1)
                .with_category("animals")
                .with_read_time(2)
                .with_rating(4.5),
            ContentItem::new("2", "Harbor Lights", ProficiencyLevel::B1)
                .with_category("travel")
                .with_read_time(6)
                .with_rating(3.2),
            ContentItem::new("3", "Foxes at Night", ProficiencyLevel::A1)
                .with_category("animals")
                .with_read_time(12),
            ContentItem::new("4", "Untimed", ProficiencyLevel::C1),
        ]
    }

    fn ids(filter: &LibraryFilter, items: &[ContentItem]) -> Vec<String> {
        filter
            .apply(items, |item| item)
            .into_iter()
            .map(|item| item.id.to_string())
            .collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let items = items();
        assert_eq!(ids(&LibraryFilter::new(), &items).len(), 4);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let items = items();
        let filter = LibraryFilter::new().with_search("FOX");
        assert_eq!(ids(&filter, &items), ["1", "3"]);
    }

    #[test]
    fn test_level_and_category() {
        let items = items();
        let filter = LibraryFilter::new()
            .with_level(ProficiencyLevel::A1)
            .with_category("animals");
        assert_eq!(ids(&filter, &items), ["1", "3"]);

        let travel = LibraryFilter::new().with_category("travel");
        assert_eq!(ids(&travel, &items), ["2"]);
    }

    #[test]
    fn test_read_time_buckets() {
        let items = items();
        let short = LibraryFilter::new().with_read_time(ReadTimeBucket::Short);
        let medium = LibraryFilter::new().with_read_time(ReadTimeBucket::Medium);
        let long = LibraryFilter::new().with_read_time(ReadTimeBucket::Long);
        assert_eq!(ids(&short, &items), ["1"]);
        assert_eq!(ids(&medium, &items), ["2"]);
        assert_eq!(ids(&long, &items), ["3"]);
    }

    #[test]
    fn test_rating_threshold() {
        let items = items();
        let three = "3+".parse::<RatingThreshold>().expect("valid");
        let filter = LibraryFilter::new().with_min_rating(three);
        assert_eq!(ids(&filter, &items), ["1", "2"]);

        let four = RatingThreshold::new(4).expect("valid");
        assert_eq!(ids(&LibraryFilter::new().with_min_rating(four), &items), ["1"]);
    }

    #[test]
    fn test_parse_errors() {
        assert!("5+".parse::<RatingThreshold>().is_err());
        assert!("0".parse::<RatingThreshold>().is_err());
        assert!("9-12".parse::<ReadTimeBucket>().is_err());
        assert_eq!("8+".parse::<ReadTimeBucket>(), Ok(ReadTimeBucket::Long));
    }

    #[test]
    fn test_reset() {
        let mut filter = LibraryFilter::new().with_search("x").with_level(ProficiencyLevel::B2);
        filter.reset();
        assert_eq!(filter, LibraryFilter::default());
    }
}
