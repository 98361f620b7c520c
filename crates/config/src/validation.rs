//! Field checks shared by the config sections

use std::fmt::Display;
use std::ops::RangeInclusive;

pub use crate::error::ValidationError;

/// A `[section]` table of the config file
///
/// Sections validate independently and `Config::validate` gathers every
/// section's errors, so one bad value does not hide another.
pub trait ConfigSection: Default {
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Takes every value from `other`
    fn merge(&mut self, other: Self);

    /// Table name used in error messages
    fn section_name(&self) -> &'static str;
}

/// Field checks; each returns the error for one field
pub struct Validator;

impl Validator {
    /// `value` must lie within `range`; NaN never does
    pub fn in_range<T>(
        field: &str,
        value: T,
        range: RangeInclusive<T>,
    ) -> Result<(), ValidationError>
    where
        T: PartialOrd + Display + Copy,
    {
        if range.contains(&value) {
            return Ok(());
        }
        Err(ValidationError::with_value(
            field,
            format!("must be between {} and {}", range.start(), range.end()),
            value,
        ))
    }

    pub fn not_empty(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "must not be empty"));
        }
        Ok(())
    }

    /// A BCP 47 prefix such as `en`, `en-` or `en-GB`
    pub fn language_prefix(field: &str, value: &str) -> Result<(), ValidationError> {
        Self::not_empty(field, value)?;

        let primary = value.split('-').next().unwrap_or_default();
        let primary_ok = (2..=3).contains(&primary.len())
            && primary.chars().all(|c| c.is_ascii_alphabetic());
        let rest_ok = value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

        if primary_ok && rest_ok {
            Ok(())
        } else {
            Err(ValidationError::with_value(
                field,
                "must be a language tag prefix like \"en-\"",
                value,
            ))
        }
    }

    /// Keeps the failures, in order
    pub fn collect(
        results: impl IntoIterator<Item = Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(Result::err).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
