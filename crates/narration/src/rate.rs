use crate::error::{NarrationError, NarrationResult};

/// Speech rate multiplier passed to the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechRate {
    value: f32,
}

impl SpeechRate {
    pub const MIN: f32 = 0.5;
    pub const MAX: f32 = 2.0;
    pub const DEFAULT: f32 = 1.0;

    /// Creates a rate, rejecting values outside the supported range
    pub fn new(value: f32) -> NarrationResult<Self> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(NarrationError::InvalidRate {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self { value })
    }

    /// Creates a rate, clamping into range; non-finite input gives the default
    pub fn clamped(value: f32) -> Self {
        if !value.is_finite() {
            return Self::default();
        }
        Self {
            value: value.clamp(Self::MIN, Self::MAX),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Adds `delta`, clamped into range
    pub fn adjusted(&self, delta: f32) -> Self {
        Self::clamped(self.value + delta)
    }

    pub fn is_normal(&self) -> bool {
        (self.value - Self::DEFAULT).abs() < f32::EPSILON
    }
}

impl Default for SpeechRate {
    fn default() -> Self {
        Self {
            value: Self::DEFAULT,
        }
    }
}

impl std::fmt::Display for SpeechRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}x", self.value)
    }
}

impl PartialOrd for SpeechRate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_rates() {
        assert!(SpeechRate::new(0.5).is_ok());
        assert!(SpeechRate::new(2.0).is_ok());
        assert!(SpeechRate::default().is_normal());
    }

    #[test]
    fn test_invalid_rates() {
        assert!(SpeechRate::new(0.49).is_err());
        assert!(SpeechRate::new(2.01).is_err());
        assert!(SpeechRate::new(f32::NAN).is_err());
        assert!(SpeechRate::new(f32::INFINITY).is_err());
    }

    #[test]
    fn test_clamped_and_adjusted() {
        assert_eq!(SpeechRate::clamped(9.0).value(), 2.0);
        assert_eq!(SpeechRate::clamped(f32::NAN), SpeechRate::default());
        assert_eq!(SpeechRate::default().adjusted(-5.0).value(), 0.5);
    }

    #[test]
    fn test_display() {
        assert_eq!(SpeechRate::default().to_string(), "1.00x");
    }

    #[test]
    fn test_ordering() {
        assert!(SpeechRate::clamped(0.8) < SpeechRate::clamped(1.2));
    }
}
