use thiserror::Error;

/// Error returned when a skip list is configured with values it can't use.
///
/// Lookups and removals of absent keys are not errors; they return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    /// The maximum level was outside `1..=64`.
    #[error("max level must be in 1..=64, got {0}")]
    InvalidMaxLevel(usize),
    /// The level probability was NaN or outside `[0, 1]`.
    #[error("probability must be in [0, 1], got {0}")]
    InvalidProbability(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_bad_value() {
        assert_eq!(
            Error::InvalidMaxLevel(65).to_string(),
            "max level must be in 1..=64, got 65"
        );
        assert_eq!(
            Error::InvalidProbability(1.5).to_string(),
            "probability must be in [0, 1], got 1.5"
        );
    }
}
