//! Character and friendship validation bounds.
//!
//! These limits back the `validator` annotations on the API request DTOs
//! and the CHECK constraints in the schema; keep all three in sync.

/// Inclusive friendship level range.
pub const FRIENDSHIP_LEVEL_MIN: i32 = 0;
pub const FRIENDSHIP_LEVEL_MAX: i32 = 10;

/// Character and player names, and friend names, share this length cap.
pub const NAME_MAX_LEN: usize = 100;

/// Upper bound on `age` accepted from clients. Generous on purpose —
/// elves exist.
pub const AGE_MAX: i32 = 100_000;

/// Height is stored in meters.
pub const HEIGHT_MAX: f64 = 100.0;

/// Check a friendship level against the allowed range.
pub fn friendship_level_in_range(level: i32) -> bool {
    (FRIENDSHIP_LEVEL_MIN..=FRIENDSHIP_LEVEL_MAX).contains(&level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_bounds_are_inclusive() {
        assert!(friendship_level_in_range(0));
        assert!(friendship_level_in_range(10));
        assert!(!friendship_level_in_range(-1));
        assert!(!friendship_level_in_range(11));
    }
}
