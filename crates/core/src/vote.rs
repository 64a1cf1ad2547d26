//! Vote toggle and aggregation model.
//!
//! A user holds at most one vote per character. Casting the choice they
//! already hold retracts it; casting anything else records (or replaces)
//! it. The decision is pure and separated from the storage write so the
//! repository can issue exactly one atomic statement per toggle.

use serde::{Deserialize, Serialize};

/// A user's like/dislike choice on a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Like,
    Dislike,
}

impl VoteChoice {
    /// Database representation (`character_votes.vote_type`).
    pub fn as_str(self) -> &'static str {
        match self {
            VoteChoice::Like => "like",
            VoteChoice::Dislike => "dislike",
        }
    }

    /// Parse the database representation back into a choice.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(VoteChoice::Like),
            "dislike" => Some(VoteChoice::Dislike),
            _ => None,
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived like/dislike counts for one character.
///
/// Never stored; always recomputed from the live vote set. `{0,0}` is the
/// empty state for characters nobody has voted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteAggregate {
    pub likes: i64,
    pub dislikes: i64,
}

impl VoteAggregate {
    /// Total number of distinct voters (one row per user per character).
    pub fn total(&self) -> i64 {
        self.likes + self.dislikes
    }
}

/// The single storage write a toggle resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// Delete the user's existing vote for this choice.
    Retract,
    /// Upsert the user's vote to this choice (insert or replace).
    Record,
}

/// Decide whether a toggle retracts or records, given the user's current
/// vote as read before the write.
///
/// This read is not transactionally joined with the write; two rapid
/// toggles from the same user resolve last-write-wins, with the unique
/// (character, user) key guaranteeing at most one stored row either way.
pub fn decide_toggle(current: Option<VoteChoice>, choice: VoteChoice) -> ToggleAction {
    if current == Some(choice) {
        ToggleAction::Retract
    } else {
        ToggleAction::Record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_choice_retracts() {
        assert_eq!(
            decide_toggle(Some(VoteChoice::Like), VoteChoice::Like),
            ToggleAction::Retract
        );
        assert_eq!(
            decide_toggle(Some(VoteChoice::Dislike), VoteChoice::Dislike),
            ToggleAction::Retract
        );
    }

    #[test]
    fn no_current_vote_records() {
        assert_eq!(
            decide_toggle(None, VoteChoice::Like),
            ToggleAction::Record
        );
    }

    #[test]
    fn opposite_choice_records_replacement() {
        assert_eq!(
            decide_toggle(Some(VoteChoice::Like), VoteChoice::Dislike),
            ToggleAction::Record
        );
    }

    #[test]
    fn choice_round_trips_through_db_repr() {
        for choice in [VoteChoice::Like, VoteChoice::Dislike] {
            assert_eq!(VoteChoice::parse(choice.as_str()), Some(choice));
        }
        assert_eq!(VoteChoice::parse("upvote"), None);
    }

    #[test]
    fn empty_aggregate_is_zero() {
        let agg = VoteAggregate::default();
        assert_eq!(agg.likes, 0);
        assert_eq!(agg.dislikes, 0);
        assert_eq!(agg.total(), 0);
    }
}
