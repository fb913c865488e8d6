//! # Vote Toggling
//!
//! Every session keeps one [`VoteState`] per perk. A request to vote in some [`Direction`] is
//! resolved against that state into a ledger delta and the state the session moves to.
//!
//! | Current   | Request | Delta | Next      |
//! |-----------|---------|-------|-----------|
//! | none      | up      | +1    | up        |
//! | none      | down    | -1    | down      |
//! | up        | up      | -1    | none      |
//! | up        | down    | -2    | down      |
//! | down      | down    | +1    | none      |
//! | down      | up      | +2    | up        |
//!
//! Repeating a vote takes it back. Flipping a vote cancels the old one and applies the new one in
//! a single step, hence the magnitude of 2.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownVoteState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn from_upvote(upvote: bool) -> Self {
        if upvote {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteState {
    #[default]
    #[serde(rename = "none")]
    NoVote,
    #[serde(rename = "up")]
    Upvoted,
    #[serde(rename = "down")]
    Downvoted,
}

impl VoteState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteState::NoVote => "none",
            VoteState::Upvoted => "up",
            VoteState::Downvoted => "down",
        }
    }

    /// What this state adds to a perk's score.
    pub fn contribution(&self) -> i64 {
        match self {
            VoteState::NoVote => 0,
            VoteState::Upvoted => 1,
            VoteState::Downvoted => -1,
        }
    }
}

impl fmt::Display for VoteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteState {
    type Err = UnknownVoteState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(VoteState::NoVote),
            "up" => Ok(VoteState::Upvoted),
            "down" => Ok(VoteState::Downvoted),
            other => Err(UnknownVoteState(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub delta: i64,
    pub state: VoteState,
}

pub fn apply_vote(direction: Direction, current: VoteState) -> Transition {
    let (delta, state) = match (current, direction) {
        (VoteState::NoVote, Direction::Up) => (1, VoteState::Upvoted),
        (VoteState::NoVote, Direction::Down) => (-1, VoteState::Downvoted),
        (VoteState::Upvoted, Direction::Up) => (-1, VoteState::NoVote),
        (VoteState::Upvoted, Direction::Down) => (-2, VoteState::Downvoted),
        (VoteState::Downvoted, Direction::Down) => (1, VoteState::NoVote),
        (VoteState::Downvoted, Direction::Up) => (2, VoteState::Upvoted),
    };

    Transition { delta, state }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: [VoteState; 3] = [VoteState::NoVote, VoteState::Upvoted, VoteState::Downvoted];
    const DIRECTIONS: [Direction; 2] = [Direction::Up, Direction::Down];

    fn run(start: i64, directions: &[Direction]) -> (i64, VoteState) {
        directions
            .iter()
            .fold((start, VoteState::default()), |(score, state), &direction| {
                let transition = apply_vote(direction, state);
                (score + transition.delta, transition.state)
            })
    }

    #[test]
    fn test_table() {
        use Direction::*;
        use VoteState::*;

        let cases = [
            (NoVote, Up, 1, Upvoted),
            (NoVote, Down, -1, Downvoted),
            (Upvoted, Up, -1, NoVote),
            (Upvoted, Down, -2, Downvoted),
            (Downvoted, Down, 1, NoVote),
            (Downvoted, Up, 2, Upvoted),
        ];

        for (current, direction, delta, state) in cases {
            assert_eq!(apply_vote(direction, current), Transition { delta, state });
        }
    }

    #[test]
    fn test_delta_matches_contribution_change() {
        for current in STATES {
            for direction in DIRECTIONS {
                let transition = apply_vote(direction, current);
                assert_eq!(
                    transition.delta,
                    transition.state.contribution() - current.contribution()
                );
            }
        }
    }

    #[test]
    fn test_toggle_off() {
        assert_eq!(run(7, &[Direction::Up, Direction::Up]), (7, VoteState::NoVote));
        assert_eq!(run(-3, &[Direction::Down, Direction::Down]), (-3, VoteState::NoVote));
    }

    #[test]
    fn test_flip() {
        assert_eq!(run(5, &[Direction::Up, Direction::Down]), (4, VoteState::Downvoted));
        assert_eq!(run(5, &[Direction::Down, Direction::Up]), (6, VoteState::Upvoted));
    }

    #[test]
    fn test_triple_upvote() {
        let ups = [Direction::Up, Direction::Up, Direction::Up];
        assert_eq!(run(0, &ups), (1, VoteState::Upvoted));
    }

    #[test]
    fn test_parse_round_trip() {
        for state in STATES {
            assert_eq!(state.as_str().parse::<VoteState>(), Ok(state));
        }
        assert!("sideways".parse::<VoteState>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&VoteState::Upvoted).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&VoteState::NoVote).unwrap(), "\"none\"");
        assert_eq!(serde_json::to_string(&Direction::Down).unwrap(), "\"down\"");
    }

    #[test]
    fn test_from_upvote() {
        assert_eq!(Direction::from_upvote(true), Direction::Up);
        assert_eq!(Direction::from_upvote(false), Direction::Down);
    }
}
