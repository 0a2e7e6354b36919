// ********* Input data structures ***********

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Display;

/// The closing balance reported by an account-history export.
///
/// Exports sometimes leave the closing balance out (marked `N/A`). This is
/// decided once when the cells are read, see [crate::cells].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum ClosingBalance {
    Present(Decimal),
    NotApplicable,
}

/// The two balances extracted from the first row of an upload.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct BalancePair {
    pub before: Decimal,
    pub after: ClosingBalance,
}

impl BalancePair {
    pub fn new(before: Decimal, after: Decimal) -> BalancePair {
        BalancePair {
            before,
            after: ClosingBalance::Present(after),
        }
    }

    pub fn without_closing(before: Decimal) -> BalancePair {
        BalancePair {
            before,
            after: ClosingBalance::NotApplicable,
        }
    }
}

// ******** Output data structures *********

/// One line of the leaderboard.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LeaderboardRow {
    /// Dense rank, starting at 1.
    pub rank: u32,
    pub team_name: String,
    pub balance: Decimal,
}

impl LeaderboardRow {
    pub fn formatted_balance(&self) -> String {
        crate::currency::format_currency(self.balance)
    }

    pub fn formatted(&self) -> FormattedRow {
        FormattedRow {
            rank: self.rank,
            team_name: self.team_name.clone(),
            balance: self.formatted_balance(),
        }
    }
}

/// A row as it is displayed and exported: the balance is already a string.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FormattedRow {
    pub rank: u32,
    pub team_name: String,
    pub balance: String,
}

/// Errors that prevent the leaderboard from being computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum LeaderboardError {
    /// The cells of an upload are missing or are not numbers.
    InvalidUploadData { team: Option<String>, reason: String },
    /// A team that is not part of the competition was referenced.
    UnknownTeam(String),
    /// The same team name was registered twice.
    DuplicateTeam(String),
    /// No team was registered, or a team has an empty name.
    EmptyCompetition,
}

impl LeaderboardError {
    /// Attaches the team name to an upload error that was raised before the
    /// team was known.
    pub fn for_team(self, team: &str) -> LeaderboardError {
        match self {
            LeaderboardError::InvalidUploadData { team: None, reason } => {
                LeaderboardError::InvalidUploadData {
                    team: Some(team.to_string()),
                    reason,
                }
            }
            x => x,
        }
    }
}

impl Error for LeaderboardError {}

impl Display for LeaderboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaderboardError::InvalidUploadData {
                team: Some(team),
                reason,
            } => write!(f, "invalid upload data for team {}: {}", team, reason),
            LeaderboardError::InvalidUploadData { team: None, reason } => {
                write!(f, "invalid upload data: {}", reason)
            }
            LeaderboardError::UnknownTeam(name) => write!(f, "unknown team: {:?}", name),
            LeaderboardError::DuplicateTeam(name) => {
                write!(f, "team registered more than once: {:?}", name)
            }
            LeaderboardError::EmptyCompetition => {
                write!(f, "the competition has no team or a team without a name")
            }
        }
    }
}
