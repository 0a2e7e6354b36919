use log::debug;
use std::collections::HashMap;

pub use crate::config::*;

/// A builder that keeps the latest upload of each team.
///
/// This is the state held by the caller between two form submissions. Each
/// new upload for a team replaces the previous one.
///
/// ```
/// use leaderboard::builder::Builder;
/// # use leaderboard::LeaderboardError;
///
/// let mut builder = Builder::new(&["TECH".to_string(), "ENERGY".to_string()])?;
///
/// builder.add_upload_cells("ENERGY", "$100,000.00", "$101,250.00")?;
///
/// let rows = builder.compute()?;
/// assert_eq!(rows[0].team_name, "ENERGY");
/// assert_eq!(rows[0].formatted_balance(), "$101,250.00");
/// assert_eq!(rows[1].formatted_balance(), "$0.00");
///
/// # Ok::<(), LeaderboardError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    teams: Vec<String>,
    uploads: HashMap<String, Option<BalancePair>>,
}

impl Builder {
    pub fn new(teams: &[String]) -> Result<Builder, LeaderboardError> {
        crate::check_teams(teams)?;
        Ok(Builder {
            teams: teams.to_vec(),
            uploads: HashMap::new(),
        })
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    /// The latest upload of a team, if any.
    pub fn upload(&self, team: &str) -> Option<&BalancePair> {
        self.uploads.get(team).and_then(|u| u.as_ref())
    }

    /// Records the upload of a team, replacing any previous one.
    pub fn add_upload(&mut self, team: &str, upload: BalancePair) -> Result<(), LeaderboardError> {
        self.check_team(team)?;
        debug!("add_upload: team {:?}: {:?}", team, upload);
        self.uploads.insert(team.to_string(), Some(upload));
        Ok(())
    }

    /// Records an upload from the raw balance cells of the export.
    ///
    /// Cells that cannot be read fail with [LeaderboardError::InvalidUploadData]
    /// and leave the previous upload of the team in place.
    pub fn add_upload_cells(
        &mut self,
        team: &str,
        before: &str,
        after: &str,
    ) -> Result<(), LeaderboardError> {
        self.check_team(team)?;
        let upload = BalancePair::from_cells(before, after).map_err(|e| e.for_team(team))?;
        self.add_upload(team, upload)
    }

    /// Forgets the upload of a team. Returns the upload that was removed.
    pub fn clear_upload(&mut self, team: &str) -> Result<Option<BalancePair>, LeaderboardError> {
        self.check_team(team)?;
        Ok(self.uploads.remove(team).flatten())
    }

    pub fn compute(&self) -> Result<Vec<LeaderboardRow>, LeaderboardError> {
        crate::compute_leaderboard(&self.teams, &self.uploads)
    }

    fn check_team(&self, team: &str) -> Result<(), LeaderboardError> {
        if self.teams.iter().any(|t| t == team) {
            Ok(())
        } else {
            Err(LeaderboardError::UnknownTeam(team.to_string()))
        }
    }
}
