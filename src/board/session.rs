use crate::board::*;

use leaderboard::builder::Builder;
use std::collections::BTreeMap;
use std::path::Path;

/// The latest upload of each team, kept between two runs.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub uploads: BTreeMap<String, BalancePair>,
}

impl Session {
    /// Reads the session file. A missing file is an empty session.
    pub fn load(path: &Path) -> BoardResult<Session> {
        if !path.exists() {
            debug!("Session::load: no session at {:?}", path);
            return Ok(Session::default());
        }
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
            path: path.display().to_string(),
        })?;
        let session: Session =
            serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        debug!("Session::load: {:?}", session);
        Ok(session)
    }

    pub fn save(&self, path: &Path) -> BoardResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context(WritingSnafu {
                    path: parent.display().to_string(),
                })?;
            }
        }
        let js = serde_json::to_string_pretty(self).context(WritingJsonSnafu {})?;
        fs::write(path, js).context(WritingSnafu {
            path: path.display().to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }

    pub fn record_upload(&mut self, team: &str, upload: BalancePair) {
        self.uploads.insert(team.to_string(), upload);
    }

    /// A builder holding the uploads of this session.
    ///
    /// A session that mentions a team that is no longer configured fails with
    /// an unknown team error.
    pub fn builder(&self, teams: &[String]) -> BoardResult<Builder> {
        let mut builder = Builder::new(teams).context(LeaderboardSnafu {})?;
        for (team, upload) in self.uploads.iter() {
            builder
                .add_upload(team, *upload)
                .context(LeaderboardSnafu {})?;
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn teams() -> Vec<String> {
        vec!["A".to_string(), "B".to_string()]
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load(&dir.path().join("session.json")).unwrap();
        assert!(session.is_empty());
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("session.json");
        let mut session = Session::default();
        session.record_upload("A", BalancePair::without_closing(dec!(500)));
        session.record_upload("B", BalancePair::new(dec!(300), dec!(310.25)));
        session.save(&path).unwrap();
        assert_eq!(Session::load(&path).unwrap(), session);
    }

    #[test]
    fn latest_upload_wins() {
        let mut session = Session::default();
        session.record_upload("A", BalancePair::new(dec!(100), dec!(200)));
        session.record_upload("A", BalancePair::new(dec!(100), dec!(50)));
        let rows = session.builder(&teams()).unwrap().compute().unwrap();
        assert_eq!(rows[0].team_name, "A");
        assert_eq!(rows[0].balance, dec!(50));
    }

    #[test]
    fn stale_team_is_reported() {
        let mut session = Session::default();
        session.record_upload("Z", BalancePair::new(dec!(1), dec!(2)));
        assert!(matches!(
            session.builder(&teams()),
            Err(BoardError::Leaderboard {
                source: LeaderboardError::UnknownTeam(_)
            })
        ));
    }
}
