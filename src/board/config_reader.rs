use crate::board::*;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The teams of the competition when no configuration is given.
pub const DEFAULT_TEAMS: [&str; 7] = [
    "TECH",
    "INDUSTRIALS",
    "CONSUMER STAPLES",
    "CONSUMER DISCRETIONARY",
    "FINANCIALS",
    "ENERGY",
    "HEALTHCARE",
];

pub const DEFAULT_COMPETITION_NAME: &str = "SMIP TRADING LEADERBOARD";
pub const DEFAULT_FILE_NAME_MARKER: &str = "account-history";
pub const DEFAULT_LEADERBOARD_FILE: &str = "leaderboard.json";
pub const DEFAULT_SESSION_FILE: &str = "session.json";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "competitionName")]
    pub competition_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TeamEntry {
    pub name: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceSettings {
    /// `json` or `csv`
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// Commit the file with git after each write.
    pub commit: Option<bool>,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        PersistenceSettings {
            provider: "json".to_string(),
            file_path: DEFAULT_LEADERBOARD_FILE.to_string(),
            commit: None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadSettings {
    #[serde(rename = "fileNameMarker")]
    pub file_name_marker: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl UploadSettings {
    pub fn file_name_marker(&self) -> &str {
        self.file_name_marker
            .as_deref()
            .unwrap_or(DEFAULT_FILE_NAME_MARKER)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    pub teams: Vec<TeamEntry>,
    pub persistence: Option<PersistenceSettings>,
    pub uploads: Option<UploadSettings>,
    /// Local date and time, `2024-12-04T00:00:00` or `2024-12-04`.
    pub deadline: Option<String>,
    #[serde(rename = "sessionFile")]
    pub session_file: Option<String>,
}

impl BoardConfig {
    /// The competition used when no configuration file is given.
    pub fn default_competition() -> BoardConfig {
        BoardConfig {
            output_settings: OutputSettings {
                competition_name: DEFAULT_COMPETITION_NAME.to_string(),
                output_directory: None,
            },
            teams: DEFAULT_TEAMS
                .iter()
                .map(|name| TeamEntry {
                    name: name.to_string(),
                })
                .collect(),
            persistence: None,
            uploads: None,
            deadline: None,
            session_file: None,
        }
    }

    pub fn team_names(&self) -> Vec<String> {
        self.teams.iter().map(|t| t.name.clone()).collect()
    }

    pub fn persistence_settings(&self) -> PersistenceSettings {
        self.persistence.clone().unwrap_or_default()
    }

    pub fn upload_settings(&self) -> UploadSettings {
        self.uploads.clone().unwrap_or_default()
    }

    pub fn deadline(&self) -> BoardResult<Option<NaiveDateTime>> {
        match &self.deadline {
            None => Ok(None),
            Some(s) => parse_deadline(s).map(Some),
        }
    }
}

pub fn parse_deadline(s: &str) -> BoardResult<NaiveDateTime> {
    let trimmed = s.trim();
    match NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        Ok(dt) => Ok(dt),
        Err(e) => {
            // A plain date means midnight at the start of that day.
            if let Some(dt) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
            {
                return Ok(dt);
            }
            Err(e).context(InvalidDeadlineSnafu {
                deadline: s.to_string(),
            })
        }
    }
}

pub fn read_config(path: &str) -> BoardResult<BoardConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path.to_string(),
    })?;
    let config: BoardConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Resolves the relative paths of the configuration.
///
/// Paths are relative to the directory of the configuration file, then to the
/// output directory if one is set. Absolute paths are kept as they are.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BoardPaths {
    base: PathBuf,
}

impl BoardPaths {
    pub fn new(config_dir: &Path, settings: &OutputSettings) -> BoardPaths {
        let base = match &settings.output_directory {
            Some(dir) => config_dir.join(dir),
            None => config_dir.to_path_buf(),
        };
        BoardPaths { base }
    }

    pub fn resolve(&self, p: &str) -> PathBuf {
        self.base.join(p)
    }

    pub fn session_file(&self, config: &BoardConfig) -> PathBuf {
        self.resolve(
            config
                .session_file
                .as_deref()
                .unwrap_or(DEFAULT_SESSION_FILE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_full_config() {
        let js = r#"{
            "outputSettings": { "competitionName": "Fall cup", "outputDirectory": "out" },
            "teams": [ { "name": "TECH" }, { "name": "ENERGY" } ],
            "persistence": { "provider": "csv", "filePath": "board.csv", "commit": true },
            "uploads": { "fileNameMarker": "history", "excelWorksheetName": "Sheet1" },
            "deadline": "2024-12-04T18:30:00",
            "sessionFile": "state.json"
        }"#;
        let config: BoardConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.team_names(), vec!["TECH", "ENERGY"]);
        assert_eq!(config.persistence_settings().provider, "csv");
        assert_eq!(config.upload_settings().file_name_marker(), "history");
        assert_eq!(
            config.deadline().unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 4).and_then(|d| d.and_hms_opt(18, 30, 0))
        );

        let paths = BoardPaths::new(Path::new("/srv/cup"), &config.output_settings);
        assert_eq!(
            paths.session_file(&config),
            PathBuf::from("/srv/cup/out/state.json")
        );
        assert_eq!(paths.resolve("/tmp/x.json"), PathBuf::from("/tmp/x.json"));
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let js = r#"{
            "outputSettings": { "competitionName": "Cup" },
            "teams": [ { "name": "A" } ]
        }"#;
        let config: BoardConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.persistence_settings(), PersistenceSettings::default());
        assert_eq!(
            config.upload_settings().file_name_marker(),
            DEFAULT_FILE_NAME_MARKER
        );
        assert_eq!(config.deadline().unwrap(), None);
        let paths = BoardPaths::new(Path::new("cfg"), &config.output_settings);
        assert_eq!(
            paths.session_file(&config),
            PathBuf::from("cfg/session.json")
        );
    }

    #[test]
    fn default_competition_has_the_sector_teams() {
        let config = BoardConfig::default_competition();
        assert_eq!(config.teams.len(), 7);
        assert_eq!(config.team_names()[0], "TECH");
        assert_eq!(config.output_settings.competition_name, DEFAULT_COMPETITION_NAME);
    }

    #[test]
    fn deadline_formats() {
        assert_eq!(
            parse_deadline("2024-12-04").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 4)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap()
        );
        assert!(matches!(
            parse_deadline("next friday"),
            Err(BoardError::InvalidDeadline { .. })
        ));
    }
}
