use crate::board::config_reader::{BoardConfig, BoardPaths};
use crate::board::io_common::simplify_file_name;
use crate::board::*;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A leaderboard row as it is stored. The column names are the ones of the
/// dashboard.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PersistedRow {
    #[serde(rename = "RANK")]
    pub rank: u32,
    #[serde(rename = "TEAM NAME")]
    pub team_name: String,
    #[serde(rename = "BALANCE")]
    pub balance: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PersistedLeaderboard {
    pub competition: Option<String>,
    pub results: Vec<PersistedRow>,
}

impl PersistedLeaderboard {
    pub fn from_rows(competition: &str, rows: &[LeaderboardRow]) -> PersistedLeaderboard {
        PersistedLeaderboard {
            competition: Some(competition.to_string()),
            results: rows
                .iter()
                .map(|r| {
                    let f = r.formatted();
                    PersistedRow {
                        rank: f.rank,
                        team_name: f.team_name,
                        balance: f.balance,
                    }
                })
                .collect(),
        }
    }

    pub fn to_rows(&self) -> BoardResult<Vec<LeaderboardRow>> {
        let mut rows: Vec<LeaderboardRow> = Vec::with_capacity(self.results.len());
        for r in self.results.iter() {
            let balance = parse_currency(&r.balance)
                .map_err(|e| e.for_team(&r.team_name))
                .context(LeaderboardSnafu {})?;
            rows.push(LeaderboardRow {
                rank: r.rank,
                team_name: r.team_name.clone(),
                balance,
            });
        }
        Ok(rows)
    }
}

/// The storage of the latest leaderboard.
///
/// Every save replaces the whole table.
pub trait PersistenceAdapter {
    fn save(&self, board: &PersistedLeaderboard) -> BoardResult<()>;

    /// Returns `None` when nothing has been stored yet.
    fn load(&self) -> BoardResult<Option<PersistedLeaderboard>>;

    fn describe(&self) -> String;
}

fn create_parent_dir(path: &Path) -> BoardResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingSnafu {
                path: parent.display().to_string(),
            })?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> JsonFileStore {
        JsonFileStore { path }
    }
}

impl PersistenceAdapter for JsonFileStore {
    fn save(&self, board: &PersistedLeaderboard) -> BoardResult<()> {
        create_parent_dir(&self.path)?;
        let js = serde_json::to_string_pretty(board).context(WritingJsonSnafu {})?;
        fs::write(&self.path, js).context(WritingSnafu {
            path: self.describe(),
        })
    }

    fn load(&self) -> BoardResult<Option<PersistedLeaderboard>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).context(OpeningJsonSnafu {
            path: self.describe(),
        })?;
        let board: PersistedLeaderboard =
            serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        Ok(Some(board))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Clone)]
pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: PathBuf) -> CsvFileStore {
        CsvFileStore { path }
    }
}

impl PersistenceAdapter for CsvFileStore {
    fn save(&self, board: &PersistedLeaderboard) -> BoardResult<()> {
        create_parent_dir(&self.path)?;
        let mut wrt = csv::WriterBuilder::new()
            .from_path(&self.path)
            .context(CsvWriteSnafu {
                path: self.describe(),
            })?;
        for row in board.results.iter() {
            wrt.serialize(row).context(CsvWriteSnafu {
                path: self.describe(),
            })?;
        }
        wrt.flush().context(WritingSnafu {
            path: self.describe(),
        })
    }

    fn load(&self) -> BoardResult<Option<PersistedLeaderboard>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .context(CsvOpenSnafu {
                path: self.describe(),
            })?;
        let mut results: Vec<PersistedRow> = Vec::new();
        for (idx, rec) in rdr.deserialize::<PersistedRow>().enumerate() {
            // The header is line 1.
            let row = rec.context(CsvLineParseSnafu { lineno: idx + 2 })?;
            results.push(row);
        }
        Ok(Some(PersistedLeaderboard {
            competition: None,
            results,
        }))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Prints the leaderboard in JSON format instead of storing it.
#[derive(Debug, Clone, Default)]
pub struct StdoutStore {}

impl PersistenceAdapter for StdoutStore {
    fn save(&self, board: &PersistedLeaderboard) -> BoardResult<()> {
        let js = serde_json::to_string_pretty(board).context(WritingJsonSnafu {})?;
        let mut out = std::io::stdout();
        writeln!(out, "{}", js).context(WritingSnafu {
            path: self.describe(),
        })
    }

    fn load(&self) -> BoardResult<Option<PersistedLeaderboard>> {
        Ok(None)
    }

    fn describe(&self) -> String {
        "stdout".to_string()
    }
}

/// Commits the stored file with git after each save.
pub struct VersionedStore {
    inner: Box<dyn PersistenceAdapter>,
    path: PathBuf,
}

pub const COMMIT_MESSAGE: &str = "Update leaderboard";

impl VersionedStore {
    pub fn new(inner: Box<dyn PersistenceAdapter>, path: PathBuf) -> VersionedStore {
        VersionedStore { inner, path }
    }

    fn git(&self, args: &[&str]) -> BoardResult<std::process::Output> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        debug!("git -C {:?} {:?}", dir, args);
        Command::new("git")
            .arg("-C")
            .arg(&dir)
            .args(args)
            .output()
            .context(VersionControlSpawnSnafu {})
    }

    fn commit(&self) -> BoardResult<()> {
        let file_name = simplify_file_name(&self.path.display().to_string());

        let added = self.git(&["add", "--", file_name.as_str()])?;
        ensure!(
            added.status.success(),
            VersionControlSnafu {
                message: String::from_utf8_lossy(&added.stderr).to_string(),
            }
        );

        // Exit code 0: the staged file does not differ from the last commit.
        let diff = self.git(&["diff", "--cached", "--quiet", "--", file_name.as_str()])?;
        if diff.status.success() {
            info!("Leaderboard unchanged, nothing to commit");
            return Ok(());
        }

        let committed = self.git(&["commit", "-m", COMMIT_MESSAGE, "--", file_name.as_str()])?;
        ensure!(
            committed.status.success(),
            VersionControlSnafu {
                message: String::from_utf8_lossy(&committed.stderr).to_string(),
            }
        );
        info!("Committed {}", self.describe());
        Ok(())
    }
}

impl PersistenceAdapter for VersionedStore {
    fn save(&self, board: &PersistedLeaderboard) -> BoardResult<()> {
        self.inner.save(board)?;
        self.commit()
    }

    fn load(&self) -> BoardResult<Option<PersistedLeaderboard>> {
        self.inner.load()
    }

    fn describe(&self) -> String {
        format!("{} (git)", self.inner.describe())
    }
}

/// Picks the store of a file from its extension: `.csv` files are CSV
/// tables, everything else is JSON.
pub fn file_store_for_path(path: &Path) -> Box<dyn PersistenceAdapter> {
    let is_csv = path
        .extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        Box::new(CsvFileStore::new(path.to_path_buf()))
    } else {
        Box::new(JsonFileStore::new(path.to_path_buf()))
    }
}

/// Builds the store described by the configuration.
///
/// `out` overrides the configured location. `stdout` prints the table instead.
pub fn make_store(
    config: &BoardConfig,
    paths: &BoardPaths,
    out: Option<&str>,
) -> BoardResult<Box<dyn PersistenceAdapter>> {
    let settings = config.persistence_settings();
    // An empty --out falls back to the configured store.
    let out = out.filter(|o| !o.is_empty());
    let (base, path): (Box<dyn PersistenceAdapter>, PathBuf) = match out {
        Some("stdout") => return Ok(Box::new(StdoutStore {})),
        Some(p) => (file_store_for_path(Path::new(p)), PathBuf::from(p)),
        None => {
            let path = paths.resolve(&settings.file_path);
            let store: Box<dyn PersistenceAdapter> = match settings.provider.as_str() {
                "json" => Box::new(JsonFileStore::new(path.clone())),
                "csv" => Box::new(CsvFileStore::new(path.clone())),
                x => {
                    return UnknownProviderSnafu {
                        provider: x.to_string(),
                    }
                    .fail()
                }
            };
            (store, path)
        }
    };
    debug!("make_store: {} commit: {:?}", base.describe(), settings.commit);
    if settings.commit.unwrap_or(false) {
        Ok(Box::new(VersionedStore::new(base, path)))
    } else {
        Ok(base)
    }
}
