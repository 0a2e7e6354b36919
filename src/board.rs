use log::{debug, info, warn};

use leaderboard::*;
use snafu::{prelude::*, Snafu};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use serde::{Deserialize, Serialize};
use text_diff::print_diff;

use crate::args::Args;
use crate::board::config_reader::*;
use crate::board::countdown::run_countdown;
use crate::board::io_common::{check_upload_name, UploadCells};
use crate::board::persistence::*;
use crate::board::session::Session;

pub mod config_reader;
pub mod countdown;
mod io_common;
mod io_csv;
mod io_excel;
pub mod persistence;
pub mod session;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BoardError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error producing JSON: {source}"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of a CSV file: {source}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing CSV file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Missing worksheet in Excel file {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Unexpected cell at line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("The upload {path} has no data row"))]
    EmptyUpload { path: String },
    #[snafu(display("Line {lineno} of {path} is too short: the balance before is missing"))]
    UploadLineTooShort { path: String, lineno: usize },
    #[snafu(display("Please upload an {marker} file, got {path}"))]
    WrongUploadName { path: String, marker: String },
    #[snafu(display("Please select a file: {path} does not exist"))]
    MissingUpload { path: String },
    #[snafu(display("Unsupported upload format (csv or xlsx expected): {path}"))]
    UnsupportedUpload { path: String },
    #[snafu(display("Invalid deadline {deadline:?}: {source}"))]
    InvalidDeadline {
        source: chrono::ParseError,
        deadline: String,
    },
    #[snafu(display("Unknown persistence provider {provider:?}"))]
    UnknownProvider { provider: String },
    #[snafu(display("Error writing {path}"))]
    Writing {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Could not run git"))]
    VersionControlSpawn { source: std::io::Error },
    #[snafu(display("git failed: {message}"))]
    VersionControl { message: String },
    #[snafu(display("{source}"))]
    Leaderboard { source: LeaderboardError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Reads the balance cells of an upload after checking its name.
fn read_upload(path: &str, settings: &UploadSettings) -> BoardResult<UploadCells> {
    info!("Attempting to read upload {:?}", path);
    ensure!(
        Path::new(path).is_file(),
        MissingUploadSnafu {
            path: path.to_string(),
        }
    );
    check_upload_name(path, settings.file_name_marker())?;
    let extension = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => io_csv::read_csv_upload(path),
        "xlsx" | "xlsm" => {
            io_excel::read_excel_upload(path, settings.excel_worksheet_name.as_deref())
        }
        _ => UnsupportedUploadSnafu {
            path: path.to_string(),
        }
        .fail(),
    }
}

/// The table shown to the user.
pub fn render_table(title: &str, rows: &[LeaderboardRow]) -> String {
    let formatted: Vec<FormattedRow> = rows.iter().map(|r| r.formatted()).collect();
    let name_width = formatted
        .iter()
        .map(|r| r.team_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("TEAM NAME".len());
    let balance_width = formatted
        .iter()
        .map(|r| r.balance.chars().count())
        .max()
        .unwrap_or(0)
        .max("BALANCE".len());

    let mut res = String::new();
    res.push_str(title);
    res.push('\n');
    res.push_str(&format!(
        "{:>4} | {:<nw$} | {:>bw$}\n",
        "RANK",
        "TEAM NAME",
        "BALANCE",
        nw = name_width,
        bw = balance_width
    ));
    res.push_str(&format!(
        "{}-+-{}-+-{}\n",
        "-".repeat(4),
        "-".repeat(name_width),
        "-".repeat(balance_width)
    ));
    for r in formatted.iter() {
        res.push_str(&format!(
            "{:>4} | {:<nw$} | {:>bw$}\n",
            r.rank,
            r.team_name,
            r.balance,
            nw = name_width,
            bw = balance_width
        ));
    }
    res
}

/// The previously stored leaderboard, if it can be shown for the configured teams.
fn stored_rows(store: &dyn PersistenceAdapter, teams: &[String]) -> Option<Vec<LeaderboardRow>> {
    let board = match store.load() {
        Ok(Some(board)) if !board.results.is_empty() => board,
        Ok(_) => {
            debug!("stored_rows: nothing stored in {}", store.describe());
            return None;
        }
        Err(e) => {
            warn!("Could not read the stored leaderboard {}: {}", store.describe(), e);
            return None;
        }
    };
    match board.to_rows() {
        Ok(rows) => {
            let stored_teams: HashSet<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
            let configured: HashSet<&str> = teams.iter().map(|t| t.as_str()).collect();
            if rows.len() == teams.len() && stored_teams == configured {
                Some(rows)
            } else {
                warn!("The stored leaderboard does not match the configured teams, recomputing");
                None
            }
        }
        Err(e) => {
            warn!("The stored leaderboard is malformed: {}", e);
            None
        }
    }
}

fn check_reference(reference_path: &str, rows: &[LeaderboardRow]) -> BoardResult<()> {
    let reference = match file_store_for_path(Path::new(reference_path)).load()? {
        Some(reference) => reference,
        None => whatever!("Reference file {} not found", reference_path),
    };
    let computed = PersistedLeaderboard::from_rows("", rows);

    let pretty_ref =
        serde_json::to_string_pretty(&reference.results).context(WritingJsonSnafu {})?;
    let pretty_computed =
        serde_json::to_string_pretty(&computed.results).context(WritingJsonSnafu {})?;
    if pretty_ref != pretty_computed {
        warn!("Found differences with the reference leaderboard");
        print_diff(pretty_ref.as_str(), pretty_computed.as_str(), "\n");
        whatever!("Difference detected between the computed leaderboard and the reference leaderboard")
    }
    info!("The leaderboard matches the reference {}", reference_path);
    Ok(())
}

/// Runs one update of the leaderboard: applies the upload (if any), shows and
/// stores the table, then checks it and counts down if requested.
pub fn run_board(args: &Args) -> BoardResult<()> {
    let (config, config_dir): (BoardConfig, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let dir = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            (config, dir)
        }
        None => (BoardConfig::default_competition(), PathBuf::new()),
    };
    info!("config: {:?}", config);

    let teams = config.team_names();
    let deadline = config.deadline()?;
    let paths = BoardPaths::new(&config_dir, &config.output_settings);
    let store = make_store(&config, &paths, args.out.as_deref())?;
    let session_path = args
        .session
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| paths.session_file(&config));

    let mut session = Session::load(&session_path)?;
    let mut builder = session.builder(&teams)?;

    let uploaded = match (&args.team, &args.upload) {
        (Some(team), Some(upload_path)) => {
            // Nothing is modified until the upload is fully read and accepted.
            let cells = read_upload(upload_path, &config.upload_settings())?;
            let upload = cells.to_balance_pair(team)?;
            builder.add_upload(team, upload).context(LeaderboardSnafu {})?;
            session.record_upload(team, upload);
            true
        }
        (None, None) => false,
        _ => whatever!("--team and --upload must be given together"),
    };

    let stored = if uploaded || !session.is_empty() {
        None
    } else {
        stored_rows(store.as_ref(), &teams)
    };
    let fresh = stored.is_none();
    let rows = match stored {
        Some(rows) => {
            info!("Showing the stored leaderboard {}", store.describe());
            rows
        }
        None => builder.compute().context(LeaderboardSnafu {})?,
    };

    if uploaded {
        session.save(&session_path)?;
    }

    println!(
        "{}",
        render_table(&config.output_settings.competition_name, &rows)
    );

    if fresh {
        let board = PersistedLeaderboard::from_rows(&config.output_settings.competition_name, &rows);
        store.save(&board)?;
        info!("Leaderboard written to {}", store.describe());
    }

    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &rows)?;
    }

    if args.countdown {
        match deadline {
            Some(d) => run_countdown(d)?,
            None => whatever!("The competition has no deadline"),
        }
    }

    Ok(())
}
