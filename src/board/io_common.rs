use crate::board::*;

use std::path::Path;

/// The two balance cells of an upload, as they were read from the file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct UploadCells {
    pub before: String,
    pub after: String,
}

impl UploadCells {
    pub fn to_balance_pair(&self, team: &str) -> BoardResult<BalancePair> {
        BalancePair::from_cells(&self.before, &self.after)
            .map_err(|e| e.for_team(team))
            .context(LeaderboardSnafu {})
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Only account-history exports are accepted. They are recognized by their name.
pub fn check_upload_name(path: &str, marker: &str) -> BoardResult<()> {
    let file_name = simplify_file_name(path);
    ensure!(
        file_name.contains(marker),
        WrongUploadNameSnafu {
            path: path.to_string(),
            marker: marker.to_string(),
        }
    );
    Ok(())
}

/// Extracts the balance cells from the first data row of an upload.
///
/// The balance before is in the second column and is mandatory. The balance
/// after is in the third column; when the column is missing it is read as an
/// empty cell.
pub fn cells_from_row(path: &str, lineno: usize, row: &[String]) -> BoardResult<UploadCells> {
    debug!("cells_from_row: {:?} line {:?}: {:?}", path, lineno, row);
    let before = row.get(1).context(UploadLineTooShortSnafu {
        path: path.to_string(),
        lineno,
    })?;
    let after = row.get(2).cloned().unwrap_or_default();
    Ok(UploadCells {
        before: before.clone(),
        after,
    })
}
