// Primitives for reading CSV uploads.

use crate::board::{io_common::cells_from_row, io_common::UploadCells, *};

/// Reads the balance cells of a CSV account-history export.
///
/// The first line is the header. Line numbers in errors count it.
pub fn read_csv_upload(path: &str) -> BoardResult<UploadCells> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu {
            path: path.to_string(),
        })?;
    let mut records = rdr.into_records();
    let lineno: usize = 2;
    let line = records
        .next()
        .context(EmptyUploadSnafu {
            path: path.to_string(),
        })?
        .context(CsvLineParseSnafu { lineno })?;
    let row: Vec<String> = line.iter().map(|s| s.to_string()).collect();
    debug!("read_csv_upload: {:?} first row: {:?}", path, row);
    cells_from_row(path, lineno, &row)
}
