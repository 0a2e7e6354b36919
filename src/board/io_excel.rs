use calamine::DataType;

use crate::board::{io_common::cells_from_row, io_common::UploadCells, *};

/// Reads the balance cells of an Excel account-history export.
///
/// Uses the given worksheet, or the first one of the workbook.
pub fn read_excel_upload(path: &str, worksheet_name: Option<&str>) -> BoardResult<UploadCells> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyUploadSnafu {
        path: path.to_string(),
    })?;
    debug!("read_excel_upload: header: {:?}", header);

    let lineno: usize = 2;
    let first = iter.next().context(EmptyUploadSnafu {
        path: path.to_string(),
    })?;
    debug!("read_excel_upload: first row: {:?}", first);
    // Only the balance columns are read. The other columns (dates, labels)
    // may hold any type of cell.
    let mut row: Vec<String> = vec![String::new()];
    for cell in first.iter().skip(1).take(2) {
        row.push(read_cell(cell, lineno)?);
    }
    cells_from_row(path, lineno, &row)
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> BoardResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu {
        path: path.to_string(),
    })?;

    let wrange_o = match worksheet_name {
        Some(name) => workbook.worksheet_range(name),
        None => workbook.worksheet_range_at(0),
    };
    let wrange = wrange_o
        .context(EmptyExcelSnafu {
            path: path.to_string(),
        })?
        .context(OpeningExcelSnafu {
            path: path.to_string(),
        })?;
    Ok(wrange)
}

// Numbers are turned back into text so that every upload goes through the
// same cell parser.
fn read_cell(cell: &DataType, lineno: usize) -> BoardResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Empty => Ok(String::new()),
        _ => Err(BoardError::ExcelWrongCellType {
            lineno: lineno as u64,
            content: format!("{:?}", cell),
        }),
    }
}
