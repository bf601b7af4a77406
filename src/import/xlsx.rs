//! Workbook reader
//!
//! Reads the first worksheet of an uploaded workbook into a grid of raw cell values.
//! Merges are ignored; only the value at each row/column position matters.

use super::ImportError;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::{Number, Value};
use std::io::Cursor;
use tracing::debug;

/// Cell grid with absolute positions; `None` marks an empty cell.
pub type CellGrid = Vec<Vec<Option<Value>>>;

/// Read the first worksheet of an xlsx/xls/ods workbook.
pub fn read_first_sheet(bytes: &[u8]) -> Result<CellGrid, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let sheet_names = workbook.sheet_names();
    let first = sheet_names.first().ok_or(ImportError::NoSheet)?.clone();

    let range = workbook.worksheet_range(&first)?;
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    debug!(
        "Reading sheet '{}' ({} rows from row {})",
        first,
        range.height(),
        start_row
    );

    let mut grid: CellGrid = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells: Vec<Option<Value>> = vec![None; start_col as usize];
        cells.extend(row.iter().map(cell_value));
        grid.push(cells);
    }

    Ok(grid)
}

/// JSON value of a cell; empty strings and error cells read as empty.
pub fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => (!s.is_empty()).then(|| Value::String(s.clone())),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                Some(Value::from(*f as i64))
            } else {
                Number::from_f64(*f).map(Value::Number)
            }
        }
        Data::Int(i) => Some(Value::from(*i)),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64()).map(|dt| {
            let text = if dt.time() == NaiveTime::MIN {
                dt.format("%Y-%m-%d").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M:%S").to_string()
            };
            Value::String(text)
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
    }
}

/// Convert an Excel serial date (1900 system) to a date-time, rounded to the second.
fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = serial.floor() as u64;
    let seconds = ((serial - serial.floor()) * 86_400.0).round() as u32;

    // Serial 0 is 1899-12-30 once the fictitious 1900-02-29 is accounted for
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = base.checked_add_days(Days::new(days))?;
    let datetime = date.and_hms_opt(0, 0, 0)?;
    let datetime = datetime.checked_add_signed(chrono::Duration::seconds(i64::from(seconds)))?;
    Some(datetime.with_nanosecond(0).unwrap_or(datetime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value(&Data::Empty), None);
        assert_eq!(cell_value(&Data::String(String::new())), None);
        assert_eq!(cell_value(&Data::String("粤B12345".into())), Some(json!("粤B12345")));
        assert_eq!(cell_value(&Data::Float(45.0)), Some(json!(45)));
        assert_eq!(cell_value(&Data::Float(1.5)), Some(json!(1.5)));
        assert_eq!(cell_value(&Data::Int(7)), Some(json!(7)));
        assert_eq!(cell_value(&Data::Bool(true)), Some(json!(true)));
    }

    #[test]
    fn test_excel_serial_dates() {
        let dt = excel_serial_to_datetime(45292.0).unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-01");
        let dt = excel_serial_to_datetime(45292.5).unwrap();
        assert_eq!(dt.format("%H:%M:%S").to_string(), "12:00:00");
        assert!(excel_serial_to_datetime(-1.0).is_none());
    }

    #[test]
    fn test_garbage_bytes_fail() {
        assert!(read_first_sheet(b"not a workbook").is_err());
    }
}
