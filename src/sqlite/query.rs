use rusqlite::types::Value;
use rusqlite::{Statement, ToSql};

use crate::results::ResultSet;
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
/// Returns the `rusqlite` error if the column cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<RowValues> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run a prepared statement that returns columns and collect every row.
///
/// # Errors
/// Returns the `rusqlite` error from binding, stepping or value extraction.
pub fn build_result_set(
    stmt: &mut Statement<'_>,
    params: &[(&str, &dyn ToSql)],
) -> rusqlite::Result<ResultSet> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();
    let mut result_set = ResultSet::with_columns(column_names, 10);

    let mut rows = stmt.query(params)?;
    while let Some(row) = rows.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value(row, i)?);
        }
        result_set.push_row(row_values);
    }

    Ok(result_set)
}
