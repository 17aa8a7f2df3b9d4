use rusqlite::ToSql;
use rusqlite::types::Value;

use crate::types::RowValues;

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Named `SQLite` parameters; names carry the `:` prefix rusqlite expects.
pub struct Params {
    names: Vec<String>,
    values: Vec<Value>,
}

impl Params {
    #[must_use]
    pub fn convert(bindings: &[(&str, &RowValues)]) -> Self {
        let mut names = Vec::with_capacity(bindings.len());
        let mut values = Vec::with_capacity(bindings.len());
        for (name, value) in bindings {
            names.push(format!(":{name}"));
            values.push(row_value_to_sqlite_value(value));
        }
        Params { names, values }
    }

    /// Borrowed `(name, value)` pairs suitable for rusqlite's named binding.
    #[must_use]
    pub fn as_named(&self) -> Vec<(&str, &dyn ToSql)> {
        self.names
            .iter()
            .zip(&self.values)
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn names_gain_colon_prefix() {
        let key = RowValues::Text("abc".into());
        let flag = RowValues::Bool(true);
        let params = Params::convert(&[("key", &key), ("flag", &flag)]);
        let named: Vec<&str> = params.as_named().iter().map(|(n, _)| *n).collect();
        assert_eq!(named, vec![":key", ":flag"]);
    }

    #[test]
    fn timestamps_and_json_become_text() {
        let ts = NaiveDate::from_ymd_opt(2021, 6, 6)
            .unwrap()
            .and_hms_opt(1, 2, 3)
            .unwrap();
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Timestamp(ts)),
            Value::Text("2021-06-06 01:02:03".into())
        );
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::JSON(serde_json::json!({"a": 1}))),
            Value::Text(r#"{"a":1}"#.into())
        );
    }
}
