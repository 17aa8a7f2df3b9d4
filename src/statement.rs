use crate::results::{ResultSet, Row};

/// The outcome of a successfully executed procedure.
///
/// The connection that produced it is already closed; everything a caller can
/// read (rows, affected count, generated id) was collected before release.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    sql: String,
    result_set: ResultSet,
    rows_affected: usize,
    last_insert_id: i64,
}

impl ExecutedStatement {
    pub(crate) fn new(
        sql: String,
        result_set: ResultSet,
        rows_affected: usize,
        last_insert_id: i64,
    ) -> Self {
        Self {
            sql,
            result_set,
            rows_affected,
            last_insert_id,
        }
    }

    /// The SQL text exactly as it was prepared.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn result_set(&self) -> &ResultSet {
        &self.result_set
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        self.result_set.rows()
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.result_set.column_names()
    }

    /// Rows changed by a statement without result columns, or rows returned otherwise.
    #[must_use]
    pub fn rows_affected(&self) -> usize {
        self.rows_affected
    }

    /// Id generated by the statement's connection; 0 when none was generated.
    #[must_use]
    pub fn last_insert_id(&self) -> i64 {
        self.last_insert_id
    }

    #[must_use]
    pub fn into_result_set(self) -> ResultSet {
        self.result_set
    }
}
