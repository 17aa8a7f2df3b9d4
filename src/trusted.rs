use crate::error::ProcedureError;

/// SQL text the caller vouches for, executed verbatim by
/// [`ProcedureExecutor::execute_trusted`](crate::ProcedureExecutor::execute_trusted).
///
/// Never build one from end-user input: nothing here checks or escapes the text.
/// Named `:name` placeholders are still bound from the supplied arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedSql(String);

impl TrustedSql {
    /// # Errors
    /// Returns `ProcedureError::InvalidProcedure` for empty or whitespace-only text.
    pub fn new(sql: impl Into<String>) -> Result<Self, ProcedureError> {
        let sql = sql.into();
        if sql.trim().is_empty() {
            return Err(ProcedureError::InvalidProcedure(
                "trusted SQL is empty".to_string(),
            ));
        }
        Ok(Self(sql))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
