//! Rows and result sets returned by executed procedures.

mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::Row;
