//! Convenient imports for common functionality.
//!
//! ```rust
//! use sql_procedures::prelude::*;
//! ```

pub use crate::arguments::Arguments;
pub use crate::call_state::{CallPhase, Outcome};
pub use crate::config::ConnectionSettings;
pub use crate::error::{ErrorKind, ProcedureError};
pub use crate::executor::ProcedureExecutor;
pub use crate::procedure::{Procedure, ProcedureRequest};
pub use crate::results::{ResultSet, Row};
pub use crate::statement::ExecutedStatement;
pub use crate::types::{BackendKind, RowValues};

#[cfg(feature = "trusted-raw")]
pub use crate::trusted::TrustedSql;
