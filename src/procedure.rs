use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::arguments::Arguments;
use crate::error::ProcedureError;
use crate::translation::{named_placeholders, translate_named_placeholders};
use crate::types::{PlaceholderStyle, RowValues};

/// How many arguments a procedure accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Any number of arguments; only the ones named in the template are bound.
    Any,
    /// Exactly this many arguments.
    Exactly(usize),
}

impl Arity {
    #[must_use]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Any => true,
            Arity::Exactly(n) => n == count,
        }
    }
}

/// The operations an executor knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    /// `getAllUsernames`
    GetAllUsernames,
    /// `getUserByKey`, also reachable as `getUserByUsername`
    GetUserByKey,
}

static REGISTRY: LazyLock<HashMap<&'static str, Procedure>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for procedure in Procedure::ALL {
        map.insert(procedure.name(), procedure);
        for alias in procedure.aliases() {
            map.insert(*alias, procedure);
        }
    }
    map
});

impl Procedure {
    pub const ALL: [Procedure; 2] = [Procedure::GetAllUsernames, Procedure::GetUserByKey];

    /// Canonical name used for lookup and logging.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Procedure::GetAllUsernames => "getAllUsernames",
            Procedure::GetUserByKey => "getUserByKey",
        }
    }

    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Procedure::GetAllUsernames => &[],
            Procedure::GetUserByKey => &["getUserByUsername"],
        }
    }

    /// SQL template with `:name` placeholders.
    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            Procedure::GetAllUsernames => "SELECT username FROM users",
            Procedure::GetUserByKey => "SELECT * FROM users WHERE key = :key",
        }
    }

    #[must_use]
    pub fn arity(self) -> Arity {
        match self {
            Procedure::GetAllUsernames => Arity::Any,
            Procedure::GetUserByKey => Arity::Exactly(1),
        }
    }

    /// Look a procedure up by canonical name or alias.
    ///
    /// # Errors
    /// Returns `ProcedureError::InvalidProcedure` for an empty or unknown name.
    pub fn lookup(name: &str) -> Result<Procedure, ProcedureError> {
        if name.is_empty() {
            return Err(ProcedureError::InvalidProcedure(
                "procedure not set, empty".to_string(),
            ));
        }
        REGISTRY.get(name).copied().ok_or_else(|| {
            ProcedureError::InvalidProcedure(format!(
                "'{name}' is not in the procedure table"
            ))
        })
    }

    /// Check that `args` fits this procedure's arity and covers every placeholder.
    ///
    /// # Errors
    /// Returns `ProcedureError::InvalidArguments` on a count mismatch or a missing name.
    pub fn validate(self, args: &Arguments) -> Result<(), ProcedureError> {
        if !self.arity().accepts(args.len()) {
            let expected = match self.arity() {
                Arity::Exactly(n) => n,
                Arity::Any => args.len(),
            };
            return Err(ProcedureError::InvalidArguments(format!(
                "{} expects {expected} argument(s), got {}",
                self.name(),
                args.len()
            )));
        }
        check_placeholders(self.sql(), args)
    }
}

pub(crate) fn check_placeholders(sql: &str, args: &Arguments) -> Result<(), ProcedureError> {
    if let Some(missing) = named_placeholders(sql)
        .into_iter()
        .find(|name| !args.contains(name))
    {
        return Err(ProcedureError::InvalidArguments(format!(
            "missing argument ':{missing}'"
        )));
    }
    Ok(())
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Procedure {
    type Err = ProcedureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Procedure::lookup(s)
    }
}

/// One procedure call: the operation plus its arguments, validated up front.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureRequest {
    procedure: Procedure,
    arguments: Arguments,
}

impl ProcedureRequest {
    /// # Errors
    /// Returns `ProcedureError::InvalidArguments` if `arguments` does not fit `procedure`.
    pub fn new(procedure: Procedure, arguments: Arguments) -> Result<Self, ProcedureError> {
        procedure.validate(&arguments)?;
        Ok(Self {
            procedure,
            arguments,
        })
    }

    /// # Errors
    /// Returns `ProcedureError::InvalidProcedure` for unknown names, or the errors of
    /// [`ProcedureRequest::new`].
    pub fn from_name(name: &str, arguments: Arguments) -> Result<Self, ProcedureError> {
        Self::new(Procedure::lookup(name)?, arguments)
    }

    #[must_use]
    pub fn procedure(&self) -> Procedure {
        self.procedure
    }

    #[must_use]
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Produce the SQL text and ordered bindings for a backend.
    #[must_use]
    pub fn bind(&self, style: PlaceholderStyle) -> BoundQuery<'_> {
        BoundQuery::new(self.procedure.sql(), &self.arguments, style)
    }
}

/// SQL text ready for a backend, with bindings in placeholder order.
///
/// Only arguments referenced by the SQL are bound.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery<'a> {
    sql: Cow<'a, str>,
    bindings: Vec<(&'a str, &'a RowValues)>,
}

impl<'a> BoundQuery<'a> {
    /// Callers must have checked every placeholder has an argument; unknown names
    /// are dropped here.
    pub(crate) fn new(sql: &'a str, args: &'a Arguments, style: PlaceholderStyle) -> Self {
        let bindings = named_placeholders(sql)
            .into_iter()
            .filter_map(|name| args.get(name).map(|value| (name, value)))
            .collect();
        Self {
            sql: translate_named_placeholders(sql, style),
            bindings,
        }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn bindings(&self) -> &[(&'a str, &'a RowValues)] {
        &self.bindings
    }

    pub fn values(&self) -> impl Iterator<Item = &'a RowValues> + '_ {
        self.bindings.iter().map(|(_, value)| *value)
    }
}
