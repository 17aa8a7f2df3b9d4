use crate::arguments::Arguments;
use crate::error::{ErrorLog, ProcedureError};
use crate::procedure::ProcedureRequest;

/// Result of the most recent execute on a call state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Where a staged call currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    /// Nothing recorded since construction or the last `clear`.
    Empty,
    /// A procedure name is recorded, arguments are not.
    ProcedureSet,
    /// Arguments are recorded.
    ArgsSet,
    /// A setter failed; execute is blocked until `clear`.
    Errored,
    /// Execute ran; values stay in place until `clear`.
    Executed(Outcome),
}

/// The staged `set_procedure` / `set_arguments` / `execute` protocol.
///
/// Errors accumulate across calls and are only reset by [`CallState::clear`].
/// Prefer building a [`ProcedureRequest`] directly when the whole call is known up front.
#[derive(Debug, Clone, Default)]
pub struct CallState {
    procedure: Option<String>,
    arguments: Option<Arguments>,
    errors: ErrorLog,
    outcome: Option<Outcome>,
}

impl CallState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the procedure name; an empty name is recorded as an error instead.
    pub fn set_procedure(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.outcome = None;
        if name.is_empty() {
            self.errors.push(ProcedureError::EmptyProcedureName);
        } else {
            self.procedure = Some(name);
        }
    }

    /// Record the arguments. An empty mapping is a valid value.
    pub fn set_arguments(&mut self, arguments: Arguments) {
        self.set_arguments_opt(Some(arguments));
    }

    /// Like [`CallState::set_arguments`], but `None` is recorded as an error.
    pub fn set_arguments_opt(&mut self, arguments: Option<Arguments>) {
        self.outcome = None;
        match arguments {
            Some(arguments) => self.arguments = Some(arguments),
            None => self.errors.push(ProcedureError::ArgumentsNotProvided),
        }
    }

    /// Reset to [`CallPhase::Empty`].
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Recorded error messages joined with `", "`.
    #[must_use]
    pub fn errors(&self) -> String {
        self.errors.joined()
    }

    #[must_use]
    pub fn error_log(&self) -> &ErrorLog {
        &self.errors
    }

    #[must_use]
    pub fn procedure(&self) -> Option<&str> {
        self.procedure.as_deref()
    }

    #[must_use]
    pub fn arguments(&self) -> Option<&Arguments> {
        self.arguments.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> CallPhase {
        if let Some(outcome) = self.outcome {
            CallPhase::Executed(outcome)
        } else if !self.errors.is_empty() {
            CallPhase::Errored
        } else if self.arguments.is_some() {
            CallPhase::ArgsSet
        } else if self.procedure.is_some() {
            CallPhase::ProcedureSet
        } else {
            CallPhase::Empty
        }
    }

    /// The error that blocks execution, if any was recorded.
    pub(crate) fn blocking_error(&self) -> Option<&ProcedureError> {
        self.errors.first()
    }

    /// Turn the recorded values into a validated request.
    pub(crate) fn to_request(&self) -> Result<ProcedureRequest, ProcedureError> {
        let name = self.procedure.as_deref().ok_or_else(|| {
            ProcedureError::InvalidProcedure("procedure not set, empty".to_string())
        })?;
        let arguments = self.arguments.clone().ok_or_else(|| {
            ProcedureError::InvalidArguments("arguments not set".to_string())
        })?;
        ProcedureRequest::from_name(name, arguments)
    }

    pub(crate) fn record_failure(&mut self, err: ProcedureError) {
        self.errors.push(err);
        self.outcome = Some(Outcome::Failure);
    }

    pub(crate) fn record_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }
}
