//! Outcome types for per-event evaluation.

use std::fmt;

/// Why an event was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The event's type differs from the configured type; no field was examined.
    TypeMismatch,
    /// A present field did not satisfy every one of its patterns.
    FieldMismatch { field: String },
    /// No configured field was evaluated and matched, including the case of no criteria.
    NoCriteriaMatched,
    /// A field held a value that is neither a scalar nor a sequence of scalars.
    InvalidFieldShape { field: String },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::TypeMismatch => write!(f, "type mismatch"),
            DropReason::FieldMismatch { field } => write!(f, "field '{field}' did not match"),
            DropReason::NoCriteriaMatched => write!(f, "no criteria matched"),
            DropReason::InvalidFieldShape { field } => {
                write!(f, "field '{field}' has an invalid shape")
            }
        }
    }
}

/// Result of running one event through the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Pass,
    Drop(DropReason),
}

impl MatchResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, MatchResult::Pass)
    }

    pub fn is_drop(&self) -> bool {
        !self.is_pass()
    }

    pub fn drop_reason(&self) -> Option<&DropReason> {
        match self {
            MatchResult::Pass => None,
            MatchResult::Drop(reason) => Some(reason),
        }
    }
}
