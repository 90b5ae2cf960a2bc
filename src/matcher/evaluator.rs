//! Per-event match evaluation.
//!
//! For each configured field, every pattern must be satisfied by at least one of the
//! field's values. In negate mode a pattern is satisfied by a value it does NOT match.
//! Fields are conjoined: the first field that fails drops the event.
//!
//! Absent fields are not failures. Without negate they are skipped; with negate they
//! count as matched. At least one field has to be evaluated and matched for a pass,
//! so a filter with no criteria drops everything.

use crate::error::FilterError;
use crate::event::Event;
use crate::matcher::registry::PatternRegistry;
use crate::matcher::types::{DropReason, MatchResult};
use regex::Regex;
use tracing::{debug, warn};

/// Decides pass or drop for single events against a compiled registry.
#[derive(Debug, Clone)]
pub struct MatchEvaluator {
    event_type: String,
    negate: bool,
    registry: PatternRegistry,
}

impl MatchEvaluator {
    pub fn new(event_type: impl Into<String>, negate: bool, registry: PatternRegistry) -> Self {
        Self {
            event_type: event_type.into(),
            negate,
            registry,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn negate(&self) -> bool {
        self.negate
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Evaluate `event`, cancelling it on any drop.
    pub fn evaluate<E: Event + ?Sized>(&self, event: &mut E) -> MatchResult {
        if event.event_type() != self.event_type {
            debug!(
                event_type = event.event_type(),
                source = event.source(),
                "grep: skipping event of other type"
            );
            return drop_event(event, DropReason::TypeMismatch);
        }

        let mut matched = false;
        for entry in self.registry.iter() {
            let field = entry.field.as_str();

            let value = match event.field(field) {
                Ok(value) => value,
                Err(FilterError::InvalidFieldShape { found, .. }) => {
                    warn!(field, found = %found, source = event.source(), "grep: invalid field shape");
                    return drop_event(
                        event,
                        DropReason::InvalidFieldShape {
                            field: field.to_string(),
                        },
                    );
                }
                Err(e) => {
                    warn!(field, error = %e, "grep: field lookup failed");
                    return drop_event(
                        event,
                        DropReason::InvalidFieldShape {
                            field: field.to_string(),
                        },
                    );
                }
            };

            let Some(value) = value else {
                if self.negate {
                    debug!(field, "grep: absent field counts as matched (negate)");
                    matched = true;
                } else {
                    debug!(field, "grep: skipping absent field");
                }
                continue;
            };

            let values = value.values();
            let wanted = entry.regexes.len();
            let satisfied = entry
                .regexes
                .iter()
                .filter(|regex| self.pattern_satisfied(regex, values))
                .count();

            if satisfied != wanted {
                debug!(field, satisfied, wanted, "grep: match block failed");
                return drop_event(
                    event,
                    DropReason::FieldMismatch {
                        field: field.to_string(),
                    },
                );
            }

            debug!(field, satisfied, "grep: matched all patterns");
            matched = true;
        }

        if !matched {
            debug!(source = event.source(), "grep: dropping event, no matches");
            return drop_event(event, DropReason::NoCriteriaMatched);
        }

        MatchResult::Pass
    }

    /// Whether one pattern is satisfied by at least one value, honouring negate.
    fn pattern_satisfied(&self, regex: &Regex, values: &[String]) -> bool {
        if self.negate {
            values.iter().any(|value| !regex.is_match(value))
        } else {
            values.iter().any(|value| regex.is_match(value))
        }
    }
}

fn drop_event<E: Event + ?Sized>(event: &mut E, reason: DropReason) -> MatchResult {
    event.cancel();
    MatchResult::Drop(reason)
}
