//! Field and tag mutations applied to passing events.

use crate::config::FieldTemplate;
use crate::event::Event;
use tracing::{debug, warn};

/// Counts of what one [`MutationApplier::apply`] call appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationSummary {
    pub fields_appended: usize,
    pub fields_skipped: usize,
    pub tags_appended: usize,
}

/// Appends expanded field values and tags to an event.
///
/// Everything is append-only: applying twice accumulates values, nothing previously
/// present is replaced or removed.
#[derive(Debug, Clone, Default)]
pub struct MutationApplier {
    add_fields: Vec<FieldTemplate>,
    add_tags: Vec<String>,
}

impl MutationApplier {
    pub fn new(add_fields: Vec<FieldTemplate>, add_tags: Vec<String>) -> Self {
        Self {
            add_fields,
            add_tags,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add_fields.is_empty() && self.add_tags.is_empty()
    }

    /// Apply fields first, then tags, each in configured order.
    ///
    /// Templates are expanded against the event as it stands at that moment, so a
    /// later template sees values appended by an earlier one.
    pub fn apply<E: Event + ?Sized>(&self, event: &mut E) -> MutationSummary {
        let mut summary = MutationSummary::default();

        for FieldTemplate { field, template } in &self.add_fields {
            let value = event.expand(template);
            match event.append_field(field, value) {
                Ok(()) => {
                    debug!(field = %field, template = %template, "grep: added field value");
                    summary.fields_appended += 1;
                }
                Err(e) => {
                    warn!(field = %field, error = %e, "grep: cannot append to field");
                    summary.fields_skipped += 1;
                }
            }
        }

        for template in &self.add_tags {
            let tag = event.expand(template);
            debug!(tag = %tag, "grep: added tag");
            event.append_tag(tag);
            summary.tags_appended += 1;
        }

        summary
    }
}
