//! Event model consumed by the grep filter.
//!
//! The filter never constructs events. It is generic over the [`Event`] trait, which
//! names the capabilities it needs from the host pipeline's records: type and source
//! classification, field lookup, append-only mutation, template expansion, and the
//! one-way cancel signal.
//!
//! [`LogEvent`] is the bundled implementation, using the classic JSON envelope:
//!
//! ```json
//! {
//!   "@type": "syslog",
//!   "@source": "file:///var/log/messages",
//!   "@message": "ERROR disk full",
//!   "@fields": {"program": "kernel", "pid": ["12", "14"]},
//!   "@tags": []
//! }
//! ```

mod template;

pub use template::expand_template;

use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A field value: a single scalar or an ordered sequence of scalars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    Sequence(Vec<String>),
}

impl FieldValue {
    /// The value as an ordered sequence. A scalar is a one-element slice.
    pub fn values(&self) -> &[String] {
        match self {
            FieldValue::Scalar(value) => std::slice::from_ref(value),
            FieldValue::Sequence(values) => values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Sequence(values)
    }
}

/// Capabilities the grep filter requires from an event record.
pub trait Event {
    /// Type classification the filter gates on.
    fn event_type(&self) -> &str;

    /// Provenance, used for diagnostics only.
    fn source(&self) -> &str;

    /// Look up a field.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - The field is present
    /// * `Ok(None)` - The field is absent
    /// * `Err(FilterError::InvalidFieldShape)` - The stored value is not a scalar or a
    ///   sequence of scalars
    fn field(&self, name: &str) -> Result<Option<FieldValue>>;

    /// Append `value` to a field's value sequence, creating the sequence when absent.
    fn append_field(&mut self, name: &str, value: String) -> Result<()>;

    /// Append a tag. Duplicates are allowed.
    fn append_tag(&mut self, tag: String);

    fn tags(&self) -> &[String];

    /// Expand field references in `template` against the event's current values.
    fn expand(&self, template: &str) -> String;

    /// Signal the host pipeline to drop this event. Idempotent and one-way.
    fn cancel(&mut self);

    fn is_cancelled(&self) -> bool;
}

/// A structured log event.
///
/// # Examples
///
/// ```rust
/// use event_grep::{Event, FieldValue, LogEvent};
///
/// let mut event = LogEvent::new("syslog", "file:///var/log/messages")
///     .with_message("ERROR disk full")
///     .with_field("program", "kernel");
///
/// assert_eq!(event.field("program").unwrap(), Some(FieldValue::from("kernel")));
/// assert_eq!(event.expand("%{program}: %{@message}"), "kernel: ERROR disk full");
///
/// event.cancel();
/// assert!(event.is_cancelled());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    #[serde(rename = "@type", default)]
    pub event_type: String,

    #[serde(rename = "@source", default)]
    pub source: String,

    #[serde(rename = "@message", default)]
    pub message: String,

    #[serde(rename = "@fields", default)]
    pub fields: BTreeMap<String, Value>,

    #[serde(rename = "@tags", default)]
    pub tags: Vec<String>,

    /// Drop marker for the host pipeline. Never serialized.
    #[serde(skip)]
    cancelled: bool,
}

impl LogEvent {
    pub fn new(event_type: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source: source.into(),
            ..Self::default()
        }
    }

    /// Parse an event from its JSON envelope.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set a field to a scalar or sequence value, replacing any previous value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let value = match value.into() {
            FieldValue::Scalar(s) => Value::String(s),
            FieldValue::Sequence(values) => {
                Value::Array(values.into_iter().map(Value::String).collect())
            }
        };
        self.fields.insert(name.into(), value);
        self
    }

    /// Set a field to an arbitrary JSON value.
    pub fn with_raw_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Envelope attributes addressable by name when `@fields` has no entry of that name.
    fn envelope_value(&self, name: &str) -> Option<&str> {
        match name {
            "@type" => Some(&self.event_type),
            "@source" => Some(&self.source),
            "@message" => Some(&self.message),
            _ => None,
        }
    }
}

/// Convert a scalar JSON value to its matching string. `None` for non-scalars.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Event for LogEvent {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn field(&self, name: &str) -> Result<Option<FieldValue>> {
        let value = match self.fields.get(name) {
            None => return Ok(self.envelope_value(name).map(FieldValue::from)),
            Some(Value::Null) => return Ok(None),
            Some(value) => value,
        };

        if let Some(scalar) = scalar_to_string(value) {
            return Ok(Some(FieldValue::Scalar(scalar)));
        }

        match value {
            Value::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    let scalar =
                        scalar_to_string(item).ok_or_else(|| FilterError::InvalidFieldShape {
                            field: name.to_string(),
                            found: format!("array containing {}", shape_name(item)),
                        })?;
                    values.push(scalar);
                }
                Ok(Some(FieldValue::Sequence(values)))
            }
            other => Err(FilterError::InvalidFieldShape {
                field: name.to_string(),
                found: shape_name(other).to_string(),
            }),
        }
    }

    fn append_field(&mut self, name: &str, value: String) -> Result<()> {
        let slot = self
            .fields
            .entry(name.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));

        match slot {
            Value::Array(items) => items.push(Value::String(value)),
            Value::Object(_) => {
                return Err(FilterError::InvalidFieldShape {
                    field: name.to_string(),
                    found: "object".to_string(),
                })
            }
            other => {
                let previous = other.take();
                *other = if previous.is_null() {
                    Value::Array(vec![Value::String(value)])
                } else {
                    Value::Array(vec![previous, Value::String(value)])
                };
            }
        }
        Ok(())
    }

    fn append_tag(&mut self, tag: String) {
        self.tags.push(tag);
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn expand(&self, template: &str) -> String {
        expand_template(template, |name| match self.field(name) {
            Ok(Some(value)) => Some(value.values().join(",")),
            _ => None,
        })
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
