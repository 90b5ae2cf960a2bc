//! Typed configuration for a grep filter instance.
//!
//! A configuration is parsed once, validated, and handed to
//! [`GrepFilter::new`](crate::GrepFilter::new), which compiles it. Documents use the
//! classic grep filter keys:
//!
//! ```yaml
//! type: syslog
//! negate: false
//! match:
//!   message: "ERROR.*"
//!   program: ["^sshd", "^cron"]
//! add_fields:
//!   level: "%{program}"
//! add_tags:
//!   - grepped
//! ```
//!
//! Mapping keys keep their declared order, which is the order fields are evaluated and
//! mutations are applied in.

use crate::error::{FilterError, Result};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

/// The ordered list of patterns configured for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPatterns {
    pub field: String,
    pub patterns: Vec<String>,
}

/// A field to append to on a pass, and the template producing the appended value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTemplate {
    pub field: String,
    pub template: String,
}

/// Grep filter configuration.
///
/// # Examples
///
/// ```rust
/// use event_grep::GrepConfig;
///
/// let config = GrepConfig::new("syslog")
///     .with_pattern("message", "ERROR.*")
///     .with_added_field("level", "error")
///     .with_added_tag("grepped");
///
/// assert_eq!(config.event_type, "syslog");
/// assert!(!config.negate);
/// assert_eq!(config.field_patterns.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrepConfig {
    /// Only events of this type are evaluated; all others are dropped.
    #[serde(rename = "type")]
    pub event_type: String,

    /// Invert the per-pattern test: a pattern is satisfied by a value it does NOT match.
    #[serde(default)]
    pub negate: bool,

    #[serde(
        rename = "match",
        default,
        deserialize_with = "deserialize_field_patterns"
    )]
    pub field_patterns: Vec<FieldPatterns>,

    #[serde(default, deserialize_with = "deserialize_field_templates")]
    pub add_fields: Vec<FieldTemplate>,

    #[serde(default, deserialize_with = "deserialize_tags")]
    pub add_tags: Vec<String>,
}

impl GrepConfig {
    /// Create a configuration gating on `event_type` with no criteria or mutations.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            ..Self::default()
        }
    }

    /// Parse a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file. `.json` files are parsed as JSON, everything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
    }

    /// Check structural constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if let Some(entry) = self.field_patterns.iter().find(|e| e.field.is_empty()) {
            return Err(FilterError::ConfigError(format!(
                "match entry with patterns {:?} has an empty field name",
                entry.patterns
            )));
        }
        if let Some(entry) = self.add_fields.iter().find(|e| e.field.is_empty()) {
            return Err(FilterError::ConfigError(format!(
                "add_fields entry with template '{}' has an empty field name",
                entry.template
            )));
        }
        Ok(())
    }

    // Builder methods

    /// Enable or disable negate mode.
    pub fn with_negate(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    /// Add one pattern for `field`. Repeated calls for the same field extend its list.
    pub fn with_pattern(self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.with_patterns(field, [pattern.into()])
    }

    /// Add several patterns for `field`.
    pub fn with_patterns<I, S>(mut self, field: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        push_patterns(
            &mut self.field_patterns,
            field.into(),
            patterns.into_iter().map(Into::<String>::into),
        );
        self
    }

    /// Append `template` to `field` whenever an event passes.
    pub fn with_added_field(
        mut self,
        field: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.add_fields.push(FieldTemplate {
            field: field.into(),
            template: template.into(),
        });
        self
    }

    /// Append the expansion of `template` to the tags whenever an event passes.
    pub fn with_added_tag(mut self, template: impl Into<String>) -> Self {
        self.add_tags.push(template.into());
        self
    }

    /// Total number of pattern strings across all fields.
    pub fn pattern_count(&self) -> usize {
        self.field_patterns.iter().map(|e| e.patterns.len()).sum()
    }
}

fn push_patterns(
    entries: &mut Vec<FieldPatterns>,
    field: String,
    patterns: impl Iterator<Item = String>,
) {
    match entries.iter_mut().find(|e| e.field == field) {
        Some(entry) => entry.patterns.extend(patterns),
        None => entries.push(FieldPatterns {
            field,
            patterns: patterns.collect(),
        }),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(pattern) => vec![pattern],
            OneOrMany::Many(patterns) => patterns,
        }
    }
}

/// A mapping deserialized into its entries in document order.
struct OrderedEntries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedEntries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = OrderedEntries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of field names")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

fn deserialize_field_patterns<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<FieldPatterns>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<OrderedEntries<OneOrMany>>::deserialize(deserializer)?;
    let mut field_patterns = Vec::new();
    for (field, patterns) in entries.map(|e| e.0).unwrap_or_default() {
        push_patterns(&mut field_patterns, field, patterns.into_vec().into_iter());
    }
    Ok(field_patterns)
}

fn deserialize_field_templates<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<FieldTemplate>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<OrderedEntries<String>>::deserialize(deserializer)?;
    Ok(entries
        .map(|e| e.0)
        .unwrap_or_default()
        .into_iter()
        .map(|(field, template)| FieldTemplate { field, template })
        .collect())
}

fn deserialize_tags<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
