//! Compile-once pattern registry.

use crate::config::FieldPatterns;
use crate::error::{FilterError, Result};
use regex::Regex;
use tracing::debug;

/// Compiled patterns for one field, in configured order.
#[derive(Debug, Clone)]
pub struct FieldRegexes {
    pub field: String,
    pub regexes: Vec<Regex>,
}

/// Field name → ordered compiled patterns, in configuration order.
///
/// Built once by [`PatternRegistry::compile`] and read-only afterwards. `Regex` is
/// `Send + Sync`, so a registry can be shared across threads evaluating events
/// concurrently without locking.
///
/// # Example
/// ```rust
/// use event_grep::config::FieldPatterns;
/// use event_grep::matcher::PatternRegistry;
///
/// let registry = PatternRegistry::compile(&[FieldPatterns {
///     field: "message".to_string(),
///     patterns: vec!["ERROR.*".to_string(), "disk".to_string()],
/// }])?;
///
/// assert_eq!(registry.len(), 1);
/// assert_eq!(registry.pattern_count(), 2);
/// # Ok::<(), event_grep::FilterError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    entries: Vec<FieldRegexes>,
}

impl PatternRegistry {
    /// Compile every pattern string. The first invalid pattern fails the whole registry.
    pub fn compile(field_patterns: &[FieldPatterns]) -> Result<Self> {
        let mut entries: Vec<FieldRegexes> = Vec::with_capacity(field_patterns.len());

        for entry in field_patterns {
            let mut regexes = Vec::with_capacity(entry.patterns.len());
            for pattern in &entry.patterns {
                let regex = Regex::new(pattern).map_err(|e| FilterError::InvalidRegex {
                    field: entry.field.clone(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                debug!(field = %entry.field, pattern = %pattern, "compiled grep pattern");
                regexes.push(regex);
            }

            match entries.iter_mut().find(|e| e.field == entry.field) {
                Some(existing) => existing.regexes.extend(regexes),
                None => entries.push(FieldRegexes {
                    field: entry.field.clone(),
                    regexes,
                }),
            }
        }

        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRegexes> {
        self.entries.iter()
    }

    /// Number of fields with configured patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total compiled patterns across all fields.
    pub fn pattern_count(&self) -> usize {
        self.entries.iter().map(|e| e.regexes.len()).sum()
    }

    pub fn patterns_for(&self, field: &str) -> Option<&[Regex]> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.regexes.as_slice())
    }
}
