//! The grep filter stage.
//!
//! [`GrepFilter`] composes the three matcher components: the pattern registry is
//! compiled once at construction, then every event goes through the evaluator and,
//! when it passes, the mutation applier.

use crate::config::GrepConfig;
use crate::error::Result;
use crate::event::Event;
use crate::matcher::{MatchEvaluator, MatchResult, MutationApplier, PatternRegistry};
use crate::metrics::{FilterStatistics, FilterStats};
use rayon::prelude::*;
use tracing::info;

/// A configured grep filter.
///
/// The filter holds no per-event state, so a single instance can be shared by
/// reference across threads; each call only touches the event it is given.
///
/// # Examples
///
/// ```rust
/// use event_grep::{Event, GrepConfig, GrepFilter, LogEvent};
///
/// let filter = GrepFilter::new(
///     GrepConfig::new("syslog")
///         .with_pattern("message", "ERROR.*")
///         .with_added_tag("grepped"),
/// )?;
///
/// let mut error = LogEvent::new("syslog", "stdin").with_field("message", "ERROR disk full");
/// assert!(filter.filter(&mut error).is_pass());
/// assert_eq!(error.tags(), &["grepped".to_string()]);
///
/// let mut info = LogEvent::new("syslog", "stdin").with_field("message", "INFO ok");
/// assert!(filter.filter(&mut info).is_drop());
/// assert!(info.is_cancelled());
/// # Ok::<(), event_grep::FilterError>(())
/// ```
#[derive(Debug)]
pub struct GrepFilter {
    config: GrepConfig,
    evaluator: MatchEvaluator,
    mutations: MutationApplier,
    stats: FilterStatistics,
}

impl GrepFilter {
    /// Validate and compile `config`.
    ///
    /// Any invalid pattern fails construction; no partially compiled filter is returned.
    pub fn new(config: GrepConfig) -> Result<Self> {
        config.validate()?;
        let registry = PatternRegistry::compile(&config.field_patterns)?;

        info!(
            event_type = %config.event_type,
            negate = config.negate,
            fields = registry.len(),
            patterns = registry.pattern_count(),
            add_fields = config.add_fields.len(),
            add_tags = config.add_tags.len(),
            "registered grep filter"
        );

        let evaluator = MatchEvaluator::new(config.event_type.clone(), config.negate, registry);
        let mutations = MutationApplier::new(config.add_fields.clone(), config.add_tags.clone());

        Ok(Self {
            config,
            evaluator,
            mutations,
            stats: FilterStatistics::new(),
        })
    }

    /// Parse a YAML configuration document and build a filter from it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::new(GrepConfig::from_yaml_str(yaml)?)
    }

    /// Run one event through the filter.
    ///
    /// On a drop the event is cancelled and left otherwise untouched. On a pass the
    /// configured fields and tags are appended.
    pub fn filter<E: Event + ?Sized>(&self, event: &mut E) -> MatchResult {
        let result = self.evaluator.evaluate(event);
        if result.is_pass() && !self.mutations.is_empty() {
            let summary = self.mutations.apply(event);
            self.stats.record_mutations(&summary);
        }
        self.stats.record_result(&result);
        result
    }

    /// Run a batch of events through the filter in parallel.
    ///
    /// Results are returned in the same order as `events`.
    pub fn filter_batch<E: Event + Send>(&self, events: &mut [E]) -> Vec<MatchResult> {
        events
            .par_iter_mut()
            .map(|event| self.filter(event))
            .collect()
    }

    pub fn config(&self) -> &GrepConfig {
        &self.config
    }

    pub fn registry(&self) -> &PatternRegistry {
        self.evaluator.registry()
    }

    pub fn stats(&self) -> FilterStats {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}
