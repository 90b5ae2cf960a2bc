//! # Event Grep
//!
//! A regex-based filter stage for structured log event pipelines. Each filter gates on
//! an event type, matches configured fields against regular expressions, drops events
//! that do not match (or, in negate mode, events that do), and enriches passing events
//! with templated fields and tags.
//!
//! ## Quick Start
//!
//! ```rust
//! use event_grep::{Event, GrepFilter, LogEvent};
//!
//! let filter = GrepFilter::from_yaml_str(
//!     r#"
//! type: syslog
//! match:
//!   message: "ERROR.*"
//! add_fields:
//!   level: error
//! add_tags:
//!   - grepped
//! "#,
//! )?;
//!
//! let mut event = LogEvent::new("syslog", "file:///var/log/messages")
//!     .with_field("message", "ERROR disk full");
//!
//! let result = filter.filter(&mut event);
//! assert!(result.is_pass());
//! assert_eq!(event.tags(), &["grepped".to_string()]);
//! # Ok::<(), event_grep::FilterError>(())
//! ```
//!
//! ## Dropping
//!
//! A dropped event is cancelled through [`Event::cancel`]; the host pipeline is
//! expected to stop forwarding cancelled events. The returned [`MatchResult`] carries
//! the [`DropReason`], and [`GrepFilter::stats`] aggregates them.
//!
//! ## Batch Processing
//!
//! ```rust
//! use event_grep::{GrepConfig, GrepFilter, LogEvent};
//!
//! let filter = GrepFilter::new(GrepConfig::new("syslog").with_pattern("message", "ERROR"))?;
//! let mut events = vec![
//!     LogEvent::new("syslog", "a").with_field("message", "ERROR one"),
//!     LogEvent::new("syslog", "b").with_field("message", "INFO two"),
//! ];
//!
//! let results = filter.filter_batch(&mut events);
//! assert!(results[0].is_pass());
//! assert!(results[1].is_drop());
//! # Ok::<(), event_grep::FilterError>(())
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod matcher;
pub mod metrics;

// Primary filter interface
pub use filter::GrepFilter;

// Configuration
pub use config::{FieldPatterns, FieldTemplate, GrepConfig};

// Core types and errors
pub use error::{FilterError, Result};
pub use event::{Event, FieldValue, LogEvent};

// Matcher system
pub use matcher::{
    DropReason, MatchEvaluator, MatchResult, MutationApplier, MutationSummary, PatternRegistry,
};

pub use metrics::{FilterStatistics, FilterStats};
