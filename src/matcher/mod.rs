//! Pattern matching for the grep filter.
//!
//! ## Architecture
//!
//! Compilation is separated from evaluation:
//! - **Compilation Phase**: [`PatternRegistry`] compiles every configured pattern once
//! - **Evaluation Phase**: [`MatchEvaluator`] decides pass or drop for each event
//! - **Mutation Phase**: [`MutationApplier`] appends fields and tags to passing events
//!
//! The registry is read-only after compilation, so evaluation needs no locking.
//!
//! ## Example Usage
//!
//! ```rust
//! use event_grep::config::FieldPatterns;
//! use event_grep::matcher::{MatchEvaluator, PatternRegistry};
//! use event_grep::LogEvent;
//!
//! let registry = PatternRegistry::compile(&[FieldPatterns {
//!     field: "message".to_string(),
//!     patterns: vec!["ERROR".to_string()],
//! }])?;
//! let evaluator = MatchEvaluator::new("syslog", false, registry);
//!
//! let mut event = LogEvent::new("syslog", "stdin").with_field("message", "ERROR disk full");
//! assert!(evaluator.evaluate(&mut event).is_pass());
//! # Ok::<(), event_grep::FilterError>(())
//! ```

pub mod evaluator;
pub mod mutation;
pub mod registry;
pub mod types;

pub use evaluator::MatchEvaluator;
pub use mutation::{MutationApplier, MutationSummary};
pub use registry::{FieldRegexes, PatternRegistry};
pub use types::{DropReason, MatchResult};
