//! Diagnostic counters for a filter instance.
//!
//! Dropping is a silent, normal outcome for the events involved, so these counters are
//! how operators tell a mis-typed pipeline or an invalid field shape apart from plain
//! non-matches.

use crate::matcher::{DropReason, MatchResult, MutationSummary};
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by every `filter` call.
#[derive(Debug, Default)]
pub struct FilterStatistics {
    evaluated: AtomicU64,
    passed: AtomicU64,
    dropped_type_mismatch: AtomicU64,
    dropped_field_mismatch: AtomicU64,
    dropped_no_criteria: AtomicU64,
    invalid_field_shape: AtomicU64,
    fields_appended: AtomicU64,
    fields_skipped: AtomicU64,
    tags_appended: AtomicU64,
}

/// Point-in-time copy of [`FilterStatistics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub evaluated: u64,
    pub passed: u64,
    pub dropped_type_mismatch: u64,
    pub dropped_field_mismatch: u64,
    pub dropped_no_criteria: u64,
    pub invalid_field_shape: u64,
    pub fields_appended: u64,
    /// Appends refused because the target field holds an object.
    pub fields_skipped: u64,
    pub tags_appended: u64,
}

impl FilterStats {
    pub fn dropped(&self) -> u64 {
        self.dropped_type_mismatch
            + self.dropped_field_mismatch
            + self.dropped_no_criteria
            + self.invalid_field_shape
    }

    /// Fraction of evaluated events that passed, `0.0` before any evaluation.
    pub fn pass_rate(&self) -> f64 {
        if self.evaluated == 0 {
            0.0
        } else {
            self.passed as f64 / self.evaluated as f64
        }
    }
}

impl FilterStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_result(&self, result: &MatchResult) {
        self.evaluated.fetch_add(1, Ordering::Relaxed);
        let counter = match result {
            MatchResult::Pass => &self.passed,
            MatchResult::Drop(DropReason::TypeMismatch) => &self.dropped_type_mismatch,
            MatchResult::Drop(DropReason::FieldMismatch { .. }) => &self.dropped_field_mismatch,
            MatchResult::Drop(DropReason::NoCriteriaMatched) => &self.dropped_no_criteria,
            MatchResult::Drop(DropReason::InvalidFieldShape { .. }) => &self.invalid_field_shape,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mutations(&self, summary: &MutationSummary) {
        self.fields_appended
            .fetch_add(summary.fields_appended as u64, Ordering::Relaxed);
        self.fields_skipped
            .fetch_add(summary.fields_skipped as u64, Ordering::Relaxed);
        self.tags_appended
            .fetch_add(summary.tags_appended as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FilterStats {
        FilterStats {
            evaluated: self.evaluated.load(Ordering::Relaxed),
            passed: self.passed.load(Ordering::Relaxed),
            dropped_type_mismatch: self.dropped_type_mismatch.load(Ordering::Relaxed),
            dropped_field_mismatch: self.dropped_field_mismatch.load(Ordering::Relaxed),
            dropped_no_criteria: self.dropped_no_criteria.load(Ordering::Relaxed),
            invalid_field_shape: self.invalid_field_shape.load(Ordering::Relaxed),
            fields_appended: self.fields_appended.load(Ordering::Relaxed),
            fields_skipped: self.fields_skipped.load(Ordering::Relaxed),
            tags_appended: self.tags_appended.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.evaluated,
            &self.passed,
            &self.dropped_type_mismatch,
            &self.dropped_field_mismatch,
            &self.dropped_no_criteria,
            &self.invalid_field_shape,
            &self.fields_appended,
            &self.fields_skipped,
            &self.tags_appended,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
