//! End-to-end behaviour of the grep filter on realistic syslog events.

use event_grep::{DropReason, Event, FieldValue, GrepConfig, GrepFilter, LogEvent, MatchResult};
use serde_json::json;

fn syslog_filter(negate: bool) -> GrepFilter {
    GrepFilter::new(
        GrepConfig::new("syslog")
            .with_negate(negate)
            .with_pattern("message", "ERROR.*"),
    )
    .unwrap()
}

fn syslog_event(message: &str) -> LogEvent {
    LogEvent::new("syslog", "file:///var/log/messages").with_field("message", message)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("event_grep=debug")
        .with_test_writer()
        .try_init();
}

#[test]
fn test_positive_match_passes_and_non_match_drops() {
    init_tracing();
    let filter = syslog_filter(false);

    let mut error = syslog_event("ERROR disk full");
    assert_eq!(filter.filter(&mut error), MatchResult::Pass);
    assert!(!error.is_cancelled());

    let mut info = syslog_event("INFO ok");
    assert!(filter.filter(&mut info).is_drop());
    assert!(info.is_cancelled());
}

#[test]
fn test_negate_inverts_per_pattern_test() {
    init_tracing();
    let filter = syslog_filter(true);

    let mut info = syslog_event("INFO ok");
    assert_eq!(filter.filter(&mut info), MatchResult::Pass);

    let mut error = syslog_event("ERROR disk full");
    assert!(filter.filter(&mut error).is_drop());
    assert!(error.is_cancelled());
}

#[test]
fn test_multi_valued_field_any_value_suffices() {
    let filter =
        GrepFilter::new(GrepConfig::new("syslog").with_pattern("message", "foo")).unwrap();
    let mut event = LogEvent::new("syslog", "test").with_field(
        "message",
        vec!["bar".to_string(), "foo".to_string(), "baz".to_string()],
    );

    assert!(filter.filter(&mut event).is_pass());
}

#[test]
fn test_pass_appends_fields_and_tags() {
    let filter = GrepFilter::new(
        GrepConfig::new("syslog")
            .with_pattern("message", "ERROR.*")
            .with_added_field("level", "parsed")
            .with_added_tag("grepped"),
    )
    .unwrap();

    let mut event = syslog_event("ERROR disk full").with_tag("from-file");
    assert!(filter.filter(&mut event).is_pass());

    assert_eq!(
        event.field("level").unwrap(),
        Some(FieldValue::Sequence(vec!["parsed".to_string()]))
    );
    assert_eq!(event.tags().last().map(String::as_str), Some("grepped"));
    assert_eq!(event.tags().len(), 2);
}

#[test]
fn test_type_mismatch_never_examines_fields() {
    let filter = GrepFilter::new(
        GrepConfig::new("syslog")
            .with_pattern("message", ".*")
            .with_added_field("level", "parsed")
            .with_added_tag("grepped"),
    )
    .unwrap();

    // A message that would match anything still cannot pass under another type.
    let mut event = LogEvent::new("apache", "test").with_field("message", "anything");
    let fields_before = event.fields.clone();

    assert_eq!(
        filter.filter(&mut event),
        MatchResult::Drop(DropReason::TypeMismatch)
    );
    assert!(event.is_cancelled());
    assert_eq!(event.fields, fields_before);
    assert!(event.tags().is_empty());
}

#[test]
fn test_type_mismatch_with_invalid_field_is_still_type_drop() {
    let filter =
        GrepFilter::new(GrepConfig::new("syslog").with_pattern("payload", "x")).unwrap();
    let mut event = LogEvent::new("apache", "test").with_raw_field("payload", json!({"a": 1}));

    assert_eq!(
        filter.filter(&mut event),
        MatchResult::Drop(DropReason::TypeMismatch)
    );
    assert_eq!(filter.stats().invalid_field_shape, 0);
}

#[test]
fn test_empty_criteria_always_drop() {
    let filter = GrepFilter::new(GrepConfig::new("syslog").with_added_tag("never")).unwrap();

    for message in ["ERROR", "INFO", ""] {
        let mut event = syslog_event(message);
        assert_eq!(
            filter.filter(&mut event),
            MatchResult::Drop(DropReason::NoCriteriaMatched)
        );
        assert!(event.tags().is_empty());
    }

    let mut bare = LogEvent::new("syslog", "test");
    assert!(filter.filter(&mut bare).is_drop());
}

#[test]
fn test_two_passes_strictly_append() {
    let filter = GrepFilter::new(
        GrepConfig::new("syslog")
            .with_pattern("message", "ERROR")
            .with_added_field("level", "parsed")
            .with_added_field("seen", "%{message}")
            .with_added_tag("grepped"),
    )
    .unwrap();

    let mut event = syslog_event("ERROR disk full").with_field("level", "raw");
    assert!(filter.filter(&mut event).is_pass());
    assert!(filter.filter(&mut event).is_pass());

    assert_eq!(event.fields["level"], json!(["raw", "parsed", "parsed"]));
    assert_eq!(
        event.fields["seen"],
        json!(["ERROR disk full", "ERROR disk full"])
    );
    assert_eq!(
        event.tags(),
        &["grepped".to_string(), "grepped".to_string()]
    );
}

#[test]
fn test_negate_with_missing_field_guard() {
    // Drop only events where an error field is present and matches.
    let filter = GrepFilter::new(
        GrepConfig::new("syslog")
            .with_negate(true)
            .with_pattern("error", ".+")
            .with_added_tag("clean"),
    )
    .unwrap();

    let mut clean = syslog_event("all good");
    assert!(filter.filter(&mut clean).is_pass());
    assert_eq!(clean.tags(), &["clean".to_string()]);

    let mut failed = syslog_event("oops").with_field("error", "timeout");
    assert!(filter.filter(&mut failed).is_drop());
}

#[test]
fn test_negate_over_all_property() {
    let cases: &[(&[&str], bool)] = &[
        (&["ERROR a"], false),
        (&["INFO a"], true),
        (&["ERROR a", "ERROR b"], false),
        (&["ERROR a", "INFO b"], true),
    ];
    let filter = syslog_filter(true);

    for (values, expected_pass) in cases {
        let mut event = LogEvent::new("syslog", "test").with_field(
            "message",
            values.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
        );
        assert_eq!(
            filter.filter(&mut event).is_pass(),
            *expected_pass,
            "values {values:?}"
        );
    }
}

#[test]
fn test_negate_multiple_patterns_each_need_a_non_matching_value() {
    let filter = GrepFilter::new(
        GrepConfig::new("syslog")
            .with_negate(true)
            .with_patterns("m", ["^a", "z$"]),
    )
    .unwrap();
    let cases: &[(&[&str], bool)] = &[
        // "bz" escapes "^a" but every value ends in "z"
        (&["az", "bz"], false),
        (&["az", "b"], true),
        (&["b"], true),
        (&["az"], false),
    ];

    for (values, expected_pass) in cases {
        let mut event = LogEvent::new("syslog", "test").with_field(
            "m",
            values.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
        );
        let result = filter.filter(&mut event);
        assert_eq!(result.is_pass(), *expected_pass, "values {values:?}");
        if !expected_pass {
            assert_eq!(
                result,
                MatchResult::Drop(DropReason::FieldMismatch {
                    field: "m".to_string()
                })
            );
        }
    }
}

#[test]
fn test_match_on_message_envelope() {
    init_tracing();
    let positive =
        GrepFilter::new(GrepConfig::new("syslog").with_pattern("@message", "ERROR")).unwrap();
    let negated = GrepFilter::new(
        GrepConfig::new("syslog")
            .with_negate(true)
            .with_pattern("@message", "ERROR"),
    )
    .unwrap();
    let message_event =
        |message: &str| LogEvent::new("syslog", "file:///var/log/messages").with_message(message);

    let mut error = message_event("ERROR disk full");
    assert_eq!(positive.filter(&mut error), MatchResult::Pass);

    let mut info = message_event("INFO ok");
    assert_eq!(
        positive.filter(&mut info),
        MatchResult::Drop(DropReason::FieldMismatch {
            field: "@message".to_string()
        })
    );

    let mut error = message_event("ERROR disk full");
    assert!(negated.filter(&mut error).is_drop());
    assert!(error.is_cancelled());

    let mut info = message_event("INFO ok");
    assert_eq!(negated.filter(&mut info), MatchResult::Pass);
}

#[test]
fn test_invalid_field_shape_is_contained_to_one_event() {
    let filter =
        GrepFilter::new(GrepConfig::new("syslog").with_pattern("message", "ERROR")).unwrap();

    let mut events = vec![
        syslog_event("ERROR first"),
        LogEvent::new("syslog", "test").with_raw_field("message", json!({"nested": true})),
        syslog_event("ERROR third"),
    ];
    let results = filter.filter_batch(&mut events);

    assert!(results[0].is_pass());
    assert_eq!(
        results[1],
        MatchResult::Drop(DropReason::InvalidFieldShape {
            field: "message".to_string()
        })
    );
    assert!(results[2].is_pass());

    let stats = filter.stats();
    assert_eq!(stats.invalid_field_shape, 1);
    assert_eq!(stats.passed, 2);
}

#[test]
fn test_json_envelope_round_trip_through_filter() {
    let filter = GrepFilter::new(
        GrepConfig::new("apache")
            .with_pattern("status", "^5")
            .with_added_field("alert", "%{request} returned %{status}"),
    )
    .unwrap();

    let mut event = LogEvent::from_json(
        r#"{
            "@type": "apache",
            "@source": "file:///var/log/httpd/access_log",
            "@message": "GET /api 503",
            "@fields": {"request": "/api", "status": 503},
            "@tags": []
        }"#,
    )
    .unwrap();

    assert!(filter.filter(&mut event).is_pass());

    let serialized: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
    assert_eq!(
        serialized["@fields"]["alert"],
        json!(["/api returned 503"])
    );
}
