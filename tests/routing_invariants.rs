//! Routing Invariant Tests
//!
//! - A prior revision always disables the resurrection branch
//! - Missing or malformed `updatedAt` never triggers resurrection
//! - Stale orphans get exactly the cleanup routing, ignoring document fields
//! - The window comparison is strict, on millisecond age
//! - Evaluation is deterministic and safe to run concurrently

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use syncroute::routing::{
    evaluate, Decision, DocumentRevision, Expiry, ResurrectionPolicy, RevisionMetadata,
    RoutingDecisionEngine, RoutingPath,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 6, 23, 12, 0, 0).unwrap()
}

fn doc(value: Value) -> DocumentRevision {
    DocumentRevision::from_value(value).unwrap()
}

fn meta() -> RevisionMetadata {
    RevisionMetadata::from_value(json!({"rev": "1-abc", "generation": 1})).unwrap()
}

fn channels(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn ago(age: Duration) -> String {
    (now() - age).to_rfc3339()
}

/// Documents with assorted ages, channel shapes, and expiry forms.
fn sample_docs() -> Vec<DocumentRevision> {
    let mut docs = Vec::new();
    for age in [
        Duration::zero(),
        Duration::minutes(30),
        Duration::hours(1),
        Duration::hours(2),
        Duration::days(400),
    ] {
        docs.push(doc(json!({"updatedAt": ago(age)})));
        docs.push(doc(json!({"updatedAt": ago(age), "channels": ["a", "b"], "expiry": 60})));
        docs.push(doc(json!({"updatedAt": ago(age), "channels": "a", "expiry": "2030-01-01T00:00:00Z"})));
    }
    docs
}

// =============================================================================
// Prior Revision Tests
// =============================================================================

/// With a prior revision, short-circuit never fires regardless of age.
#[test]
fn test_prior_revision_never_short_circuits() {
    let policy = ResurrectionPolicy::testing();
    let old = doc(json!({"channels": "a"}));

    for d in sample_docs() {
        let decision = evaluate(&d, Some(&old), &meta(), now(), &policy);
        assert!(!decision.short_circuited);
        assert_eq!(decision.channels, d.channels());
        assert_eq!(decision.expiry, d.expiry());
    }
}

// =============================================================================
// Fail-Safe Tests
// =============================================================================

/// No timestamp evidence: routing comes from the document only.
#[test]
fn test_missing_or_malformed_updated_at_falls_through() {
    let policy = ResurrectionPolicy::testing();
    let bad_stamps = [
        json!(null),
        json!(""),
        json!("not a date"),
        json!("2022-06-23"),
        json!("2022-06-23 05:00:00"),
        json!(1655960400),
        json!({"at": "2020-01-01T00:00:00Z"}),
    ];

    for stamp in bad_stamps {
        let d = doc(json!({"updatedAt": stamp, "channels": ["x"], "expiry": 30}));
        let decision = evaluate(&d, None, &meta(), now(), &policy);
        assert!(!decision.short_circuited, "stamp {:?}", d.get("updatedAt"));
        assert_eq!(decision.channels, channels(&["x"]));
        assert_eq!(decision.expiry, Some(Expiry::Relative(30)));
    }

    let no_stamp = doc(json!({"channels": "y"}));
    let decision = evaluate(&no_stamp, None, &meta(), now(), &policy);
    assert_eq!(decision, Decision::normal(channels(&["y"]), None));
}

// =============================================================================
// Resurrection Tests
// =============================================================================

/// Stale orphan gets exactly the cleanup routing; document fields ignored.
#[test]
fn test_stale_orphan_gets_exact_cleanup_routing() {
    let policy = ResurrectionPolicy::new(Duration::minutes(10), "purge", Duration::seconds(90))
        .unwrap();
    let d = doc(json!({
        "updatedAt": ago(Duration::minutes(11)),
        "channels": ["public", "private"],
        "expiry": "2099-01-01T00:00:00Z"
    }));

    let decision = evaluate(&d, None, &meta(), now(), &policy);
    assert_eq!(
        decision,
        Decision {
            channels: channels(&["purge"]),
            expiry: Some(Expiry::Relative(90)),
            short_circuited: true,
        }
    );
    assert_eq!(decision.path(), RoutingPath::SoftDeleteResurrection);
}

/// Exactly at the window: not a resurrection.
#[test]
fn test_window_boundary_is_exclusive() {
    let policy = ResurrectionPolicy::testing();
    let at_boundary = doc(json!({"updatedAt": ago(Duration::hours(1))}));
    let past_boundary = doc(json!({"updatedAt": ago(Duration::hours(1) + Duration::seconds(1))}));

    assert!(!evaluate(&at_boundary, None, &meta(), now(), &policy).short_circuited);
    assert!(evaluate(&past_boundary, None, &meta(), now(), &policy).short_circuited);
}

/// Age is whole milliseconds: 500µs past the window still counts as at it.
#[test]
fn test_window_boundary_truncates_to_milliseconds() {
    let policy = ResurrectionPolicy::testing();
    let d = doc(json!({"updatedAt": "2022-06-23T10:59:59.999500+00:00", "channels": "a"}));

    let decision = evaluate(&d, None, &meta(), now(), &policy);
    assert!(!decision.short_circuited);
    assert_eq!(decision.channels, channels(&["a"]));
}

/// Production and test profiles differ only in the cleanup TTL.
#[test]
fn test_profiles_share_window_differ_in_ttl() {
    let d = doc(json!({"updatedAt": ago(Duration::hours(2))}));

    let prod = evaluate(&d, None, &meta(), now(), &ResurrectionPolicy::production());
    let test = evaluate(&d, None, &meta(), now(), &ResurrectionPolicy::testing());

    assert_eq!(prod.channels, test.channels);
    assert_eq!(prod.expiry, Some(Expiry::Relative(15_552_000)));
    assert_eq!(test.expiry, Some(Expiry::Relative(300)));
}

// =============================================================================
// Scenario Tests
// =============================================================================

/// Scenario A: channels and absolute expiry, no prior, no updatedAt.
#[test]
fn test_scenario_a_normal_routing() {
    let d = doc(json!({"channels": ["public"], "expiry": "2022-06-23T05:00:00+01:00"}));
    let decision = evaluate(&d, None, &meta(), now(), &ResurrectionPolicy::production());

    assert_eq!(
        decision,
        Decision::normal(
            channels(&["public"]),
            Some(Expiry::Absolute("2022-06-23T05:00:00+01:00".into()))
        )
    );
}

/// Scenario B: two hours stale, no prior.
#[test]
fn test_scenario_b_resurrection() {
    let policy = ResurrectionPolicy::testing();
    let d = doc(json!({"updatedAt": ago(Duration::hours(2))}));
    let decision = evaluate(&d, None, &meta(), now(), &policy);

    assert_eq!(decision, Decision::soft_delete(&policy));
    assert_eq!(decision.channels, channels(&["soft_deleted"]));
}

/// Scenario C: thirty minutes old, no prior, nothing else.
#[test]
fn test_scenario_c_recent_orphan() {
    let d = doc(json!({"updatedAt": ago(Duration::minutes(30))}));
    let decision = evaluate(&d, None, &meta(), now(), &ResurrectionPolicy::testing());
    assert_eq!(decision, Decision::empty());
}

/// Scenario D: empty document with a prior revision.
#[test]
fn test_scenario_d_empty_update() {
    let old = doc(json!({"channels": "public", "updatedAt": ago(Duration::days(30))}));
    let decision = evaluate(&doc(json!({})), Some(&old), &meta(), now(), &ResurrectionPolicy::testing());
    assert_eq!(decision, Decision::empty());
}

// =============================================================================
// Determinism & Concurrency Tests
// =============================================================================

/// Identical arguments, identical decisions.
#[test]
fn test_evaluation_is_deterministic() {
    let engine = RoutingDecisionEngine::new(ResurrectionPolicy::testing());
    for d in sample_docs() {
        let first = engine.evaluate(&d, None, &meta(), now());
        for _ in 0..50 {
            assert_eq!(engine.evaluate(&d, None, &meta(), now()), first);
        }
    }
}

/// A shared engine gives the same answers from many threads at once.
#[test]
fn test_concurrent_evaluation_matches_sequential() {
    let engine = Arc::new(RoutingDecisionEngine::new(ResurrectionPolicy::testing()));
    let docs = Arc::new(sample_docs());
    let expected: Vec<Decision> = docs
        .iter()
        .map(|d| engine.evaluate(d, None, &meta(), now()))
        .collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let docs = Arc::clone(&docs);
            thread::spawn(move || {
                docs.iter()
                    .map(|d| engine.evaluate(d, None, &meta(), now()))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
