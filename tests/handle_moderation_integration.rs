//! Handle Moderation Integration Tests
//!
//! End-to-end tests covering policy loading, the moderation engine and the
//! persisted escalation workflow.

use app_state::{
    load_policy, HandleChangeMutation, HandleStateError, InMemoryViolationStore, ViolationStore,
};
use chrono::{Duration, Utc};
use moderation::{generate_safe_handle, HandleModerator, ModerationPolicy};
use std::sync::Arc;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test the documented detection behaviour of the default policy
#[test]
fn test_default_policy_detection() {
    let moderator = HandleModerator::default();

    for handle in [
        "@fuck", "@FUCK", "@sh1t", "@$h!t", "@d1ck", "@fuuuuck", "@sshiiit", "@hancock",
        "@scunthorpe",
    ] {
        assert!(!moderator.check_handle(handle).is_clean, "{handle} should be blocked");
    }

    for handle in ["@classes", "@thebassplayer", "@alice", "@dev_ops.team"] {
        assert!(moderator.check_handle(handle).is_clean, "{handle} should be clean");
    }
}

/// Test the documented fallback handles
#[test]
fn test_safe_handles() {
    let cases = [
        ("John Smith", "@jsmit123"),
        ("Jane Doe", "@jdoe123"),
        ("A B", "@ab123"),
        ("Madonna", "@madon123"),
        ("O'Brien Jones", "@ojone123"),
        ("Mary Jane Watson", "@mwats123"),
    ];

    for (name, expected) in cases {
        assert_eq!(generate_safe_handle(name), expected);
    }
}

/// Test a full escalation with a policy loaded from disk
#[tokio::test]
async fn test_escalation_with_loaded_policy() {
    init_tracing();

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("policy.json");
    tokio::fs::write(
        &path,
        r#"{
            "blocklist": { "exact": ["darn"], "substring": ["heck"] },
            "enforcement": { "maxWarnings": 1, "lockHours": 48 }
        }"#,
    )
    .await
    .unwrap();

    let policy = load_policy(&path).await.unwrap();
    let moderator = Arc::new(HandleModerator::new(policy));
    let store = Arc::new(InMemoryViolationStore::new());
    let mutation = HandleChangeMutation::new(moderator, store.clone());

    // Default terms are not part of this policy
    let allowed = mutation.execute("did:plc:sam", "@fuck", "Sam Lee").await.unwrap();
    assert!(allowed.decision.allowed);

    let warned = mutation.execute("did:plc:sam", "@h3ck", "Sam Lee").await.unwrap();
    assert!(warned.decision.warning);
    assert!(warned.decision.message.contains("final warning"));

    let before = Utc::now();
    let forced = mutation.execute("did:plc:sam", "@d4rn", "Sam Lee").await.unwrap();
    assert!(forced.decision.forced);
    assert_eq!(forced.decision.warning_number, 2);
    assert_eq!(forced.applied_handle.as_deref(), Some("@slee123"));

    let until = forced.decision.locked_until.unwrap();
    assert!(until > before + Duration::hours(47));
    assert!(until < before + Duration::hours(49));

    let locked = mutation.execute("did:plc:sam", "@samlee", "Sam Lee").await;
    assert!(matches!(locked, Err(HandleStateError::Locked { .. })));
    assert_eq!(store.warning_count("did:plc:sam").await.unwrap(), 2);
}

/// Test that concurrent violations for one account still escalate
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_violations_escalate() {
    init_tracing();

    let moderator = Arc::new(HandleModerator::new(ModerationPolicy::default()));
    let store = Arc::new(InMemoryViolationStore::new());
    let mutation = Arc::new(HandleChangeMutation::new(moderator, store.clone()));

    let tasks: Vec<_> = (0..3)
        .map(|_| {
            let mutation = Arc::clone(&mutation);
            tokio::spawn(async move {
                mutation
                    .execute("did:plc:race", "@sh1t", "Race Condition")
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut warning_numbers = Vec::new();
    for task in tasks {
        warning_numbers.push(task.await.unwrap().decision.warning_number);
    }
    warning_numbers.sort_unstable();

    assert_eq!(warning_numbers, vec![1, 2, 3]);
    assert!(store
        .active_lock("did:plc:race", Utc::now())
        .await
        .unwrap()
        .is_some());
}
