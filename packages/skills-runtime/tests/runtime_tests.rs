//! Runtime integration tests
//!
//! Queue requests the way the HTTP layer does and check the replies.

use std::sync::Arc;
use std::thread;

use ntest::timeout;
use tokio::sync::oneshot;

use skills_core::{
    CreateOutcome, MemorySkillStore, SharedSkillStore, Skill, SkillError, SkillPatch, SkillStore,
    SkillUpdateRequest,
};
use skills_runtime::{ApiRequest, RuntimeConfig, SkillRuntime};

fn seeded_store() -> SharedSkillStore {
    let store = MemorySkillStore::new();
    store
        .create(Skill {
            key: "go".to_string(),
            name: "test".to_string(),
            description: "testDescription".to_string(),
            logo: "testLogo".to_string(),
            tags: vec!["programming language".to_string(), "system".to_string()],
        })
        .unwrap();
    Arc::new(store)
}

/// Requests are applied in arrival order by process_pending
#[test]
fn test_process_pending_applies_in_order() {
    let (api_tx, mut runtime) =
        SkillRuntime::with_channel(seeded_store(), &RuntimeConfig::default());

    let (patch_tx, mut patch_rx) = oneshot::channel();
    api_tx
        .try_send(ApiRequest::Patch {
            key: "go".to_string(),
            patch: SkillPatch::Name("golang patch".to_string()),
            response: patch_tx,
        })
        .unwrap();

    let (get_tx, mut get_rx) = oneshot::channel();
    api_tx
        .try_send(ApiRequest::Get {
            key: "go".to_string(),
            response: get_tx,
        })
        .unwrap();

    assert_eq!(runtime.process_pending(), 2);
    assert_eq!(runtime.processed(), 2);

    let patched = patch_rx.try_recv().unwrap().unwrap();
    assert_eq!(patched.name, "golang patch");

    let fetched = get_rx.try_recv().unwrap().unwrap();
    assert_eq!(fetched, patched);
    assert_eq!(fetched.description, "testDescription");
}

/// Duplicate create replies with the stored record
#[test]
fn test_duplicate_create_reply() {
    let (api_tx, mut runtime) =
        SkillRuntime::with_channel(seeded_store(), &RuntimeConfig::default());

    let (tx, mut rx) = oneshot::channel();
    api_tx
        .try_send(ApiRequest::Create {
            skill: Skill {
                key: "go".to_string(),
                name: "Python".to_string(),
                description: String::new(),
                logo: String::new(),
                tags: Vec::new(),
            },
            response: tx,
        })
        .unwrap();
    runtime.process_pending();

    match rx.try_recv().unwrap().unwrap() {
        CreateOutcome::Existing(skill) => assert_eq!(skill.name, "test"),
        other => panic!("expected existing record, got {:?}", other),
    }
}

/// Missing keys come back as NotFound
#[test]
fn test_missing_key_replies_not_found() {
    let (api_tx, mut runtime) =
        SkillRuntime::with_channel(seeded_store(), &RuntimeConfig::default());

    let (replace_tx, mut replace_rx) = oneshot::channel();
    api_tx
        .try_send(ApiRequest::Replace {
            key: "kotlin".to_string(),
            update: SkillUpdateRequest::default(),
            response: replace_tx,
        })
        .unwrap();
    let (delete_tx, mut delete_rx) = oneshot::channel();
    api_tx
        .try_send(ApiRequest::Delete {
            key: "kotlin".to_string(),
            response: delete_tx,
        })
        .unwrap();
    runtime.process_pending();

    assert_eq!(
        replace_rx.try_recv().unwrap(),
        Err(SkillError::not_found("kotlin"))
    );
    assert_eq!(
        delete_rx.try_recv().unwrap(),
        Err(SkillError::not_found("kotlin"))
    );
}

/// A dropped requester does not stop the runtime
#[test]
fn test_dropped_receiver_is_tolerated() {
    let (api_tx, mut runtime) =
        SkillRuntime::with_channel(seeded_store(), &RuntimeConfig::default());

    let (tx, rx) = oneshot::channel();
    drop(rx);
    api_tx
        .try_send(ApiRequest::List { response: tx })
        .unwrap();

    let (tx, mut rx) = oneshot::channel();
    api_tx.try_send(ApiRequest::List { response: tx }).unwrap();

    assert_eq!(runtime.process_pending(), 2);
    assert_eq!(rx.try_recv().unwrap().unwrap().len(), 1);
}

/// run() blocks on the channel and returns once all senders are gone
#[timeout(5000)]
#[test]
fn test_run_exits_when_senders_drop() {
    let (api_tx, mut runtime) =
        SkillRuntime::with_channel(seeded_store(), &RuntimeConfig::default());
    let handle = thread::spawn(move || {
        runtime.run();
        runtime.processed()
    });

    let (tx, rx) = oneshot::channel();
    api_tx
        .blocking_send(ApiRequest::Delete {
            key: "go".to_string(),
            response: tx,
        })
        .unwrap();
    assert_eq!(rx.blocking_recv().unwrap(), Ok(()));

    drop(api_tx);
    assert_eq!(handle.join().unwrap(), 1);
}

#[test]
fn test_action_names() {
    let (tx, _rx) = oneshot::channel();
    let req = ApiRequest::Patch {
        key: "go".to_string(),
        patch: SkillPatch::Description("d".to_string()),
        response: tx,
    };
    assert_eq!(req.action(), "update_desc");

    let (tx, _rx) = oneshot::channel();
    let req = ApiRequest::List { response: tx };
    assert_eq!(req.action(), "list");
}
