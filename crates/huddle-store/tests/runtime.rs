mod common;

use huddle_shared::raw::RawBatch;
use huddle_shared::types::{Intent, Table};
use huddle_store::{spawn_operator, StoreConfig, StoreError, StoreEvent, WriteMode};
use serde_json::json;

use common::*;

fn channel_batch(display_name: &str) -> RawBatch {
    RawBatch {
        table: "Channel".to_string(),
        intent: Intent::Updated,
        payload: json!([{"id": "c1", "type": "O", "team_id": "team1", "display_name": display_name}]),
    }
}

#[tokio::test]
async fn commands_run_in_submission_order() {
    let handle = spawn_operator(operator(), &StoreConfig::default()).unwrap();

    let (first, second) = tokio::join!(
        handle.handle_raw(channel_batch("one")),
        handle.handle_raw(channel_batch("two")),
    );
    first.unwrap();
    second.unwrap();

    let name = handle
        .run(|op| Ok(op.database().get_channel("c1")?.display_name))
        .await
        .unwrap();
    assert_eq!(name, "two");

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn commits_are_announced() {
    let handle = spawn_operator(operator(), &StoreConfig::default()).unwrap();
    let mut events = handle.subscribe();

    handle.handle_raw(channel_batch("one")).await.unwrap();

    let event = events.recv().await.unwrap();
    assert_eq!(
        event,
        StoreEvent::Committed {
            server_url: SERVER_URL.to_string(),
            tables: vec![Table::Channel],
        }
    );

    let prepared = handle
        .run(|op| {
            op.handle_threads(vec![deleted_thread("t1"), thread("t2", Some(&["u1"]))], None, WriteMode::PrepareOnly)
        })
        .await
        .unwrap();
    handle.commit(prepared).await.unwrap();

    let StoreEvent::Committed { tables, .. } = events.recv().await.unwrap();
    assert_eq!(tables, vec![Table::Thread, Table::ThreadParticipant]);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn failures_come_back_to_the_caller() {
    let handle = spawn_operator(operator(), &StoreConfig::default()).unwrap();

    let err = handle
        .handle_raw(RawBatch {
            table: "Channel".to_string(),
            intent: Intent::Updated,
            payload: json!([]),
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());

    // the writer keeps going after a failed command
    handle.handle_raw(channel_batch("ok")).await.unwrap();
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn handle_is_closed_after_shutdown() {
    let handle = spawn_operator(operator(), &StoreConfig::default()).unwrap();
    let other = handle.clone();

    handle.shutdown().await.unwrap();

    let err = other.handle_raw(channel_batch("late")).await.unwrap_err();
    assert!(matches!(err, StoreError::RuntimeClosed));
}
