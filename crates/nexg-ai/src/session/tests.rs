use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use super::*;
use crate::gemini::{GeminiClient, GeminiConfig};
use crate::prompts::grounding_instruction;
use crate::reveal::{RevealOutcome, Revealer};
use crate::test_support::{serve_once, ScriptedClient};
use crate::{AiClient, AiError, Message, MessageKind, Role};

fn engine_with(client: Arc<ScriptedClient>, interval: Duration) -> Arc<Engine> {
    let client: Arc<dyn AiClient> = client;
    Arc::new(Engine::new(client, Revealer::new(interval)))
}

fn instant(replies: Vec<Result<String, AiError>>) -> (Arc<Engine>, Arc<ScriptedClient>) {
    let client = Arc::new(ScriptedClient::new(replies));
    (engine_with(client.clone(), Duration::ZERO), client)
}

fn gated(replies: Vec<Result<String, AiError>>) -> (Arc<Engine>, Arc<ScriptedClient>) {
    let client = Arc::new(ScriptedClient::gated(replies));
    (engine_with(client.clone(), Duration::ZERO), client)
}

fn drain(rx: &mut UnboundedReceiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

async fn next_partial(rx: &mut UnboundedReceiver<EngineEvent>, wanted: &str) {
    while let Some(event) = rx.recv().await {
        if let EngineEvent::Partial { text, .. } = event {
            if text == wanted {
                return;
            }
        }
    }
    panic!("event stream closed before partial {wanted:?}");
}

fn user_count(messages: &[Message]) -> usize {
    messages.iter().filter(|m| m.role == Role::User).count()
}

// ---- submit ----

#[tokio::test]
async fn submit_stores_user_then_assistant() {
    let (engine, client) = instant(vec![Ok("Hi there".into())]);

    let outcome = engine.submit("Hello").await.unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Delivered {
            text: "Hi there".into(),
            reveal: RevealOutcome::Completed,
        }
    );
    assert_eq!(
        engine.current_view(),
        vec![Message::user("Hello"), Message::assistant("Hi there")]
    );
    assert_eq!(client.request_count(), 1);
    assert!(!engine.is_busy());
}

#[tokio::test]
async fn request_carries_full_history() {
    let (engine, client) = instant(vec![Ok("one".into()), Ok("two".into())]);
    engine.submit("first").await.unwrap();
    engine.submit("second").await.unwrap();

    let (history, system) = client.last_request();
    assert_eq!(
        history,
        vec![
            Message::user("first"),
            Message::assistant("one"),
            Message::user("second"),
        ]
    );
    assert!(system.is_none());
}

#[tokio::test]
async fn empty_input_is_rejected_without_state_change() {
    let (engine, client) = instant(vec![]);
    assert_eq!(engine.submit("   \n").await, Err(EngineError::EmptyInput));
    assert!(engine.current_view().is_empty());
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn user_text_is_trimmed() {
    let (engine, _client) = instant(vec![Ok("ok".into())]);
    engine.submit("  padded  ").await.unwrap();
    assert_eq!(engine.current_view()[0].content, "padded");
}

#[tokio::test]
async fn user_messages_match_accepted_submissions() {
    let (engine, _client) = instant(vec![
        Ok("a".into()),
        Err(AiError::Timeout),
        Ok("c".into()),
    ]);
    let mut accepted = 0;
    for text in ["one", "", "two", "  ", "three"] {
        match engine.submit(text).await {
            Err(EngineError::EmptyInput) => {}
            _ => accepted += 1,
        }
    }
    assert_eq!(accepted, 3);
    assert_eq!(user_count(&engine.current_view()), 3);
}

#[tokio::test]
async fn submit_while_busy_is_rejected() {
    let (engine, client) = gated(vec![Ok("done".into())]);
    let task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.submit("first").await })
    };
    client.received.notified().await;

    assert!(engine.is_busy());
    assert_eq!(engine.submit("second").await, Err(EngineError::Busy));
    assert_eq!(engine.reveal_only("hi").await, Err(EngineError::Busy));
    assert_eq!(
        engine.attach(MessageKind::Image, "a.png", "file:///a.png"),
        Err(EngineError::Busy)
    );
    assert_eq!(engine.current_view().len(), 1);

    client.release();
    task.await.unwrap().unwrap();
    assert_eq!(engine.current_view().len(), 2);
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn failed_request_stores_apology() {
    let (engine, _client) = instant(vec![Err(AiError::ApiError("HTTP 500: boom".into()))]);
    let mut rx = engine.subscribe();

    let err = engine.submit("X").await.unwrap_err();

    assert_eq!(
        err,
        EngineError::RequestFailed("API error: HTTP 500: boom".into())
    );
    assert_eq!(
        engine.current_view(),
        vec![Message::user("X"), Message::assistant(FALLBACK_REPLY)]
    );
    assert!(!engine.is_busy());
    assert!(drain(&mut rx)
        .iter()
        .any(|e| matches!(e, EngineEvent::RequestFailed { .. })));
}

#[tokio::test]
async fn http_500_from_gemini_stores_apology() {
    let (base, _server) = serve_once(
        "500 Internal Server Error",
        r#"{"error":{"code":500,"message":"backend exploded"}}"#,
    )
    .await;
    let config = GeminiConfig::new("test-key").with_api_base(format!("{base}/v1beta/models"));
    let client: Arc<dyn AiClient> = Arc::new(GeminiClient::new(config).unwrap());
    let engine = Engine::new(client, Revealer::new(Duration::ZERO));

    let err = engine.submit("X").await.unwrap_err();

    match err {
        EngineError::RequestFailed(detail) => {
            assert!(detail.contains("HTTP 500"), "{detail}");
            assert!(detail.contains("backend exploded"), "{detail}");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
    assert_eq!(
        engine.current_view(),
        vec![Message::user("X"), Message::assistant(FALLBACK_REPLY)]
    );
}

#[tokio::test]
async fn empty_reply_is_stored_as_is() {
    let (engine, _client) = instant(vec![Ok(String::new())]);
    engine.submit("hello?").await.unwrap();
    assert_eq!(engine.current_view()[1], Message::assistant(""));
}

// ---- reveal ----

#[tokio::test]
async fn reveal_publishes_every_prefix() {
    let (engine, _client) = instant(vec![Ok("abc".into())]);
    let mut rx = engine.subscribe();
    let origin = engine.active_id();

    engine.submit("go").await.unwrap();

    let events = drain(&mut rx);
    let partials: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            EngineEvent::Partial { session, text } => {
                assert_eq!(session.as_ref(), Some(&origin));
                Some(text.as_str())
            }
            _ => None,
        })
        .collect();
    assert_eq!(partials, vec!["", "a", "ab", "abc"]);
    assert!(events.contains(&EngineEvent::RevealFinished {
        session: Some(origin),
        outcome: RevealOutcome::Completed,
    }));
}

#[tokio::test]
async fn assistant_is_appended_after_reveal_finishes() {
    let (engine, _client) = instant(vec![Ok("ok".into())]);
    let mut rx = engine.subscribe();
    engine.submit("hi").await.unwrap();

    let events = drain(&mut rx);
    let finished = events
        .iter()
        .position(|e| matches!(e, EngineEvent::RevealFinished { .. }))
        .unwrap();
    let stored = events
        .iter()
        .rposition(|e| matches!(e, EngineEvent::MessageAppended { .. }))
        .unwrap();
    assert!(stored > finished);
}

#[tokio::test(start_paused = true)]
async fn stop_mid_reveal_stores_full_text() {
    let client = Arc::new(ScriptedClient::new(vec![Ok("abcdefgh".into())]));
    let engine = engine_with(client, Duration::from_millis(10));
    let mut rx = engine.subscribe();
    let task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.submit("hi").await })
    };

    next_partial(&mut rx, "abc").await;
    engine.stop();
    engine.stop();

    let outcome = task.await.unwrap().unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Delivered {
            text: "abcdefgh".into(),
            reveal: RevealOutcome::Cancelled,
        }
    );
    assert_eq!(engine.current_view()[1], Message::assistant("abcdefgh"));

    let rest: Vec<_> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::Partial { text, .. } => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(rest, vec!["abcdefgh".to_string()]);
}

#[tokio::test]
async fn stop_when_idle_is_a_no_op() {
    let (engine, _client) = instant(vec![]);
    engine.stop();
    engine.stop();
    assert!(!engine.is_busy());
}

#[tokio::test]
async fn reveal_only_is_not_stored() {
    let (engine, client) = instant(vec![]);
    let mut rx = engine.subscribe();

    let outcome = engine.reveal_only("Hey").await.unwrap();

    assert_eq!(outcome, RevealOutcome::Completed);
    assert!(engine.current_view().is_empty());
    assert_eq!(client.request_count(), 0);
    let partials = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, EngineEvent::Partial { session: None, .. }))
        .count();
    assert_eq!(partials, 4);
}

// ---- stale replies ----

#[tokio::test]
async fn switch_before_reply_discards_it() {
    let (engine, client) = gated(vec![Ok("late".into())]);
    let origin = engine.active_id();
    let task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.submit("question").await })
    };
    client.received.notified().await;

    let other = engine.create_session();
    client.release();

    assert_eq!(task.await.unwrap().unwrap(), SubmitOutcome::Discarded);
    assert!(engine.messages(&other).unwrap().is_empty());
    assert_eq!(
        engine.messages(&origin).unwrap(),
        vec![Message::user("question")]
    );
}

#[tokio::test]
async fn failure_after_switch_skips_apology() {
    let (engine, client) = gated(vec![Err(AiError::Timeout)]);
    let origin = engine.active_id();
    let task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.submit("question").await })
    };
    client.received.notified().await;

    let other = engine.create_session();
    client.release();

    assert!(matches!(
        task.await.unwrap(),
        Err(EngineError::RequestFailed(_))
    ));
    assert!(engine.messages(&other).unwrap().is_empty());
    assert_eq!(engine.messages(&origin).unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn switch_mid_reveal_leaves_new_session_clean() {
    let client = Arc::new(ScriptedClient::new(vec![Ok("a long reply".into())]));
    let engine = engine_with(client, Duration::from_millis(10));
    let origin = engine.active_id();
    let other = engine.create_session();
    engine.switch_session(&origin).unwrap();
    let mut rx = engine.subscribe();
    let task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.submit("question").await })
    };

    next_partial(&mut rx, "a l").await;
    engine.switch_session(&other).unwrap();

    assert_eq!(task.await.unwrap().unwrap(), SubmitOutcome::Discarded);
    assert!(engine.messages(&other).unwrap().is_empty());
    assert_eq!(engine.messages(&origin).unwrap().len(), 1);
    assert!(!engine.is_busy());
}

#[tokio::test(start_paused = true)]
async fn creating_a_session_mid_reveal_cancels_it() {
    let client = Arc::new(ScriptedClient::new(vec![Ok("a long reply".into())]));
    let engine = engine_with(client, Duration::from_millis(10));
    let origin = engine.active_id();
    let mut rx = engine.subscribe();
    let task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.submit("question").await })
    };

    next_partial(&mut rx, "a l").await;
    let fresh = engine.create_session();

    assert_eq!(task.await.unwrap().unwrap(), SubmitOutcome::Discarded);
    assert!(!engine.is_busy());
    assert!(engine.messages(&fresh).unwrap().is_empty());
    let events = drain(&mut rx);
    assert!(events.contains(&EngineEvent::RevealFinished {
        session: Some(origin.clone()),
        outcome: RevealOutcome::Cancelled,
    }));
    assert!(events.contains(&EngineEvent::ResponseDiscarded(origin)));
}

#[tokio::test]
async fn reply_after_deleting_origin_is_discarded() {
    let (engine, client) = gated(vec![Ok("late".into())]);
    let origin = engine.active_id();
    let task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.submit("question").await })
    };
    client.received.notified().await;

    engine.delete_session(&origin).unwrap();
    client.release();

    assert_eq!(task.await.unwrap().unwrap(), SubmitOutcome::Discarded);
    assert_eq!(engine.sessions().len(), 1);
    assert!(engine.current_view().is_empty());
}

// ---- session management ----

#[test]
fn engine_starts_with_one_empty_session() {
    let (engine, _client) = instant(vec![]);
    let sessions = engine.sessions();
    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].active);
    assert_eq!(sessions[0].title, "New Chat");
    assert_eq!(sessions[0].message_count, 0);
}

#[test]
fn create_activates_and_lists_newest_first() {
    let (engine, _client) = instant(vec![]);
    let first = engine.active_id();
    let second = engine.create_session();
    let third = engine.create_session();

    assert_eq!(engine.active_id(), third);
    let ids: Vec<_> = engine.sessions().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![third, second, first]);
}

#[tokio::test]
async fn switch_changes_current_view() {
    let (engine, _client) = instant(vec![Ok("reply".into())]);
    let first = engine.active_id();
    engine.submit("in first").await.unwrap();
    let second = engine.create_session();
    assert!(engine.current_view().is_empty());

    engine.switch_session(&first).unwrap();
    assert_eq!(engine.current_view().len(), 2);
    engine.switch_session(&second).unwrap();
    assert!(engine.current_view().is_empty());
}

#[test]
fn unknown_ids_are_not_found() {
    let (engine, _client) = instant(vec![]);
    let ghost = nexg_common::SessionId::from("ghost");
    let active = engine.active_id();

    assert_eq!(
        engine.switch_session(&ghost),
        Err(EngineError::NotFound(ghost.clone()))
    );
    assert_eq!(
        engine.delete_session(&ghost),
        Err(EngineError::NotFound(ghost.clone()))
    );
    assert!(engine.messages(&ghost).is_err());
    assert_eq!(engine.active_id(), active);
}

#[test]
fn deleting_active_promotes_most_recent_remaining() {
    let (engine, _client) = instant(vec![]);
    let first = engine.active_id();
    let second = engine.create_session();
    let third = engine.create_session();
    engine.switch_session(&first).unwrap();

    engine.delete_session(&first).unwrap();
    assert_eq!(engine.active_id(), third);
    assert_eq!(engine.sessions().len(), 2);

    engine.delete_session(&second).unwrap();
    assert_eq!(engine.active_id(), third);
    assert_eq!(engine.sessions().len(), 1);
}

#[test]
fn deleting_last_session_creates_fresh_one() {
    let (engine, _client) = instant(vec![]);
    let mut rx = engine.subscribe();
    let only = engine.active_id();

    engine.delete_session(&only).unwrap();

    let sessions = engine.sessions();
    assert_eq!(sessions.len(), 1);
    assert_ne!(sessions[0].id, only);
    assert_eq!(sessions[0].message_count, 0);
    let events = drain(&mut rx);
    assert!(events.contains(&EngineEvent::SessionDeleted(only)));
    assert!(events.contains(&EngineEvent::SessionCreated(sessions[0].id.clone())));
    assert!(events.contains(&EngineEvent::ActiveChanged(sessions[0].id.clone())));
}

#[test]
fn attach_appends_media_without_request() {
    let (engine, client) = instant(vec![]);
    engine
        .attach(MessageKind::Audio, "memo.mp3", "file:///tmp/memo.mp3")
        .unwrap();

    let view = engine.current_view();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].kind, MessageKind::Audio);
    assert_eq!(view[0].content, "memo.mp3");
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn grounding_is_sent_as_system_instruction() {
    let (engine, client) = instant(vec![Ok("a".into()), Ok("b".into()), Ok("c".into())]);
    engine.submit("before").await.unwrap();

    engine.set_grounding("the transcript").unwrap();
    assert!(engine.current_view().is_empty());
    assert!(engine.sessions()[0].grounded);

    engine.submit("what is it about?").await.unwrap();
    let (history, system) = client.last_request();
    assert_eq!(history, vec![Message::user("what is it about?")]);
    assert_eq!(system, Some(grounding_instruction("the transcript")));

    engine.clear_grounding();
    engine.submit("and now?").await.unwrap();
    assert!(client.last_request().1.is_none());
    assert_eq!(engine.current_view().len(), 4);
}

#[test]
fn grounding_is_per_session() {
    let (engine, _client) = instant(vec![]);
    engine.set_grounding("doc").unwrap();
    engine.create_session();
    assert!(engine.grounding().is_none());
}
