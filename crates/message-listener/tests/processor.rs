//! Processor tests against a mocked Telegram Bot API.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use message_listener::{MessageProcessor, ProcessResult, ProcessorConfig, ProcessorError, Update};
use mock_brain::{BrainError, DelayedBrain, EchoBrain, FailingBrain};
use serde_json::{json, Value};
use telegram_client::{ReconnectConfig, TelegramClient, TelegramConfig};
use tokio::sync::oneshot;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TelegramClient {
    let config = TelegramConfig::new("TEST")
        .with_api_url(server.uri())
        .with_poll_timeout(Duration::from_secs(0));
    TelegramClient::new(config).unwrap()
}

fn fast_config() -> ProcessorConfig {
    ProcessorConfig {
        reconnect: ReconnectConfig {
            max_retries: Some(1),
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(20),
            backoff_multiplier: 2.0,
        },
        ..Default::default()
    }
}

fn text_update(update_id: i64, chat_id: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id * 10,
            "date": 1700000000,
            "chat": {"id": chat_id, "type": "private"},
            "from": {"id": chat_id, "is_bot": false, "first_name": "User"},
            "text": text
        }
    })
}

fn parse_update(value: Value) -> Update {
    serde_json::from_value(value).unwrap()
}

fn sent_message_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": {"message_id": 900, "date": 0, "chat": {"id": 0, "type": "private"}}
    }))
}

async fn mount_send_message(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/botTEST/sendMessage"))
        .respond_with(sent_message_response())
        .mount(server)
        .await;
}

/// Serve `updates` on the first poll and nothing afterwards.
async fn mount_updates(server: &MockServer, updates: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path("/botTEST/getUpdates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": updates})))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/botTEST/getUpdates"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true, "result": []}))
                .set_delay(Duration::from_millis(50)),
        )
        .with_priority(2)
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer, api_method: &str) -> usize {
    let suffix = format!("/{}", api_method);
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().ends_with(&suffix))
        .count()
}

/// (chat_id, text) of every sendMessage call, in arrival order.
async fn sent_messages(server: &MockServer) -> Vec<(i64, String)> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().ends_with("/sendMessage"))
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            (
                body["chat_id"].as_i64().unwrap(),
                body["text"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

async fn wait_for_requests(server: &MockServer, api_method: &str, count: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while request_count(server, api_method).await < count {
        assert!(
            Instant::now() < deadline,
            "timed out waiting for {} {} requests",
            count,
            api_method
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

mod single_update {
    use super::*;

    #[tokio::test]
    async fn test_reply_goes_to_same_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/sendMessage"))
            .and(body_json(json!({"chat_id": 77, "text": "echo: hi"})))
            .respond_with(sent_message_response())
            .expect(1)
            .mount(&server)
            .await;

        let processor =
            MessageProcessor::new(client_for(&server), EchoBrain::with_prefix("echo: "), fast_config());
        let result = processor
            .process_update(&parse_update(text_update(1, 77, "hi")))
            .await;

        match result {
            ProcessResult::Responded {
                sender,
                chat_id,
                response,
                message_id,
            } => {
                assert_eq!(sender, "77");
                assert_eq!(chat_id, 77);
                assert_eq!(response, "echo: hi");
                assert_eq!(message_id, 900);
            }
            other => panic!("expected Responded, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_text_is_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/sendMessage"))
            .and(body_json(json!({"chat_id": 5, "text": "echo: "})))
            .respond_with(sent_message_response())
            .expect(1)
            .mount(&server)
            .await;

        let processor =
            MessageProcessor::new(client_for(&server), EchoBrain::with_prefix("echo: "), fast_config());
        let result = processor
            .process_update(&parse_update(text_update(1, 5, "")))
            .await;
        assert!(matches!(result, ProcessResult::Responded { .. }));
    }

    #[tokio::test]
    async fn test_brain_error_sends_error_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/sendMessage"))
            .and(body_json(json!({"chat_id": 8, "text": "sorry"})))
            .respond_with(sent_message_response())
            .expect(1)
            .mount(&server)
            .await;

        let config = ProcessorConfig {
            error_reply: Some("sorry".to_string()),
            ..fast_config()
        };
        let processor = MessageProcessor::new(client_for(&server), FailingBrain::api_error(500), config);
        let result = processor
            .process_update(&parse_update(text_update(1, 8, "hi")))
            .await;

        assert!(matches!(
            result,
            ProcessResult::Error(ProcessorError::Brain(BrainError::Api { status: 500, .. }))
        ));
    }

    #[tokio::test]
    async fn test_brain_error_without_error_reply_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/sendMessage"))
            .respond_with(sent_message_response())
            .expect(0)
            .mount(&server)
            .await;

        let processor = MessageProcessor::new(client_for(&server), FailingBrain::default(), fast_config());
        let result = processor
            .process_update(&parse_update(text_update(1, 8, "hi")))
            .await;
        assert!(matches!(result, ProcessResult::Error(ProcessorError::Brain(_))));
    }

    #[tokio::test]
    async fn test_brain_timeout_sends_error_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/sendMessage"))
            .and(body_json(json!({"chat_id": 9, "text": "sorry"})))
            .respond_with(sent_message_response())
            .expect(1)
            .mount(&server)
            .await;

        let config = ProcessorConfig {
            brain_timeout: Duration::from_millis(100),
            error_reply: Some("sorry".to_string()),
            ..fast_config()
        };
        let brain = DelayedBrain::with_secs(EchoBrain::new(), 5);
        let processor = MessageProcessor::new(client_for(&server), brain, config);
        let result = processor
            .process_update(&parse_update(text_update(1, 9, "hi")))
            .await;

        assert!(matches!(result, ProcessResult::Error(ProcessorError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_send_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/sendMessage"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .mount(&server)
            .await;

        let processor = MessageProcessor::new(client_for(&server), EchoBrain::new(), fast_config());
        let result = processor
            .process_update(&parse_update(text_update(1, 3, "hi")))
            .await;

        assert!(matches!(result, ProcessResult::Error(ProcessorError::Telegram(_))));
    }

    #[tokio::test]
    async fn test_typing_indicator_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/sendChatAction"))
            .and(body_json(json!({"chat_id": 4, "action": "typing"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
            .expect(1)
            .mount(&server)
            .await;
        mount_send_message(&server).await;

        let config = ProcessorConfig {
            send_typing_indicators: true,
            ..fast_config()
        };
        let processor = MessageProcessor::new(client_for(&server), EchoBrain::new(), config);
        let result = processor
            .process_update(&parse_update(text_update(1, 4, "hi")))
            .await;
        assert!(matches!(result, ProcessResult::Responded { .. }));
    }

    #[tokio::test]
    async fn test_sticker_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(sent_message_response())
            .expect(0)
            .mount(&server)
            .await;

        let processor = MessageProcessor::new(client_for(&server), EchoBrain::new(), fast_config());
        let sticker = parse_update(json!({
            "update_id": 1,
            "message": {
                "message_id": 10,
                "date": 0,
                "chat": {"id": 1, "type": "private"},
                "sticker": {"file_id": "abc"}
            }
        }));

        assert!(matches!(
            processor.process_update(&sticker).await,
            ProcessResult::Skipped { .. }
        ));
    }
}

mod run_loop {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_sender_gets_exactly_one_reply() {
        let server = MockServer::start().await;
        let chats: Vec<i64> = (1..=8).map(|i| 1000 + i).collect();
        let updates = chats
            .iter()
            .enumerate()
            .map(|(i, chat)| text_update(i as i64 + 1, *chat, &format!("msg-from-{}", chat)))
            .collect();
        mount_updates(&server, updates).await;
        mount_send_message(&server).await;

        let brain = DelayedBrain::with_millis(EchoBrain::with_prefix("echo: "), 100);
        let processor = MessageProcessor::new(client_for(&server), brain, fast_config());

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(processor.run_with_shutdown(async {
            let _ = stop_rx.await;
        }));

        wait_for_requests(&server, "sendMessage", chats.len()).await;
        let _ = stop_tx.send(());
        handle.await.unwrap().unwrap();

        let mut sent = sent_messages(&server).await;
        sent.sort();
        let expected: Vec<(i64, String)> = chats
            .iter()
            .map(|chat| (*chat, format!("echo: msg-from-{}", chat)))
            .collect();
        assert_eq!(sent, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_message_does_not_block_others() {
        let server = MockServer::start().await;
        mount_updates(
            &server,
            vec![text_update(1, 1, "slow please"), text_update(2, 2, "fast")],
        )
        .await;
        mount_send_message(&server).await;

        let brain = DelayedBrain::with_secs(EchoBrain::new(), 30).only_when("slow");
        let config = ProcessorConfig {
            drain_timeout: Duration::from_millis(100),
            ..fast_config()
        };
        let processor = MessageProcessor::new(client_for(&server), brain, config);

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(processor.run_with_shutdown(async {
            let _ = stop_rx.await;
        }));

        wait_for_requests(&server, "sendMessage", 1).await;
        assert_eq!(sent_messages(&server).await, vec![(2, "fast".to_string())]);

        // The slow message is abandoned once the drain window closes
        let started = Instant::now();
        let _ = stop_tx.send(());
        handle.await.unwrap().unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(request_count(&server, "sendMessage").await, 1);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_in_flight_messages() {
        let server = MockServer::start().await;
        mount_updates(&server, vec![text_update(1, 6, "hi")]).await;
        mount_send_message(&server).await;

        let brain = DelayedBrain::with_millis(EchoBrain::new(), 300);
        let processor = MessageProcessor::new(client_for(&server), brain, fast_config());

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(processor.run_with_shutdown(async {
            let _ = stop_rx.await;
        }));

        // A second poll means the first batch has been dispatched
        wait_for_requests(&server, "getUpdates", 2).await;
        let _ = stop_tx.send(());
        handle.await.unwrap().unwrap();

        assert_eq!(sent_messages(&server).await, vec![(6, "hi".to_string())]);
    }

    #[tokio::test]
    async fn test_rejected_token_ends_run() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/getUpdates"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "ok": false,
                "error_code": 401,
                "description": "Unauthorized"
            })))
            .mount(&server)
            .await;

        let processor = MessageProcessor::new(client_for(&server), EchoBrain::new(), fast_config());
        let results = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&results);

        let outcome = processor
            .run_with_callback(move |result| sink.lock().unwrap().push(result))
            .await;

        assert!(matches!(outcome, Err(ProcessorError::StreamEnded)));
        let results = results.lock().unwrap();
        assert_eq!(results.len(), 1);
        assert!(matches!(
            &results[0],
            ProcessResult::Error(ProcessorError::Telegram(e)) if e.is_unauthorized()
        ));
    }
}
