use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rand::Rng;
use tcommon::CallContext;
use tprovider::{
    ChatModel, ChatRequest, ModelProvider, ProviderClient, ProviderError, ProviderErrorKind,
    ProviderFuture, ProviderId, ProviderReply,
};

/// Echoes the prompt after a random delay. A few prompt values trigger
/// specific backend behaviours.
#[derive(Debug, Default)]
struct JitterClient {
    calls: AtomicUsize,
}

impl ProviderClient for JitterClient {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    fn default_model(&self) -> &str {
        "fake-model"
    }

    fn chat<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let prompt = request
                .messages
                .last()
                .map(|message| message.content().to_string())
                .unwrap_or_default();

            let delay = rand::thread_rng().gen_range(0..15_u64);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            match prompt.as_str() {
                "fail" => Err(ProviderError::backend_status(500, "{\"error\":\"boom\"}")),
                "empty" => Ok(ProviderReply::empty()),
                "hang" => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(ProviderReply::text("too late"))
                }
                _ => Ok(ProviderReply::text(format!("out:{prompt}"))),
            }
        })
    }
}

fn model() -> (Arc<JitterClient>, ChatModel) {
    let client = Arc::new(JitterClient::default());
    let model = ChatModel::new(client.clone());
    (client, model)
}

fn numbered(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("prompt-{i}")).collect()
}

#[tokio::test]
async fn generate_preserves_input_order() {
    let (client, model) = model();

    for count in [0_usize, 1, 3] {
        let outputs = model
            .generate(numbered(count))
            .await
            .expect("batch should succeed");
        let expected = (0..count)
            .map(|i| format!("out:prompt-{i}"))
            .collect::<Vec<_>>();
        assert_eq!(outputs, expected);
    }

    assert_eq!(client.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn hundred_jittered_prompts_come_back_in_order_every_run() {
    let (_client, model) = model();
    let expected = (0..100)
        .map(|i| format!("out:prompt-{i}"))
        .collect::<Vec<_>>();

    for _ in 0..5 {
        let outputs = model
            .generate(numbered(100))
            .await
            .expect("batch should succeed");
        assert_eq!(outputs, expected);
    }
}

#[tokio::test]
async fn single_failing_prompt_is_reported_alone() {
    let (_client, model) = model();
    let prompts = vec![
        "a".to_string(),
        "b".to_string(),
        "fail".to_string(),
        "d".to_string(),
    ];

    let error = model
        .generate(prompts)
        .await
        .expect_err("batch should fail");

    assert_eq!(error.total(), 4);
    assert_eq!(error.failed_indices(), vec![2]);
    let cause = error.error_for(2).expect("cause for index 2");
    assert_eq!(cause.kind, ProviderErrorKind::BackendStatus);
    assert_eq!(cause.status, Some(500));
}

#[tokio::test]
async fn every_failure_is_enumerated_sorted_by_index() {
    let (_client, model) = model();
    let prompts = vec![
        "empty".to_string(),
        "ok".to_string(),
        "fail".to_string(),
        "empty".to_string(),
    ];

    let error = model
        .generate(prompts)
        .await
        .expect_err("batch should fail");

    assert_eq!(error.failed_indices(), vec![0, 2, 3]);
    assert_eq!(
        error.error_for(0).map(|e| e.kind),
        Some(ProviderErrorKind::EmptyResponse)
    );
    assert_eq!(
        error.error_for(3).map(|e| e.kind),
        Some(ProviderErrorKind::EmptyResponse)
    );
}

#[tokio::test]
async fn empty_content_is_an_empty_response_error() {
    let (_client, model) = model();
    let error = model.call("empty").await.expect_err("empty reply");
    assert_eq!(error.kind, ProviderErrorKind::EmptyResponse);
}

#[tokio::test]
async fn settled_generation_keeps_partial_results() {
    let (_client, model) = model();
    let report = model
        .generate_settled(
            &CallContext::new(),
            vec!["x".to_string(), "fail".to_string(), "y".to_string()],
        )
        .await;

    assert_eq!(report.total(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.slots()[0].as_deref(), Some("out:x"));
    assert_eq!(report.slots()[1], None);
    assert_eq!(report.slots()[2].as_deref(), Some("out:y"));
    assert_eq!(report.failures()[0].index, 1);
}

#[tokio::test]
async fn cancelling_an_in_flight_batch_fails_pending_prompts() {
    let (_client, model) = model();
    let ctx = CallContext::new();
    let canceller = ctx.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let error = model
        .generate_with(&ctx, vec!["hang".to_string(), "hang".to_string()])
        .await
        .expect_err("cancelled batch should fail");

    assert_eq!(error.failed_indices(), vec![0, 1]);
    assert!(
        error
            .failures()
            .iter()
            .all(|failure| failure.error.kind == ProviderErrorKind::Cancelled)
    );
}

#[tokio::test]
async fn deadline_turns_slow_prompts_into_timeouts() {
    let (_client, model) = model();
    let ctx = CallContext::new().with_timeout(Duration::from_millis(100));

    let report = model
        .generate_settled(&ctx, vec!["quick".to_string(), "hang".to_string()])
        .await;

    assert_eq!(report.slots()[0].as_deref(), Some("out:quick"));
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].index, 1);
    assert_eq!(report.failures()[0].error.kind, ProviderErrorKind::Timeout);
}
