// End-to-end queue lifecycle over the public surface, with mock backends.

use gengate_core::application::{JobDispatcher, QueueManager};
use gengate_core::domain::{Endpoint, JobState, QueueConfig};
use gengate_core::error::AppError;
use gengate_core::port::backend::mocks::{MockGenerationBackend, MockSubtitleBackend};
use gengate_core::port::id_provider::mocks::SequentialIdProvider;
use gengate_core::port::time_provider::SystemTimeProvider;
use gengate_core::port::{GenerationBackend, SubtitleBackend, SubtitleTaskState};
use std::sync::Arc;
use std::time::Duration;

fn subtitle_stub() -> Arc<dyn SubtitleBackend> {
    Arc::new(MockSubtitleBackend::new(
        1,
        SubtitleTaskState::Succeeded(serde_json::json!({})),
    ))
}

fn build_manager(
    config: QueueConfig,
    backends: Vec<(Endpoint, Arc<dyn GenerationBackend>)>,
) -> Arc<QueueManager> {
    let mut dispatcher = JobDispatcher::new(subtitle_stub());
    for (endpoint, backend) in backends {
        dispatcher = dispatcher.register(endpoint, backend);
    }
    Arc::new(QueueManager::new(
        Arc::new(dispatcher),
        Arc::new(SystemTimeProvider),
        Arc::new(SequentialIdProvider::new()),
        config,
    ))
}

async fn wait_for_terminal(manager: &Arc<QueueManager>, id: &str) -> JobState {
    for _ in 0..300 {
        if let Ok(view) = manager.job_view(id).await {
            if matches!(view.status, JobState::Completed | JobState::Failed) {
                return view.status;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} never settled", id);
}

#[tokio::test]
async fn three_submissions_fill_two_slots_and_queue_one() {
    let manager = build_manager(
        QueueConfig {
            concurrency_limit: 2,
            ..Default::default()
        },
        vec![(
            Endpoint::GenerateText,
            Arc::new(MockGenerationBackend::new_delay(
                5_000,
                serde_json::json!({}),
            )),
        )],
    );

    for _ in 0..3 {
        manager
            .submit("user-1", "generate-text", Some(serde_json::json!({})))
            .await
            .unwrap();
    }

    // Let the spawned scheduling passes settle.
    tokio::time::sleep(Duration::from_millis(150)).await;

    let global = manager.global_status().await;
    assert_eq!(global.total_pending, 1);
    assert_eq!(global.total_active, 2);
}

#[tokio::test]
async fn invalid_endpoint_creates_nothing() {
    let manager = build_manager(QueueConfig::default(), vec![]);

    let err = manager
        .submit("user-1", "not-a-real-endpoint", Some(serde_json::json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));

    let err = manager.job_view("any-fabricated-id").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let global = manager.global_status().await;
    assert_eq!(global.total_pending, 0);
    assert_eq!(global.total_active, 0);
}

#[tokio::test]
async fn backend_rejection_surfaces_on_the_job() {
    let manager = build_manager(
        QueueConfig::default(),
        vec![(
            Endpoint::GenerateImage,
            Arc::new(MockGenerationBackend::new_fail("quota exceeded")),
        )],
    );

    let id = manager
        .submit("user-1", "generate-image", Some(serde_json::json!({})))
        .await
        .unwrap();

    let status = wait_for_terminal(&manager, &id).await;
    assert_eq!(status, JobState::Failed);

    let view = manager.job_view(&id).await.unwrap();
    assert_eq!(view.error.as_deref(), Some("quota exceeded"));
    assert!(view.result.is_none());
}

#[tokio::test]
async fn archive_cap_evicts_oldest_submission() {
    let manager = build_manager(
        QueueConfig {
            max_archived_items: 2,
            ..Default::default()
        },
        vec![(
            Endpoint::GenerateText,
            Arc::new(MockGenerationBackend::new_success(serde_json::json!({}))),
        )],
    );

    // Complete three jobs in submission order.
    let mut ids = Vec::new();
    for _ in 0..3 {
        let id = manager
            .submit("user-1", "generate-text", Some(serde_json::json!({})))
            .await
            .unwrap();
        wait_for_terminal(&manager, &id).await;
        ids.push(id);
    }

    // The oldest archived entry was evicted when the third settled.
    assert!(manager.job_view(&ids[0]).await.is_err());
    assert!(manager.job_view(&ids[1]).await.is_ok());
    assert!(manager.job_view(&ids[2]).await.is_ok());

    let stats = manager.stats().await;
    assert_eq!(stats.total_archived, 2);
}

#[tokio::test]
async fn pending_positions_count_fifo_slots_not_users() {
    // Concurrency 1 with a first job that never completes: user1's second
    // submission holds slot 1, user2's holds slot 2.
    let manager = build_manager(
        QueueConfig {
            concurrency_limit: 1,
            ..Default::default()
        },
        vec![(
            Endpoint::GenerateVideo,
            Arc::new(MockGenerationBackend::new_delay(
                60_000,
                serde_json::json!({}),
            )),
        )],
    );

    for _ in 0..2 {
        manager
            .submit("user-1", "generate-video", Some(serde_json::json!({})))
            .await
            .unwrap();
    }
    manager
        .submit("user-2", "generate-video", Some(serde_json::json!({})))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;

    let u1 = manager.user_status("user-1").await;
    let u2 = manager.user_status("user-2").await;

    assert_eq!(u1.position, 1);
    assert_eq!(u2.position, 2);
    assert_eq!(u1.total_active, 1);
    assert_eq!(u1.total_pending, 2);
}

#[tokio::test]
async fn every_dispatched_job_reaches_exactly_one_terminal_state() {
    let manager = build_manager(
        QueueConfig {
            concurrency_limit: 3,
            ..Default::default()
        },
        vec![
            (
                Endpoint::GenerateText,
                Arc::new(MockGenerationBackend::new_success(serde_json::json!({}))),
            ),
            (
                Endpoint::GenerateImage,
                Arc::new(MockGenerationBackend::new_fail("backend down")),
            ),
        ],
    );

    let mut ids = Vec::new();
    for i in 0..10 {
        let endpoint = if i % 2 == 0 {
            "generate-text"
        } else {
            "generate-image"
        };
        let id = manager
            .submit("user-1", endpoint, Some(serde_json::json!({"i": i})))
            .await
            .unwrap();
        ids.push(id);
    }

    let mut completed = 0;
    let mut failed = 0;
    for id in &ids {
        match wait_for_terminal(&manager, id).await {
            JobState::Completed => completed += 1,
            _ => failed += 1,
        }
    }

    assert_eq!(completed, 5);
    assert_eq!(failed, 5);

    // Nothing left pending or active once everything settled.
    let global = manager.global_status().await;
    assert_eq!(global.total_pending, 0);
    assert_eq!(global.total_active, 0);
}

#[tokio::test]
async fn subtitle_flow_settles_through_the_queue() {
    let subtitle: Arc<dyn SubtitleBackend> = Arc::new(MockSubtitleBackend::new(
        1,
        SubtitleTaskState::Succeeded(serde_json::json!({"srt": "1\n..."})),
    ));
    let dispatcher = Arc::new(JobDispatcher::new(subtitle));
    let manager = Arc::new(QueueManager::new(
        dispatcher,
        Arc::new(SystemTimeProvider),
        Arc::new(SequentialIdProvider::new()),
        QueueConfig::default(),
    ));

    let id = manager
        .submit(
            "user-1",
            "subtitle-submit",
            Some(serde_json::json!({"video_url": "file:///tmp/a.mp4"})),
        )
        .await
        .unwrap();

    // One poll at the 3s fixed delay; allow for it on the real clock.
    for _ in 0..100 {
        if let Ok(view) = manager.job_view(&id).await {
            if view.result.is_some() {
                assert_eq!(view.result.unwrap()["srt"], "1\n...");
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("subtitle job never completed");
}
