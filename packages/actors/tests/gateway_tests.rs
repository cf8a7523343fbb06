mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use actors::{EXECUTION_FAILED, FnExecutor, Outcome};
use futures_util::future::join_all;
use lookup_core::{Job, ResultStatus, ValidationError};

use common::{GatedExecutor, RecordingExecutor, alice, eventually, failing_executor, ok_executor};

#[tokio::test]
async fn completed_lookup_carries_collaborator_fields() {
    let (gateway, runner) = common::start(5, Duration::from_secs(5), ok_executor()).await;

    let outcome = gateway.submit("551199999999").await.unwrap();
    match outcome {
        Outcome::Completed {
            requested_at,
            result,
            ..
        } => {
            assert_eq!(result.status(), ResultStatus::Ok);
            assert_eq!(result.detail(), "Ok with any info");
            assert_eq!(result.fields(), &alice());
            assert!(requested_at <= result.timestamp());
        }
        other => panic!("expected completed outcome, got {other:?}"),
    }

    runner.shutdown().await;
}

#[tokio::test]
async fn short_target_is_rejected_without_enqueueing() {
    let executor = RecordingExecutor::new(Duration::ZERO);
    let (gateway, runner) = common::start(1, Duration::from_secs(5), executor.clone()).await;

    let err = gateway.submit("abc").await.unwrap_err();
    assert_eq!(err, ValidationError::TargetTooShort { len: 3, min: 6 });
    assert!(gateway.queue().is_empty());

    match gateway.lookup("12345").await {
        Outcome::Rejected(reason) => assert!(reason.contains("at least 6")),
        other => panic!("expected rejection, got {other:?}"),
    }

    // The runner is still idle, so a valid lookup is served right away.
    assert!(matches!(
        gateway.submit("551199999999").await,
        Ok(Outcome::Completed { .. })
    ));
    assert_eq!(executor.targets(), vec!["551199999999".to_string()]);

    runner.shutdown().await;
}

#[tokio::test]
async fn faulting_collaborator_completes_with_error_result() {
    let (gateway, runner) = common::start(5, Duration::from_secs(5), failing_executor()).await;

    for _ in 0..3 {
        match gateway.submit("551199999999").await.unwrap() {
            Outcome::Completed { result, .. } => {
                assert_eq!(result.status(), ResultStatus::Error);
                assert_eq!(result.detail(), EXECUTION_FAILED);
                assert!(!result.fields().has_any());
            }
            other => panic!("expected completed outcome, got {other:?}"),
        }
    }

    runner.shutdown().await;
}

#[tokio::test]
async fn panicking_collaborator_does_not_stop_the_runner() {
    let executor = Arc::new(FnExecutor::new(|job: &Job| {
        if job.target().starts_with("panic") {
            panic!("driver crashed");
        }
        job.answer(lookup_core::JobResult::ok("Ok with any info", alice()));
        Ok(())
    }));
    let (gateway, runner) = common::start(5, Duration::from_secs(5), executor).await;

    match gateway.submit("panic-target").await.unwrap() {
        Outcome::Completed { result, .. } => assert_eq!(result.detail(), EXECUTION_FAILED),
        other => panic!("expected completed outcome, got {other:?}"),
    }
    match gateway.submit("551199999999").await.unwrap() {
        Outcome::Completed { result, .. } => assert!(result.is_ok()),
        other => panic!("expected completed outcome, got {other:?}"),
    }

    runner.shutdown().await;
}

#[tokio::test]
async fn slow_collaborator_times_out_and_late_answer_is_ignored() {
    let response_timeout = Duration::from_millis(300);
    let executor = GatedExecutor::new();
    let (gateway, runner) = common::start(5, response_timeout, executor.clone()).await;

    let started = Instant::now();
    let outcome = gateway.submit("551199999999").await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(outcome, Outcome::Timeout);
    assert!(elapsed >= response_timeout, "timed out early: {elapsed:?}");
    assert!(elapsed < response_timeout + Duration::from_secs(1), "timed out late: {elapsed:?}");

    // Let the collaborator finish: its answer arrives after the timeout was
    // recorded and must not replace it.
    executor.open();
    assert!(eventually(Duration::from_secs(5), || executor.answers().len() == 1).await);
    assert_eq!(executor.answers(), vec![false]);

    runner.shutdown().await;
}

#[tokio::test]
async fn third_submission_is_overloaded_when_capacity_is_two() {
    let response_timeout = Duration::from_millis(300);
    let executor = GatedExecutor::new();
    let (gateway, runner) = common::start(2, response_timeout, executor.clone()).await;

    let submissions = ["551100000001", "551100000002", "551100000003"].map(|target| {
        let gateway = gateway.clone();
        async move {
            let started = Instant::now();
            let outcome = gateway.submit(target).await.unwrap();
            (outcome, started.elapsed())
        }
    });
    let results = join_all(submissions).await;

    assert_eq!(results[2].0, Outcome::Overloaded);
    assert!(results[2].1 < Duration::from_millis(100), "overload was not immediate");

    for (outcome, elapsed) in &results[..2] {
        assert_eq!(outcome, &Outcome::Timeout);
        assert!(*elapsed >= response_timeout);
    }

    // Only the first job reached the collaborator; the second was answered
    // with a timeout while still queued and is skipped once the gate opens.
    executor.open();
    assert!(eventually(Duration::from_secs(5), || executor.answers().len() == 1).await);
    match gateway.submit("551100000004").await.unwrap() {
        Outcome::Completed { result, .. } => assert!(result.is_ok()),
        other => panic!("expected completed outcome, got {other:?}"),
    }
    assert_eq!(
        executor.started(),
        vec!["551100000001".to_string(), "551100000004".to_string()]
    );

    runner.shutdown().await;
}
