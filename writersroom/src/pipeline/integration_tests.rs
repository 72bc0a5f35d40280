//! End-to-end pipeline tests against the scripted mock host.

use crate::errors::WritersRoomError;
use crate::host::{Injection, NullNotifier, FINAL_INJECTION_ID};
use crate::pipeline::{PipelineCoordinator, StageStatus, SuppressedReason, TriggerOutcome};
use crate::settings::PipelineSettings;
use crate::testing::{RecordingNotifier, ScriptedHost};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn enabled_settings() -> PipelineSettings {
    PipelineSettings {
        enabled: true,
        ..PipelineSettings::default()
    }
}

fn coordinator(host: &Arc<ScriptedHost>) -> PipelineCoordinator {
    PipelineCoordinator::new(host.clone(), Arc::new(NullNotifier))
}

#[tokio::test]
async fn test_end_to_end_run() {
    let host = Arc::new(ScriptedHost::new());
    host.push_generation("DRAFT_A");
    host.push_generation("DRAFT_B");
    host.push_generation("FINAL");

    let outcome = coordinator(&host).trigger(&enabled_settings()).await;

    let run = outcome.run().expect("run should complete");
    assert_eq!(run.final_text.as_deref(), Some("FINAL"));
    assert_eq!(run.stage_a.text(), Some("DRAFT_A"));
    assert_eq!(run.stage_b.text(), Some("DRAFT_B"));
    assert_eq!(run.synthesis.text(), Some("FINAL"));
    assert!(run.is_completed());
    assert!(run.finished_at >= run.started_at);

    let injection = host.injection(FINAL_INJECTION_ID).expect("injected");
    assert_eq!(injection.text, "FINAL");
}

#[tokio::test]
async fn test_settle_all_semantics() {
    // Stage A fails, Stage B succeeds, synthesis unsynthesizable:
    // the final result is Stage B's output and no error escapes.
    let host = Arc::new(ScriptedHost::new());
    host.push_generation_error("stage A backend down");
    host.push_generation("DRAFT_B");

    let outcome = coordinator(&host).trigger(&enabled_settings()).await;

    let run = outcome.run().expect("run should complete on partial success");
    assert_eq!(run.final_text.as_deref(), Some("DRAFT_B"));
    assert_eq!(run.stage_a.status, StageStatus::Failure);
    assert_eq!(run.synthesis.status, StageStatus::Skipped);
    // Synthesis never ran: only two generations were issued.
    assert_eq!(host.generation_count(), 2);
}

#[tokio::test]
async fn test_synthesis_disabled_prefers_stage_a() {
    let host = Arc::new(ScriptedHost::new());
    host.push_generation("DRAFT_A");
    host.push_generation("DRAFT_B");
    let mut settings = enabled_settings();
    settings.synthesis.enabled = false;

    let outcome = coordinator(&host).trigger(&settings).await;

    let run = outcome.run().unwrap();
    assert_eq!(run.final_text.as_deref(), Some("DRAFT_A"));
    assert_eq!(run.synthesis.status, StageStatus::Skipped);
    assert_eq!(host.generation_count(), 2);
}

#[tokio::test]
async fn test_synthesis_fallback_to_stage_a() {
    let host = Arc::new(ScriptedHost::new());
    host.push_generation("foo");
    host.push_generation("bar");
    host.push_generation(""); // synthesis produces nothing

    let notifier = Arc::new(RecordingNotifier::new());
    let coordinator = PipelineCoordinator::new(host.clone(), notifier.clone());

    let outcome = coordinator.trigger(&enabled_settings()).await;

    let run = outcome.run().expect("fallback is non-fatal");
    assert_eq!(run.final_text.as_deref(), Some("foo"));
    assert_eq!(run.synthesis.status, StageStatus::Failure);
    assert_eq!(notifier.warnings().len(), 1);

    let injection = host.injection(FINAL_INJECTION_ID).unwrap();
    assert_eq!(injection.text, "foo");
}

#[tokio::test]
async fn test_no_stage_output_is_terminal() {
    let host = Arc::new(ScriptedHost::new());
    host.seed_injection(Injection::new(FINAL_INJECTION_ID, "stale"));
    let mut settings = enabled_settings();
    settings.stage_a.enabled = false;
    settings.stage_b.enabled = false;

    let notifier = Arc::new(RecordingNotifier::new());
    let coordinator = PipelineCoordinator::new(host.clone(), notifier.clone());

    let outcome = coordinator.trigger(&settings).await;

    match outcome {
        TriggerOutcome::Failed(WritersRoomError::NoStageOutput { .. }) => {}
        other => panic!("expected terminal failure, got {other:?}"),
    }
    // The stale injection was removed and nothing new was staged.
    assert!(host.injection(FINAL_INJECTION_ID).is_none());
    assert_eq!(notifier.errors().len(), 1);

    // The failed run is still recorded, with no final text.
    let run = coordinator.last_run().unwrap();
    assert!(run.final_text.is_none());
    assert_eq!(run.stage_a.status, StageStatus::Skipped);
}

#[tokio::test]
async fn test_unknown_provider_skips_only_that_stage() {
    let host = Arc::new(ScriptedHost::new());
    host.push_generation("DRAFT_B");
    let mut settings = enabled_settings();
    settings.stage_a.api_provider = Some("banana".to_string());

    let outcome = coordinator(&host).trigger(&settings).await;

    let run = outcome.run().expect("stage B carries the run");
    assert_eq!(run.stage_a.status, StageStatus::Failure);
    assert!(run.stage_a.error.as_deref().unwrap().contains("banana"));
    assert_eq!(run.final_text.as_deref(), Some("DRAFT_B"));
    // Stage A never generated; no API-select script went out for it.
    assert_eq!(host.generation_count(), 1);
    assert!(host.scripts().iter().all(|s| !s.contains("banana")));
}

#[tokio::test]
async fn test_disabled_pipeline_suppresses_trigger() {
    let host = Arc::new(ScriptedHost::new());
    let settings = PipelineSettings::default();

    let outcome = coordinator(&host).trigger(&settings).await;

    assert!(matches!(
        outcome,
        TriggerOutcome::Suppressed(SuppressedReason::Disabled)
    ));
    assert!(host.scripts().is_empty());
}

#[tokio::test]
async fn test_single_flight_guard_drops_concurrent_triggers() {
    let host = Arc::new(ScriptedHost::new());
    host.set_generation_delay(Duration::from_millis(50));
    host.push_generation("DRAFT_A");
    host.push_generation("DRAFT_B");
    host.push_generation("FINAL");

    let coordinator = Arc::new(PipelineCoordinator::new(
        host.clone(),
        Arc::new(NullNotifier),
    ));
    let settings = enabled_settings();

    let first = {
        let coordinator = coordinator.clone();
        let settings = settings.clone();
        tokio::spawn(async move { coordinator.trigger(&settings).await })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(coordinator.is_running());

    // Every trigger while running is dropped, not queued.
    for _ in 0..3 {
        let outcome = coordinator.trigger(&settings).await;
        assert!(matches!(
            outcome,
            TriggerOutcome::Suppressed(SuppressedReason::AlreadyRunning)
        ));
    }

    let outcome = first.await.unwrap();
    assert!(outcome.is_completed());
    assert!(!coordinator.is_running());
    // Exactly one run's worth of generations happened.
    assert_eq!(host.generation_count(), 3);
}

#[tokio::test]
async fn test_guard_clears_after_failure() {
    let host = Arc::new(ScriptedHost::new());
    host.push_generation_error("down");
    host.push_generation_error("down");

    let coordinator = coordinator(&host);
    let outcome = coordinator.trigger(&enabled_settings()).await;
    assert!(matches!(outcome, TriggerOutcome::Failed(_)));
    assert!(!coordinator.is_running());

    // A new trigger is accepted after the failed run settles.
    host.push_generation("DRAFT_A");
    host.push_generation("DRAFT_B");
    host.push_generation("FINAL");
    let outcome = coordinator.trigger(&enabled_settings()).await;
    assert!(outcome.is_completed());
}

#[tokio::test]
async fn test_new_run_clears_previous_result() {
    let host = Arc::new(ScriptedHost::new());
    host.push_generation("DRAFT_A");
    host.push_generation("DRAFT_B");
    host.push_generation("FINAL");

    let coordinator = coordinator(&host);
    coordinator.trigger(&enabled_settings()).await;
    assert!(coordinator.last_run().unwrap().is_completed());

    // The next run fails; the stale completed run must not survive it.
    host.push_generation_error("down");
    host.push_generation_error("down");
    coordinator.trigger(&enabled_settings()).await;

    let run = coordinator.last_run().unwrap();
    assert!(!run.is_completed());
}

#[tokio::test]
async fn test_repeated_runs_replace_injection() {
    let host = Arc::new(ScriptedHost::new());
    host.push_generation("A1");
    host.push_generation("B1");
    host.push_generation("FINAL_1");
    host.push_generation("A2");
    host.push_generation("B2");
    host.push_generation("FINAL_2");

    let coordinator = coordinator(&host);
    coordinator.trigger(&enabled_settings()).await;
    coordinator.trigger(&enabled_settings()).await;

    let injection = host.injection(FINAL_INJECTION_ID).unwrap();
    assert_eq!(injection.text, "FINAL_2");
}

#[tokio::test]
async fn test_not_ready_host_rejects_trigger_without_side_effects() {
    let host = Arc::new(ScriptedHost::not_ready());
    let mut settings = enabled_settings();
    settings.stage_a.preset = "SomePreset".to_string();

    let notifier = Arc::new(RecordingNotifier::new());
    let coordinator = PipelineCoordinator::new(host.clone(), notifier.clone());

    let outcome = coordinator.trigger(&settings).await;

    match outcome {
        TriggerOutcome::Failed(WritersRoomError::NotReady) => {}
        other => panic!("expected not-ready failure, got {other:?}"),
    }
    // Nothing reached the host: no setup script, no flush, no generation.
    assert!(host.scripts().is_empty());
    assert_eq!(notifier.errors().len(), 1);
    // No run started, so none is recorded and the guard stays clear.
    assert!(coordinator.last_run().is_none());
    assert!(!coordinator.is_running());
}

#[tokio::test]
async fn test_failed_run_records_stage_errors() {
    let host = Arc::new(ScriptedHost::new());
    host.push_generation_error("backend down");
    host.push_generation_error("backend down");

    let coordinator = coordinator(&host);
    let outcome = coordinator.trigger(&enabled_settings()).await;
    assert!(matches!(outcome, TriggerOutcome::Failed(_)));

    // The terminal error carries the settled results, not blank stages.
    let run = coordinator.last_run().unwrap();
    assert_eq!(run.stage_a.status, StageStatus::Failure);
    assert!(run.stage_a.error.as_deref().unwrap().contains("backend down"));
    assert_eq!(run.stage_b.status, StageStatus::Failure);
    assert_eq!(run.synthesis.status, StageStatus::Skipped);
    assert!(run.final_text.is_none());
}
