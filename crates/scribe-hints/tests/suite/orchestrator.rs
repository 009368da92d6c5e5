use std::time::Duration;

use scribe_core::{Originator, OwnerId, RunId};
use scribe_hints::{HintOrchestrator, QuiescentReason, RunOutcome, RunState};

use super::{council, trigger, zitting_context};

#[tokio::test(start_paused = true)]
async fn new_trigger_during_debounce_restarts_detection() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let first = orchestrator.dispatch(trigger("hr-1", vec![zitting_context(0, "Felix Ruiz")]));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(orchestrator.state(), RunState::Debounce);

    let second = orchestrator
        .execute(trigger("hr-2", vec![zitting_context(0, "Felix Ruiz")]))
        .await
        .unwrap();
    assert_eq!(second, RunOutcome::Emitted { hints: 1 });
    assert_eq!(
        first.await.unwrap().unwrap(),
        RunOutcome::Quiescent(QuiescentReason::Superseded)
    );

    let added = fixture.registry.added();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0][0].run_id, RunId::new("hr-2"));
    assert_eq!(orchestrator.state(), RunState::Idle);
}

#[tokio::test(start_paused = true)]
async fn burst_of_triggers_emits_once() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let mut handles = Vec::new();
    for n in 0..5 {
        handles.push(orchestrator.dispatch(trigger(
            &format!("hr-{n}"),
            vec![zitting_context(0, "Felix Ruiz")],
        )));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap().unwrap());
    }
    let (last, superseded) = outcomes.split_last().unwrap();
    assert_eq!(*last, RunOutcome::Emitted { hints: 1 });
    assert!(superseded
        .iter()
        .all(|outcome| *outcome == RunOutcome::Quiescent(QuiescentReason::Superseded)));

    let added = fixture.registry.added();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0][0].run_id, RunId::new("hr-4"));
}

#[tokio::test(start_paused = true)]
async fn own_change_does_not_interrupt_the_run_in_flight() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let in_flight = orchestrator.dispatch(trigger("hr-1", vec![zitting_context(0, "Felix Ruiz")]));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(orchestrator.state(), RunState::Debounce);

    let own = trigger("hr-2", vec![zitting_context(0, "Felix Ruiz")]).with_origin(
        Originator::new(OwnerId::new("editor-plugins/mandaat-card")),
    );
    assert_eq!(orchestrator.execute(own).await.unwrap(), RunOutcome::Ignored);
    assert_eq!(orchestrator.state(), RunState::Debounce);

    assert_eq!(
        in_flight.await.unwrap().unwrap(),
        RunOutcome::Emitted { hints: 1 }
    );
    let added = fixture.registry.added();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0][0].run_id, RunId::new("hr-1"));
}

#[tokio::test(start_paused = true)]
async fn foreign_origin_still_triggers_detection() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let foreign = trigger("hr-1", vec![zitting_context(0, "Felix Ruiz")])
        .with_origin(Originator::new(OwnerId::new("editor-plugins/date-card")));
    assert_eq!(
        orchestrator.execute(foreign).await.unwrap(),
        RunOutcome::Emitted { hints: 1 }
    );
}

#[tokio::test(start_paused = true)]
async fn restart_during_slow_index_load_abandons_the_load() {
    let fixture = council();
    fixture.mandates.hold();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let first = orchestrator.dispatch(trigger("hr-1", vec![zitting_context(0, "Felix Ruiz")]));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(orchestrator.state(), RunState::ScopeCheck);
    assert_eq!(fixture.mandates.loads().len(), 1);

    let second = orchestrator.dispatch(trigger("hr-2", vec![zitting_context(0, "Felix Ruiz")]));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(
        first.await.unwrap().unwrap(),
        RunOutcome::Quiescent(QuiescentReason::Superseded)
    );
    assert_eq!(fixture.session.index().scope(), None);

    fixture.mandates.release();
    assert_eq!(
        second.await.unwrap().unwrap(),
        RunOutcome::Emitted { hints: 1 }
    );
    assert_eq!(fixture.mandates.loads().len(), 2);
    assert_eq!(fixture.session.index().reload_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_the_run_and_clears_state() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    orchestrator
        .execute(trigger("hr-1", vec![zitting_context(0, "Felix Ruiz")]))
        .await
        .unwrap();
    assert!(fixture.session.index().scope().is_some());

    let in_flight = orchestrator.dispatch(trigger("hr-2", vec![zitting_context(0, "de Schepen")]));
    tokio::time::sleep(Duration::from_millis(100)).await;
    orchestrator.shutdown();

    assert_eq!(
        in_flight.await.unwrap().unwrap(),
        RunOutcome::Quiescent(QuiescentReason::Superseded)
    );
    assert_eq!(orchestrator.state(), RunState::Idle);
    assert_eq!(fixture.session.index().scope(), None);
    assert_eq!(fixture.registry.added().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn debounce_is_configurable() {
    let mut config = scribe_config::HintsConfig::default();
    config.debounce_ms = 20;
    let base = council();
    let fixture =
        scribe_test_utils::TestSession::with_fakes(config, base.mandates, base.schema, base.scope);
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let start = tokio::time::Instant::now();
    orchestrator
        .execute(trigger("hr-1", vec![zitting_context(0, "Felix Ruiz")]))
        .await
        .unwrap();
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_millis(20) && elapsed < Duration::from_millis(300),
        "{elapsed:?}"
    );
}
