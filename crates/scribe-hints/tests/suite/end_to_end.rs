use std::sync::Arc;

use scribe_core::{Originator, OwnerId, Region, RunId, ScopeKey, TextRange};
use scribe_hints::{
    HintError, HintOrchestrator, QuiescentReason, RunOutcome, SnippetContext, Triple,
};
use scribe_index::LookupError;
use scribe_test_utils::{extract_range, mandate, RegistryEvent};

use super::{council, trigger, zitting_context, AANWEZIGE, GENT};

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[tokio::test(start_paused = true)]
async fn full_name_yields_a_single_card() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let (text, selection) = extract_range("/*start*/Felix Ruiz/*end*/ is chairperson");
    let context = zitting_context(1000, &text);
    assert_eq!(context.region, Region::new(1000u32, 1025u32));

    let outcome = orchestrator
        .execute(trigger("hr-1", vec![context.clone()]))
        .await
        .unwrap();
    assert_eq!(outcome, RunOutcome::Emitted { hints: 1 });

    let events = fixture.registry.events();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        RegistryEvent::RemoveInRegion {
            region: context.region,
            run_id: RunId::new("hr-1"),
            owner: OwnerId::new("editor-plugins/mandaat-card"),
        }
    );

    let added = fixture.registry.added();
    assert_eq!(added.len(), 1);
    let card = &added[0][0];
    assert_eq!(card.location, context.region.normalize(selection).unwrap());
    assert_eq!(card.location, range(1000, 1010));
    assert_eq!(card.entity.id, "m1");
    assert_eq!(card.run_id, RunId::new("hr-1"));
    assert_eq!(card.owner, OwnerId::new("editor-plugins/mandaat-card"));

    let insertions: Vec<_> = card.insertions().map(|(_, property)| property.uri.as_str()).collect();
    assert_eq!(insertions, vec![AANWEZIGE]);
}

#[tokio::test(start_paused = true)]
async fn scope_is_read_from_configured_marker_property() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    orchestrator
        .execute(trigger("hr-1", vec![zitting_context(0, "de Schepen")]))
        .await
        .unwrap();

    assert_eq!(
        fixture.scope.queried(),
        vec!["http://data.vlaanderen.be/ns/besluit#isGehoudenDoor".to_owned()]
    );
    assert_eq!(fixture.mandates.loads(), vec![ScopeKey::new(GENT)]);
}

#[tokio::test(start_paused = true)]
async fn context_without_type_assertion_is_skipped() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let context = SnippetContext::new(Region::at(0u32, 10u32), "Felix Ruiz").with_triple(
        Triple::new(
            "http://data.lblod.info/id/zittingen/1",
            "http://data.vlaanderen.be/ns/besluit#geplandeStart",
            "2018-01-01",
        ),
    );
    let outcome = orchestrator
        .execute(trigger("hr-1", vec![context]))
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Quiescent(QuiescentReason::NoHints));
    assert!(fixture.schema.calls().is_empty());
    assert!(fixture.registry.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn class_without_mandate_properties_is_skipped() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let context = SnippetContext::new(Region::at(0u32, 10u32), "Felix Ruiz").with_triple(
        Triple::new("_:b0", "a", " http://data.vlaanderen.be/ns/besluit#Besluit "),
    );
    let outcome = orchestrator
        .execute(trigger("hr-1", vec![context]))
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Quiescent(QuiescentReason::NoHints));
    assert_eq!(
        fixture.schema.calls(),
        vec![(
            "http://data.vlaanderen.be/ns/besluit#Besluit".to_owned(),
            "http://data.vlaanderen.be/ns/mandaat#Mandaat".to_owned()
        )]
    );
    assert!(fixture.registry.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn missing_scope_marker_ends_quietly() {
    let fixture = council();
    fixture.scope.set(None);
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let outcome = orchestrator
        .execute(trigger("hr-1", vec![zitting_context(0, "Felix Ruiz")]))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Quiescent(QuiescentReason::ScopeUnavailable)
    );
    assert!(fixture.mandates.loads().is_empty());
    assert!(fixture.registry.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn trigger_without_contexts_does_nothing() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let outcome = orchestrator.execute(trigger("hr-1", Vec::new())).await.unwrap();
    assert_eq!(outcome, RunOutcome::Quiescent(QuiescentReason::NoContexts));
    assert!(fixture.scope.queried().is_empty());
}

#[tokio::test(start_paused = true)]
async fn lookup_failure_propagates_and_leaves_index_untouched() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    fixture
        .mandates
        .fail_with(Some(LookupError::new("quad store unavailable")));
    let err = orchestrator
        .execute(trigger("hr-1", vec![zitting_context(0, "Felix Ruiz")]))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        HintError::Lookup(LookupError::new("quad store unavailable"))
    );
    assert_eq!(fixture.session.index().scope(), None);
    assert!(fixture.registry.events().is_empty());

    fixture.mandates.fail_with(None);
    let outcome = orchestrator
        .execute(trigger("hr-2", vec![zitting_context(0, "Felix Ruiz")]))
        .await
        .unwrap();
    assert_eq!(outcome, RunOutcome::Emitted { hints: 1 });
    assert_eq!(fixture.mandates.loads().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn schema_failure_is_not_memoized() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    fixture.schema.fail_with(Some(LookupError::new("timeout")));
    let err = orchestrator
        .execute(trigger("hr-1", vec![zitting_context(0, "Felix Ruiz")]))
        .await;
    assert!(matches!(err, Err(HintError::Lookup(_))));

    fixture.schema.fail_with(None);
    let outcome = orchestrator
        .execute(trigger("hr-2", vec![zitting_context(0, "Felix Ruiz")]))
        .await
        .unwrap();
    assert_eq!(outcome, RunOutcome::Emitted { hints: 1 });
    assert_eq!(fixture.schema.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn lookups_and_tokenization_are_memoized_across_runs() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    for run_id in ["hr-1", "hr-2", "hr-3"] {
        orchestrator
            .execute(trigger(run_id, vec![zitting_context(0, "Felix Ruiz")]))
            .await
            .unwrap();
    }

    assert_eq!(fixture.schema.calls().len(), 1);
    assert_eq!(fixture.mandates.loads().len(), 1);
    let tokens = fixture.session.token_stats();
    assert_eq!((tokens.hits, tokens.misses), (2, 1));
}

#[tokio::test(start_paused = true)]
async fn stale_hints_are_removed_only_in_regions_with_new_hints() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let with_hint = zitting_context(0, "de Schepen");
    let without_hint = zitting_context(100, "het college");
    let with_two = zitting_context(200, "Felix Ruiz en de Schepen");

    let outcome = orchestrator
        .execute(trigger(
            "hr-1",
            vec![with_hint.clone(), without_hint.clone(), with_two.clone()],
        ))
        .await
        .unwrap();
    assert_eq!(outcome, RunOutcome::Emitted { hints: 3 });

    let removed: Vec<Region> = fixture
        .registry
        .events()
        .into_iter()
        .filter_map(|event| match event {
            RegistryEvent::RemoveInRegion { region, .. } => Some(region),
            _ => None,
        })
        .collect();
    assert_eq!(removed, vec![with_hint.region, with_two.region]);

    let added = fixture.registry.added();
    assert_eq!(added.len(), 1, "all cards go out as one batch");
    let locations: Vec<TextRange> = added[0].iter().map(|card| card.location).collect();
    assert_eq!(
        locations,
        vec![range(3, 10), range(200, 210), range(217, 224)]
    );
}

#[tokio::test(start_paused = true)]
async fn scope_change_replaces_the_mandate_set() {
    let fixture = council();
    let aalst = "http://data.lblod.info/id/bestuursorganen/aalst-gemeenteraad";
    fixture
        .mandates
        .insert(aalst, vec![mandate("a1", "Burgemeester")]);
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    let text = "Felix Ruiz en de Burgemeester";
    let first = orchestrator
        .execute(trigger("hr-1", vec![zitting_context(0, text)]))
        .await
        .unwrap();
    assert_eq!(first, RunOutcome::Emitted { hints: 1 });

    fixture.scope.set(Some(ScopeKey::new(aalst)));
    let second = orchestrator
        .execute(trigger("hr-2", vec![zitting_context(0, text)]))
        .await
        .unwrap();
    assert_eq!(second, RunOutcome::Emitted { hints: 1 });

    let added = fixture.registry.added();
    assert_eq!(added[0][0].entity.id, "m1");
    assert_eq!(added[1][0].entity.id, "a1");
    assert_eq!(
        fixture.mandates.loads(),
        vec![ScopeKey::new(GENT), ScopeKey::new(aalst)]
    );
}

#[tokio::test(start_paused = true)]
async fn retracted_card_suppresses_its_own_change_event() {
    let fixture = council();
    let orchestrator = HintOrchestrator::new(fixture.session.clone());

    orchestrator
        .execute(trigger("hr-1", vec![zitting_context(1000, "Felix Ruiz is chairperson")]))
        .await
        .unwrap();
    let card = fixture.registry.added()[0][0].clone();

    fixture.registry.set_shift(4);
    let retraction = card.retract(&*fixture.registry);
    assert_eq!(retraction.location, range(1004, 1014));
    assert_eq!(
        retraction.origin,
        Originator::new(OwnerId::new("editor-plugins/mandaat-card"))
    );
    assert_eq!(
        fixture.registry.events().last(),
        Some(&RegistryEvent::RemoveAtLocation {
            location: range(1000, 1010),
            run_id: RunId::new("hr-1"),
            owner: OwnerId::new("editor-plugins/mandaat-card"),
        })
    );

    // The editor applies the card and reports the change with the origin attached.
    let echo = trigger(
        "hr-2",
        vec![zitting_context(1004, "Felix Ruiz is chairperson")],
    )
    .with_origin(retraction.origin);
    let before = fixture.registry.events().len();
    assert_eq!(orchestrator.execute(echo).await.unwrap(), RunOutcome::Ignored);
    assert_eq!(fixture.registry.events().len(), before);
}

#[tokio::test(start_paused = true)]
async fn shared_session_across_orchestrators() {
    let fixture = council();
    let first = HintOrchestrator::new(Arc::clone(&fixture.session));
    let second = HintOrchestrator::new(Arc::clone(&fixture.session));

    first
        .execute(trigger("hr-1", vec![zitting_context(0, "Felix Ruiz")]))
        .await
        .unwrap();
    second
        .execute(trigger("hr-2", vec![zitting_context(0, "Felix Ruiz")]))
        .await
        .unwrap();

    assert_eq!(fixture.mandates.loads().len(), 1);
    assert_eq!(fixture.session.property_stats().misses, 1);
}
