//! Registration error surface, lifecycle notifications, and shutdown.

mod common;

use axon_event::EventHistoryRequest;
use axon_extension::testing::{LifecycleCall, ScriptedExtension};
use axon_extension::{
    ExtensionError, ExtensionFactory, RegistrationError, SharedStateResolution, SharedStateStatus,
    SharedStateType,
};
use axon_hub::EventHub;
use common::{
    demo_event, plain_extension, register_and_start, registration_probe, wait_until, Recorder,
};
use serde_json::json;
use std::time::Duration;

const A: &str = "com.test.a";

#[tokio::test(flavor = "multi_thread")]
async fn registration_reports_success() {
    let hub = EventHub::new();
    let (callback, outcome) = registration_probe();

    let factory: ExtensionFactory = Box::new(|_api| Ok(Box::new(ScriptedExtension::new(A))));
    hub.register_extension(factory, Some(callback));

    assert_eq!(outcome.await.expect("callback"), Ok(()));
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_names_are_rejected() {
    let hub = EventHub::new();

    let (first_cb, first) = registration_probe();
    let first_factory: ExtensionFactory = Box::new(|_api| Ok(Box::new(ScriptedExtension::new(A))));
    hub.register_extension(first_factory, Some(first_cb));
    first.await.expect("callback").expect("registered");

    let (second_cb, second) = registration_probe();
    let second_factory: ExtensionFactory = Box::new(|_api| Ok(Box::new(ScriptedExtension::new(A))));
    hub.register_extension(second_factory, Some(second_cb));

    assert_eq!(
        second.await.expect("callback"),
        Err(RegistrationError::DuplicateExtensionName(A.to_string()))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_names_are_rejected() {
    let hub = EventHub::new();
    let (callback, outcome) = registration_probe();

    let factory: ExtensionFactory = Box::new(|_api| Ok(Box::new(ScriptedExtension::new("  "))));
    hub.register_extension(factory, Some(callback));

    assert_eq!(
        outcome.await.expect("callback"),
        Err(RegistrationError::InvalidExtensionName)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_factory_surfaces_initialization_failure() {
    let hub = EventHub::new();
    let (callback, outcome) = registration_probe();

    let factory: ExtensionFactory =
        Box::new(|_api| Err(ExtensionError::InitFailed("no storage".into())));
    hub.register_extension(factory, Some(callback));

    match outcome.await.expect("callback") {
        Err(RegistrationError::ExtensionInitializationFailure(message)) => {
            assert!(message.contains("no storage"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn panicking_factory_surfaces_initialization_failure() {
    let hub = EventHub::new();
    let (callback, outcome) = registration_probe();

    let factory: ExtensionFactory = Box::new(|_api| panic!("constructor blew up"));
    hub.register_extension(factory, Some(callback));

    assert!(matches!(
        outcome.await.expect("callback"),
        Err(RegistrationError::ExtensionInitializationFailure(_))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn unregistering_a_missing_extension_reports_not_registered() {
    let hub = EventHub::new();
    register_and_start(&hub, vec![]).await;

    let (callback, outcome) = registration_probe();
    hub.unregister_extension("com.test.ghost", Some(callback));

    assert_eq!(
        outcome.await.expect("callback"),
        Err(RegistrationError::ExtensionNotRegistered)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn unregister_notifies_and_removes_the_extension() {
    let hub = EventHub::new();

    let extension = ScriptedExtension::new(A);
    let lifecycle = extension.lifecycle_log();
    let factory: ExtensionFactory = Box::new(move |_api| Ok(Box::new(extension)));

    register_and_start(&hub, vec![factory]).await;

    assert!(
        wait_until(Duration::from_secs(2), || {
            lifecycle
                .lock()
                .expect("lock")
                .contains(&LifecycleCall::Registered)
        })
        .await
    );

    let (callback, outcome) = registration_probe();
    hub.unregister_extension(A, Some(callback));
    assert_eq!(outcome.await.expect("callback"), Ok(()));

    assert!(
        wait_until(Duration::from_secs(2), || {
            lifecycle
                .lock()
                .expect("lock")
                .contains(&LifecycleCall::Unregistered)
        })
        .await
    );

    // Unregistered is distinct from registered-but-stateless.
    let state = hub
        .get_shared_state(
            SharedStateType::Standard,
            A,
            None,
            false,
            SharedStateResolution::Any,
        )
        .await;
    assert!(state.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn registered_but_stateless_reads_as_status_none() {
    let hub = EventHub::new();
    let slot = common::api_slot();
    register_and_start(&hub, vec![plain_extension(A, &slot)]).await;

    let state = hub
        .get_shared_state(
            SharedStateType::Standard,
            A,
            None,
            false,
            SharedStateResolution::Any,
        )
        .await
        .expect("extension registered");
    assert_eq!(state.status, SharedStateStatus::None);
    assert_eq!(state.value, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_stops_delivery() {
    let hub = EventHub::new();
    let recorder = Recorder::new();
    let slot = common::api_slot();

    register_and_start(
        &hub,
        vec![common::recording_extension(A, &recorder, &slot)],
    )
    .await;

    hub.dispatch(demo_event("before"));
    assert!(wait_until(Duration::from_secs(2), || recorder.len() == 1).await);

    hub.shutdown_and_wait().await.expect("shutdown");

    hub.dispatch(demo_event("after"));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(recorder.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn masked_events_are_recorded_and_queryable() {
    let hub = EventHub::new();
    register_and_start(&hub, vec![]).await;

    hub.dispatch(
        demo_event("purchase")
            .with_data(json!({"sku": "boots", "qty": 1}))
            .with_mask(vec!["sku".into()]),
    );
    hub.dispatch(demo_event("unmasked").with_data(json!({"sku": "boots"})));

    // Recording is fire-and-forget; poll until the index catches up.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let (tx, rx) = tokio::sync::oneshot::channel();
        hub.get_historical_events(
            vec![EventHistoryRequest::new(json!({"sku": "boots"}))],
            false,
            Box::new(move |n| {
                let _ = tx.send(n);
            }),
        );
        let count = rx.await.expect("handler invoked");
        if count == 1 {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "expected exactly one recorded event, last count {count}"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
