//! Integration tests for running sagas end to end on the in-process bus.

mod common;

use std::sync::Arc;

use common::{
    CompensationScript, Journal, ScriptedActivity, catalog, compensation_queue, item, work_queue,
};
use routing_slip::{
    ActivityHost, ActivityRef, DispatchError, HostDispatcher, InMemoryTransport, LocalBus,
    RoutingSlip, RoutingSlipError, SagaOutcome, SlipTransport, StepStatus,
};

#[test]
fn successful_saga_completes_with_all_work_logged() -> anyhow::Result<()> {
    let journal = Journal::default();
    let mut bus = LocalBus::new(Arc::new(catalog([
        ScriptedActivity::new("car", &journal),
        ScriptedActivity::new("hotel", &journal),
        ScriptedActivity::new("flight", &journal),
    ])));

    let (result, audit_log) =
        bus.run_with_audit(RoutingSlip::new([item("car"), item("hotel"), item("flight")]));

    let report = result?;
    assert_eq!(report.outcome, SagaOutcome::Completed);
    assert_eq!(report.slip.completed_work_logs().len(), 3);
    assert_eq!(
        audit_log.statuses(),
        [StepStatus::Executed, StepStatus::Executed, StepStatus::Executed]
    );
    assert_eq!(
        audit_log.records()[0].compensation_description.as_deref(),
        Some("undo car")
    );
    assert_eq!(journal.entries(), ["do car", "do hotel", "do flight"]);
    Ok(())
}

#[test]
fn failing_step_compensates_everything_before_it() -> anyhow::Result<()> {
    let journal = Journal::default();
    let mut bus = LocalBus::new(Arc::new(catalog([
        ScriptedActivity::new("car", &journal),
        ScriptedActivity::new("hotel", &journal),
        ScriptedActivity::new("flight", &journal).failing(),
    ])));

    let (result, audit_log) =
        bus.run_with_audit(RoutingSlip::new([item("car"), item("hotel"), item("flight")]));

    let report = result?;
    assert_eq!(report.outcome, SagaOutcome::Compensated);
    assert!(!report.slip.is_in_progress());
    assert_eq!(
        journal.entries(),
        ["do car", "do hotel", "fail flight", "undo hotel", "undo car"]
    );
    assert_eq!(
        audit_log.statuses(),
        [
            StepStatus::Executed,
            StepStatus::Executed,
            StepStatus::Failed,
            StepStatus::Compensated,
            StepStatus::Compensated,
        ]
    );
    let addresses: Vec<&str> = audit_log
        .records()
        .iter()
        .map(|record| record.address.as_str())
        .collect();
    assert_eq!(
        addresses,
        [
            work_queue("car"),
            work_queue("hotel"),
            work_queue("flight"),
            compensation_queue("hotel"),
            compensation_queue("car"),
        ]
    );
    Ok(())
}

#[test]
fn first_step_failure_aborts() -> anyhow::Result<()> {
    let journal = Journal::default();
    let mut bus = LocalBus::new(Arc::new(catalog([
        ScriptedActivity::new("car", &journal).failing(),
        ScriptedActivity::new("hotel", &journal),
    ])));

    let report = bus.run(RoutingSlip::new([item("car"), item("hotel")]))?;

    assert_eq!(report.outcome, SagaOutcome::Aborted);
    assert_eq!(report.slip.pending_work_items().len(), 2);
    assert_eq!(journal.entries(), ["fail car"]);
    Ok(())
}

#[test]
fn compensation_can_reroute_the_saga_forward() -> anyhow::Result<()> {
    let journal = Journal::default();
    let mut bus = LocalBus::new(Arc::new(catalog([
        ScriptedActivity::new("car", &journal),
        ScriptedActivity::new("hotel", &journal)
            .compensating(CompensationScript::Replace(vec![item("train")])),
        ScriptedActivity::new("flight", &journal).failing(),
        ScriptedActivity::new("train", &journal),
    ])));

    let (result, audit_log) =
        bus.run_with_audit(RoutingSlip::new([item("car"), item("hotel"), item("flight")]));

    let report = result?;
    assert_eq!(report.outcome, SagaOutcome::Completed);
    assert_eq!(
        journal.entries(),
        ["do car", "do hotel", "fail flight", "replace hotel", "do train"]
    );
    assert_eq!(
        audit_log.statuses(),
        [
            StepStatus::Executed,
            StepStatus::Executed,
            StepStatus::Failed,
            StepStatus::Rescheduled,
            StepStatus::Executed,
        ]
    );
    let logged: Vec<&str> = report
        .slip
        .completed_work_logs()
        .iter()
        .map(|log| log.activity().as_str())
        .collect();
    assert_eq!(logged, ["car", "train"]);
    Ok(())
}

#[test]
fn compensation_failure_stops_the_saga_and_is_audited() {
    let journal = Journal::default();
    let mut bus = LocalBus::new(Arc::new(catalog([
        ScriptedActivity::new("car", &journal),
        ScriptedActivity::new("hotel", &journal).compensating(CompensationScript::Fail),
        ScriptedActivity::new("flight", &journal).failing(),
    ])));

    let (result, audit_log) =
        bus.run_with_audit(RoutingSlip::new([item("car"), item("hotel"), item("flight")]));

    let host_error = match result.expect_err("hotel cannot be undone") {
        DispatchError::Host(host_error) => host_error,
        other => panic!("expected a host error, got {other:?}"),
    };
    assert_eq!(host_error.address, compensation_queue("hotel"));
    assert!(matches!(
        host_error.source,
        RoutingSlipError::CompensationFailed { ref activity, .. } if activity.as_str() == "hotel"
    ));
    assert_eq!(host_error.slip.completed_work_logs().len(), 2);
    assert_eq!(
        audit_log.statuses().last(),
        Some(&StepStatus::CompensationFailed)
    );
    assert_eq!(journal.entries(), ["do car", "do hotel", "fail flight", "stuck hotel"]);
}

#[test]
fn endless_rescheduling_hits_the_delivery_limit() {
    let journal = Journal::default();
    let mut bus = LocalBus::new(Arc::new(catalog([
        ScriptedActivity::new("car", &journal).compensating(CompensationScript::Replace(vec![
            item("car"),
            item("flight"),
        ])),
        ScriptedActivity::new("flight", &journal).failing(),
    ])))
    .with_max_deliveries(10);

    let err = bus
        .run(RoutingSlip::new([item("car"), item("flight")]))
        .expect_err("flight keeps failing");

    assert!(matches!(
        err,
        DispatchError::DeliveryLimitExceeded { limit: 10, .. }
    ));
}

#[test]
fn address_without_host_is_undeliverable() {
    let journal = Journal::default();
    let catalog = Arc::new(catalog([
        ScriptedActivity::new("car", &journal),
        ScriptedActivity::new("hotel", &journal),
    ]));
    let transport: Arc<dyn SlipTransport> = Arc::new(InMemoryTransport::new());
    let dispatcher = HostDispatcher::new().with_host(
        ActivityHost::new(&ActivityRef::new("car"), Arc::clone(&catalog), transport)
            .expect("car is registered"),
    );
    let slip = RoutingSlip::new([item("hotel")]);

    let err = dispatcher
        .dispatch(&work_queue("hotel"), slip.clone())
        .expect_err("only car is hosted");

    match err {
        DispatchError::Undeliverable {
            address,
            slip: returned,
        } => {
            assert_eq!(address, work_queue("hotel"));
            assert_eq!(*returned, slip);
        }
        other => panic!("expected Undeliverable, got {other:?}"),
    }
    assert_eq!(dispatcher.len(), 1);
}

#[test]
fn dispatcher_offers_slip_to_hosts_in_order() -> anyhow::Result<()> {
    let journal = Journal::default();
    let catalog = Arc::new(catalog([
        ScriptedActivity::new("car", &journal),
        ScriptedActivity::new("hotel", &journal),
    ]));
    let transport = Arc::new(InMemoryTransport::new());
    let dispatcher = ["car", "hotel"]
        .into_iter()
        .try_fold(HostDispatcher::new(), |dispatcher, name| {
            ActivityHost::new(
                &ActivityRef::new(name),
                Arc::clone(&catalog),
                Arc::clone(&transport) as Arc<dyn SlipTransport>,
            )
            .map(|host| dispatcher.with_host(host))
        })?;
    let mut slip = RoutingSlip::new([item("car"), item("hotel")]);
    slip.process_next(&catalog)?;

    let handled = dispatcher.dispatch(&work_queue("hotel"), slip)?;

    assert_eq!(handled.activity.as_str(), "hotel");
    assert_eq!(handled.status, StepStatus::Executed);
    assert!(transport.is_empty());
    Ok(())
}
