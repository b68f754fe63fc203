use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::debug;

use crate::audit::{SagaAuditLog, StepStatus};
use crate::catalog::ActivityCatalog;
use crate::dispatch::HostDispatcher;
use crate::error::{DispatchError, RoutingSlipError};
use crate::host::{ActivityHost, NextHop, SagaOutcome, SlipTransport};
use crate::slip::RoutingSlip;

/// A slip in flight, addressed to a queue.
#[derive(Debug)]
pub struct Envelope {
    pub address: String,
    pub slip: RoutingSlip,
}

/// FIFO mailbox standing in for a message queue inside one process.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    queue: Mutex<VecDeque<Envelope>>,
}

impl InMemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest envelope, if any.
    pub fn receive(&self) -> Option<Envelope> {
        self.queue().pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue().is_empty()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<Envelope>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SlipTransport for InMemoryTransport {
    fn send(&self, uri: &str, slip: RoutingSlip) {
        self.queue().push_back(Envelope {
            address: uri.to_string(),
            slip,
        });
    }
}

/// How a saga run on a [`LocalBus`] ended.
#[derive(Debug)]
pub struct SagaReport {
    pub outcome: SagaOutcome,
    /// The slip as it was when the saga reached its terminal state.
    pub slip: RoutingSlip,
}

/// Hosts for every activity in a catalog, connected by an in-memory queue.
///
/// The bus only moves envelopes between hosts; all saga state lives in the
/// routing slip.
#[derive(Debug)]
pub struct LocalBus {
    catalog: Arc<ActivityCatalog>,
    transport: Arc<InMemoryTransport>,
    dispatcher: HostDispatcher,
    max_deliveries: Option<usize>,
}

impl LocalBus {
    /// Create a bus with one host per catalog entry, in name order.
    #[must_use]
    pub fn new(catalog: Arc<ActivityCatalog>) -> Self {
        let transport = Arc::new(InMemoryTransport::new());
        let mut dispatcher = HostDispatcher::new();
        for (_, activity) in catalog.iter() {
            dispatcher.push(ActivityHost::from_activity(
                Arc::clone(activity),
                Arc::clone(&catalog),
                Arc::clone(&transport) as Arc<dyn SlipTransport>,
            ));
        }

        Self {
            catalog,
            transport,
            dispatcher,
            max_deliveries: None,
        }
    }

    /// Stop a run after `limit` deliveries.
    ///
    /// Compensations that keep rescheduling failing work would otherwise loop
    /// forever.
    #[must_use]
    pub fn with_max_deliveries(mut self, limit: usize) -> Self {
        self.max_deliveries = Some(limit);
        self
    }

    /// Deliver `slip` to its first work queue and run it to a terminal state.
    ///
    /// # Errors
    ///
    /// Returns a `DispatchError` if an address is undeliverable, a host fails,
    /// or the delivery limit is exceeded.
    pub fn run(&mut self, slip: RoutingSlip) -> Result<SagaReport, DispatchError> {
        let (result, _audit_log) = self.run_internal(slip);
        result
    }

    /// Run `slip` and return both the result and an audit log of every hop.
    pub fn run_with_audit(
        &mut self,
        slip: RoutingSlip,
    ) -> (Result<SagaReport, DispatchError>, SagaAuditLog) {
        self.run_internal(slip)
    }

    fn run_internal(
        &mut self,
        slip: RoutingSlip,
    ) -> (Result<SagaReport, DispatchError>, SagaAuditLog) {
        let mut audit_log = SagaAuditLog::new();

        if slip.is_completed() {
            let report = SagaReport {
                outcome: SagaOutcome::Completed,
                slip,
            };
            return (Ok(report), audit_log);
        }
        match slip.progress_uri(&self.catalog) {
            Ok(uri) => self.transport.send(uri, slip),
            Err(source) => {
                let err = DispatchError::InvalidSlip {
                    source,
                    slip: Box::new(slip),
                };
                return (Err(err), audit_log);
            }
        }

        let mut deliveries = 0_usize;
        while let Some(Envelope { address, slip }) = self.transport.receive() {
            deliveries += 1;
            if let Some(limit) = self.max_deliveries.filter(|limit| deliveries > *limit) {
                let err = DispatchError::DeliveryLimitExceeded {
                    limit,
                    slip: Box::new(slip),
                };
                return (Err(err), audit_log);
            }

            debug!(address = %address, delivery = deliveries, "delivering routing slip");
            let started_at = Instant::now();
            match self.dispatcher.dispatch(&address, slip) {
                Ok(handled) => {
                    let description = if handled.status == StepStatus::Executed {
                        self.catalog
                            .resolve(&handled.activity)
                            .ok()
                            .map(|activity| activity.compensation_description())
                    } else {
                        None
                    };
                    audit_log.record(
                        handled.activity,
                        &address,
                        handled.status,
                        started_at,
                        description,
                    );
                    if let NextHop::Finished(outcome, slip) = handled.next {
                        return (Ok(SagaReport { outcome, slip }), audit_log);
                    }
                }
                Err(DispatchError::Host(err)) => {
                    if let RoutingSlipError::CompensationFailed { activity, .. } = &err.source {
                        audit_log.record(
                            activity.clone(),
                            &address,
                            StepStatus::CompensationFailed,
                            started_at,
                            None,
                        );
                    }
                    return (Err(DispatchError::Host(err)), audit_log);
                }
                Err(err) => return (Err(err), audit_log),
            }
        }

        (Err(DispatchError::Stalled), audit_log)
    }
}
