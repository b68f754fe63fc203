use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::activity::{Activity, Compensation};
use crate::audit::StepStatus;
use crate::catalog::ActivityCatalog;
use crate::error::{HostError, RoutingSlipError};
use crate::slip::RoutingSlip;
use crate::work::ActivityRef;

/// Delivers a routing slip to an address.
///
/// Resolving the address to a destination (local hosts, a queue, a remote
/// node) is the transport's business. Delivery of one slip must reach at most
/// one host at a time; the core does no locking of its own.
pub trait SlipTransport: Send + Sync {
    fn send(&self, uri: &str, slip: RoutingSlip);
}

impl<F> SlipTransport for F
where
    F: Fn(&str, RoutingSlip) + Send + Sync,
{
    fn send(&self, uri: &str, slip: RoutingSlip) {
        self(uri, slip);
    }
}

/// Terminal state of a saga.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaOutcome {
    /// Every work item was done.
    Completed,
    /// Work failed and everything done before it was compensated.
    Compensated,
    /// The first pending work item failed; nothing needed compensation.
    Aborted,
}

impl fmt::Display for SagaOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Completed => "completed",
            Self::Compensated => "compensated",
            Self::Aborted => "aborted",
        })
    }
}

/// Where a handled slip went.
#[derive(Debug)]
pub enum NextHop {
    /// Delivered onward to this address.
    Sent(String),
    /// The saga ended here; the final slip is handed back.
    Finished(SagaOutcome, RoutingSlip),
}

/// One step a host performed on a slip.
#[derive(Debug)]
pub struct Handled {
    /// Address the slip was delivered to.
    pub address: String,
    /// Activity of the work item or log entry that was processed.
    pub activity: ActivityRef,
    pub status: StepStatus,
    pub next: NextHop,
}

/// Result of offering a slip to a host.
#[derive(Debug)]
#[must_use]
pub enum Acceptance {
    /// The address is not this host's; the slip is handed back untouched.
    Declined(RoutingSlip),
    Handled(Handled),
}

impl Acceptance {
    #[must_use]
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

/// Processes routing slips addressed to one activity's queues.
///
/// A host owns no saga state between calls: what it does is decided by the
/// address and the slip alone.
pub struct ActivityHost {
    activity: Arc<dyn Activity>,
    catalog: Arc<ActivityCatalog>,
    transport: Arc<dyn SlipTransport>,
}

impl ActivityHost {
    /// # Errors
    ///
    /// Returns `RoutingSlipError::UnknownActivity` if `activity` is not in
    /// `catalog`.
    pub fn new(
        activity: &ActivityRef,
        catalog: Arc<ActivityCatalog>,
        transport: Arc<dyn SlipTransport>,
    ) -> Result<Self, RoutingSlipError> {
        let activity = Arc::clone(catalog.resolve(activity)?);
        Ok(Self::from_activity(activity, catalog, transport))
    }

    /// Host an activity that is already resolved.
    ///
    /// `catalog` must still cover every activity the slips it receives name.
    #[must_use]
    pub fn from_activity(
        activity: Arc<dyn Activity>,
        catalog: Arc<ActivityCatalog>,
        transport: Arc<dyn SlipTransport>,
    ) -> Self {
        Self {
            activity,
            catalog,
            transport,
        }
    }

    #[must_use]
    pub fn activity_name(&self) -> &'static str {
        self.activity.name()
    }

    /// Process `slip` if `uri` is one of this host's addresses.
    ///
    /// A forward message runs the next work item; on success the slip goes
    /// to the next work queue, on failure to the last compensation queue. A
    /// backward message compensates the last log entry; the slip then keeps
    /// unwinding, or returns to the work queue if the compensation added work.
    ///
    /// # Errors
    ///
    /// Returns a `HostError` carrying the slip if the address matched but the
    /// slip could not be processed.
    pub fn accept_message(&self, uri: &str, slip: RoutingSlip) -> Result<Acceptance, HostError> {
        if uri == self.activity.compensation_queue_address() {
            return self.process_backward_message(uri, slip).map(Acceptance::Handled);
        }
        if uri == self.activity.work_item_queue_address() {
            return self.process_forward_message(uri, slip).map(Acceptance::Handled);
        }
        Ok(Acceptance::Declined(slip))
    }

    fn process_forward_message(
        &self,
        address: &str,
        mut slip: RoutingSlip,
    ) -> Result<Handled, HostError> {
        match self.step_forward(address, &mut slip) {
            Ok((activity, status)) => Ok(Handled {
                address: address.to_string(),
                activity,
                status,
                next: self.route(address, status, slip)?,
            }),
            Err(source) => Err(failure(address, source, slip)),
        }
    }

    fn process_backward_message(
        &self,
        address: &str,
        mut slip: RoutingSlip,
    ) -> Result<Handled, HostError> {
        match self.step_backward(address, &mut slip) {
            Ok((activity, status)) => Ok(Handled {
                address: address.to_string(),
                activity,
                status,
                next: self.route(address, status, slip)?,
            }),
            Err(source) => Err(failure(address, source, slip)),
        }
    }

    fn step_forward(
        &self,
        address: &str,
        slip: &mut RoutingSlip,
    ) -> Result<(ActivityRef, StepStatus), RoutingSlipError> {
        let activity = slip
            .next_work_item()
            .ok_or(RoutingSlipError::AlreadyCompleted)?
            .activity()
            .clone();
        check_address(address, slip.progress_uri(&self.catalog)?)?;

        let status = if slip.process_next(&self.catalog)? {
            StepStatus::Executed
        } else {
            StepStatus::Failed
        };
        Ok((activity, status))
    }

    fn step_backward(
        &self,
        address: &str,
        slip: &mut RoutingSlip,
    ) -> Result<(ActivityRef, StepStatus), RoutingSlipError> {
        let activity = slip
            .last_work_log()
            .ok_or(RoutingSlipError::NothingToCompensate)?
            .activity()
            .clone();
        check_address(address, slip.compensation_uri(&self.catalog)?)?;

        let status = match slip.undo_last(&self.catalog)? {
            Compensation::Undone => StepStatus::Compensated,
            Compensation::ResumeForward => StepStatus::Rescheduled,
        };
        Ok((activity, status))
    }

    fn route(
        &self,
        address: &str,
        status: StepStatus,
        slip: RoutingSlip,
    ) -> Result<NextHop, HostError> {
        let forward = matches!(status, StepStatus::Executed | StepStatus::Rescheduled);
        let target = if forward {
            // Only executed work can finish a saga; a rescheduled slip must
            // have pending work or the host reports `OutOfRange`.
            if status == StepStatus::Executed && slip.is_completed() {
                info!("saga completed");
                return Ok(NextHop::Finished(SagaOutcome::Completed, slip));
            }
            slip.progress_uri(&self.catalog)
        } else {
            if !slip.is_in_progress() {
                let outcome = if status == StepStatus::Failed {
                    SagaOutcome::Aborted
                } else {
                    SagaOutcome::Compensated
                };
                warn!(?outcome, "saga ended without completing");
                return Ok(NextHop::Finished(outcome, slip));
            }
            slip.compensation_uri(&self.catalog)
        };

        match target {
            Ok(uri) => {
                debug!(from = address, to = uri, "sending routing slip");
                self.transport.send(uri, slip);
                Ok(NextHop::Sent(uri.to_string()))
            }
            Err(source) => Err(failure(address, source, slip)),
        }
    }
}

impl fmt::Debug for ActivityHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityHost")
            .field("activity", &self.activity.name())
            .field("work_queue", &self.activity.work_item_queue_address())
            .field(
                "compensation_queue",
                &self.activity.compensation_queue_address(),
            )
            .finish_non_exhaustive()
    }
}

fn check_address(address: &str, expected: &str) -> Result<(), RoutingSlipError> {
    if address == expected {
        Ok(())
    } else {
        Err(RoutingSlipError::Misrouted {
            address: address.to_string(),
            expected: expected.to_string(),
        })
    }
}

fn failure(address: &str, source: RoutingSlipError, slip: RoutingSlip) -> HostError {
    HostError {
        address: address.to_string(),
        source,
        slip: Box::new(slip),
    }
}
