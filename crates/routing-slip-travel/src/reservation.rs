use std::sync::atomic::{AtomicU64, Ordering};

use routing_slip::{ActivityError, WorkItem, WorkLog, WorkResult};
use tracing::info;

/// Result key holding the reservation number a cancellation needs.
pub const RESERVATION_ID: &str = "reservationId";

/// Books and cancels one kind of reservation.
///
/// Numbers are handed out sequentially per desk, starting at 1.
#[derive(Debug)]
pub(crate) struct ReservationDesk {
    activity: &'static str,
    argument: &'static str,
    next_id: AtomicU64,
}

impl ReservationDesk {
    pub(crate) const fn new(activity: &'static str, argument: &'static str) -> Self {
        Self {
            activity,
            argument,
            next_id: AtomicU64::new(1),
        }
    }

    pub(crate) fn reserve(&self, item: &WorkItem) -> Result<WorkLog, ActivityError> {
        let requested = item.arguments().require_str(self.argument)?;
        let reservation_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        info!(
            activity = self.activity,
            reservation_id,
            "reserved {} '{requested}'",
            self.argument
        );
        Ok(WorkLog::new(
            self.activity,
            WorkResult::new().with(RESERVATION_ID, reservation_id),
        ))
    }

    pub(crate) fn cancel(&self, log: &WorkLog) -> Result<u64, ActivityError> {
        let reservation_id = log.result().require_u64(RESERVATION_ID)?;
        info!(activity = self.activity, reservation_id, "cancelled reservation");
        Ok(reservation_id)
    }
}
