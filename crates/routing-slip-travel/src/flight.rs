use routing_slip::{Activity, ActivityError, Compensation, RoutingSlip, WorkItem, WorkLog};
use tracing::warn;

use crate::reservation::ReservationDesk;

const WORK_QUEUE: &str = "sb://./flightReservations";
const COMPENSATION_QUEUE: &str = "sb://./flightCancellations";

/// Books a flight. Requires a `destination` argument.
///
/// Flights carry the strictest refund policies, so itineraries book them
/// last.
#[derive(Debug)]
pub struct ReserveFlightActivity {
    desk: ReservationDesk,
}

impl ReserveFlightActivity {
    pub const NAME: &'static str = "reserve_flight";

    #[must_use]
    pub const fn new() -> Self {
        Self {
            desk: ReservationDesk::new(Self::NAME, "destination"),
        }
    }
}

impl Default for ReserveFlightActivity {
    fn default() -> Self {
        Self::new()
    }
}

impl Activity for ReserveFlightActivity {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn do_work(&self, item: &WorkItem) -> Result<WorkLog, ActivityError> {
        self.desk.reserve(item)
    }

    fn compensate(
        &self,
        log: &WorkLog,
        _slip: &mut RoutingSlip,
    ) -> Result<Compensation, ActivityError> {
        self.desk.cancel(log)?;
        Ok(Compensation::Undone)
    }

    fn work_item_queue_address(&self) -> &str {
        WORK_QUEUE
    }

    fn compensation_queue_address(&self) -> &str {
        COMPENSATION_QUEUE
    }

    fn compensation_description(&self) -> String {
        "cancel flight".to_string()
    }
}

/// A flight booking that never succeeds.
///
/// Shares the flight queues, so a trip using it exercises the full
/// compensation path.
#[derive(Debug, Default)]
pub struct FailingReserveFlightActivity {
    flight: ReserveFlightActivity,
}

impl FailingReserveFlightActivity {
    pub const NAME: &'static str = "failing_reserve_flight";

    #[must_use]
    pub const fn new() -> Self {
        Self {
            flight: ReserveFlightActivity::new(),
        }
    }
}

impl Activity for FailingReserveFlightActivity {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn do_work(&self, item: &WorkItem) -> Result<WorkLog, ActivityError> {
        let destination = item.arguments().require_str("destination")?;
        warn!(destination, "no seats available");
        Err(ActivityError::Rejected(format!(
            "no seats available to {destination}"
        )))
    }

    fn compensate(
        &self,
        log: &WorkLog,
        slip: &mut RoutingSlip,
    ) -> Result<Compensation, ActivityError> {
        self.flight.compensate(log, slip)
    }

    fn work_item_queue_address(&self) -> &str {
        WORK_QUEUE
    }

    fn compensation_queue_address(&self) -> &str {
        COMPENSATION_QUEUE
    }

    fn compensation_description(&self) -> String {
        self.flight.compensation_description()
    }
}
