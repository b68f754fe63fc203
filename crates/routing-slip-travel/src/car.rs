use routing_slip::{Activity, ActivityError, Compensation, RoutingSlip, WorkItem, WorkLog};

use crate::reservation::ReservationDesk;

/// Rents a car. Requires a `vehicleType` argument.
///
/// Car rentals are cheap to cancel, which makes this the natural first step
/// of a trip.
#[derive(Debug)]
pub struct ReserveCarActivity {
    desk: ReservationDesk,
}

impl ReserveCarActivity {
    pub const NAME: &'static str = "reserve_car";

    #[must_use]
    pub const fn new() -> Self {
        Self {
            desk: ReservationDesk::new(Self::NAME, "vehicleType"),
        }
    }
}

impl Default for ReserveCarActivity {
    fn default() -> Self {
        Self::new()
    }
}

impl Activity for ReserveCarActivity {
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
        "sb://./carReservations"
    }

    fn compensation_queue_address(&self) -> &str {
        "sb://./carCancellations"
    }

    fn compensation_description(&self) -> String {
        "cancel car rental".to_string()
    }
}
