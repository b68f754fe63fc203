use routing_slip::{Activity, ActivityError, Compensation, RoutingSlip, WorkItem, WorkLog};

use crate::reservation::ReservationDesk;

/// Books a hotel room. Requires a `roomType` argument.
#[derive(Debug)]
pub struct ReserveHotelActivity {
    desk: ReservationDesk,
}

impl ReserveHotelActivity {
    pub const NAME: &'static str = "reserve_hotel";

    #[must_use]
    pub const fn new() -> Self {
        Self {
            desk: ReservationDesk::new(Self::NAME, "roomType"),
        }
    }
}

impl Default for ReserveHotelActivity {
    fn default() -> Self {
        Self::new()
    }
}

impl Activity for ReserveHotelActivity {
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
        "sb://./hotelReservations"
    }

    fn compensation_queue_address(&self) -> &str {
        "sb://./hotelCancellations"
    }

    fn compensation_description(&self) -> String {
        "cancel hotel booking".to_string()
    }
}
