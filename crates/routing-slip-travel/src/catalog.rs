use routing_slip::ActivityCatalog;

use crate::car::ReserveCarActivity;
use crate::flight::{FailingReserveFlightActivity, ReserveFlightActivity};
use crate::hotel::ReserveHotelActivity;

/// Catalog holding every travel activity.
#[must_use]
pub fn travel_catalog() -> ActivityCatalog {
    ActivityCatalog::new()
        .with_activity(ReserveCarActivity::new())
        .with_activity(ReserveHotelActivity::new())
        .with_activity(ReserveFlightActivity::new())
        .with_activity(FailingReserveFlightActivity::new())
}

#[cfg(test)]
mod tests {
    use routing_slip::ActivityRef;

    use super::*;

    #[test]
    fn registers_all_travel_activities() {
        let catalog = travel_catalog();

        assert_eq!(catalog.len(), 4);
        for name in [
            ReserveCarActivity::NAME,
            ReserveHotelActivity::NAME,
            ReserveFlightActivity::NAME,
            FailingReserveFlightActivity::NAME,
        ] {
            assert!(catalog.contains(&ActivityRef::new(name)), "{name} missing");
        }
    }
}
