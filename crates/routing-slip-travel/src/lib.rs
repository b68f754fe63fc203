//! Travel booking activities.
//!
//! A trip is booked as a saga: rent a car, book a hotel, then book a flight.
//! Itineraries list the least risky reservation first, so the step most
//! likely to fail runs last and everything before it can still be cancelled.

mod car;
mod catalog;
mod flight;
mod hotel;
mod reservation;

pub use car::ReserveCarActivity;
pub use catalog::travel_catalog;
pub use flight::{FailingReserveFlightActivity, ReserveFlightActivity};
pub use hotel::ReserveHotelActivity;
pub use reservation::RESERVATION_ID;
