//! Routing-slip sagas.
//!
//! A [`RoutingSlip`] carries the itinerary of a multi-step operation and the
//! log of the work done so far. Whichever [`ActivityHost`] receives it runs
//! one step forward, or compensates one step backward, and sends it on.
//! There is no coordinator: every decision is computed from the slip itself
//! and the activities' declared queue addresses.

mod activity;
mod audit;
mod bus;
mod catalog;
mod dispatch;
mod error;
mod host;
mod itinerary;
mod payload;
mod slip;
mod work;

pub use activity::{Activity, Compensation};
pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use bus::{Envelope, InMemoryTransport, LocalBus, SagaReport};
pub use catalog::ActivityCatalog;
pub use dispatch::HostDispatcher;
pub use error::{ActivityError, DispatchError, HostError, ItineraryError, RoutingSlipError};
pub use host::{Acceptance, ActivityHost, Handled, NextHop, SagaOutcome, SlipTransport};
pub use itinerary::{Itinerary, ItineraryStep};
pub use payload::{WorkItemArguments, WorkResult};
pub use slip::RoutingSlip;
pub use work::{ActivityRef, WorkItem, WorkLog};
