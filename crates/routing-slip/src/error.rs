use std::path::PathBuf;

use thiserror::Error;

use crate::slip::RoutingSlip;
use crate::work::ActivityRef;

/// Business-level failure reported by an activity.
///
/// Returned from [`Activity::do_work`](crate::Activity::do_work) it is an
/// expected outcome that turns the saga around. Returned from
/// [`Activity::compensate`](crate::Activity::compensate) it is fatal for the
/// current undo step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ActivityError {
    #[error("missing argument '{0}'")]
    MissingArgument(String),

    #[error("invalid argument '{key}': {reason}")]
    InvalidArgument { key: String, reason: String },

    #[error("{0}")]
    Rejected(String),
}

/// Misuse of a routing slip or an unresolvable activity.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RoutingSlipError {
    #[error("routing slip has no pending work item")]
    OutOfRange,

    #[error("routing slip has no completed work")]
    EmptyLog,

    #[error("routing slip is already completed")]
    AlreadyCompleted,

    #[error("routing slip has nothing to compensate")]
    NothingToCompensate,

    #[error("activity '{0}' is not registered in the catalog")]
    UnknownActivity(ActivityRef),

    #[error("routing slip delivered to '{address}' but its next step is at '{expected}'")]
    Misrouted { address: String, expected: String },

    #[error(
        "corrupt routing slip: {log} log entries, position {position}, {itinerary} itinerary items"
    )]
    CorruptDocument {
        itinerary: usize,
        position: usize,
        log: usize,
    },

    #[error("activity '{expected}' logged its work as '{actual}'")]
    ForeignWorkLog {
        expected: ActivityRef,
        actual: ActivityRef,
    },

    #[error("compensation of activity '{activity}' resumed forward without pending work")]
    NothingRescheduled { activity: ActivityRef },

    #[error("compensation failed for activity '{activity}'")]
    CompensationFailed {
        activity: ActivityRef,
        #[source]
        source: ActivityError,
    },
}

/// A host recognized an address but could not process the slip.
///
/// The slip is handed back so it can be surfaced to an operator.
#[derive(Debug, Error)]
#[error("failed to process routing slip delivered to '{address}'")]
pub struct HostError {
    pub address: String,
    #[source]
    pub source: RoutingSlipError,
    pub slip: Box<RoutingSlip>,
}

/// Failure to move a routing slip to its next hop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    #[error("no host accepts address '{address}'")]
    Undeliverable {
        address: String,
        slip: Box<RoutingSlip>,
    },

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("routing slip cannot be started")]
    InvalidSlip {
        #[source]
        source: RoutingSlipError,
        slip: Box<RoutingSlip>,
    },

    #[error("routing slip exceeded the limit of {limit} deliveries")]
    DeliveryLimitExceeded {
        limit: usize,
        slip: Box<RoutingSlip>,
    },

    #[error("transport ran dry before the saga reached a terminal state")]
    Stalled,
}

/// Failure to load an itinerary file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ItineraryError {
    #[error("failed to read itinerary '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse itinerary")]
    Parse(#[from] toml::de::Error),

    #[error("step {index} names unknown activity '{activity}'")]
    UnknownActivity { index: usize, activity: ActivityRef },
}
