use crate::error::ActivityError;
use crate::slip::RoutingSlip;
use crate::work::{WorkItem, WorkLog};

/// What a compensation achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    /// The effect was fully undone; keep unwinding backward.
    Undone,
    /// The effect could not simply be undone. New forward work was added to
    /// the routing slip; resume forward processing.
    ResumeForward,
}

impl Compensation {
    /// `true` when unwinding should continue backward.
    #[must_use]
    pub fn continues_backward(self) -> bool {
        matches!(self, Self::Undone)
    }
}

/// A business capability with a forward operation and its compensation.
///
/// Activities are referenced from routing slips by [`name`](Self::name) and
/// resolved through an [`ActivityCatalog`](crate::ActivityCatalog), never
/// held inside the slip.
///
/// Transports may redeliver a slip, so `do_work` must be safe to retry or
/// guarantee idempotence internally.
pub trait Activity: Send + Sync {
    /// Stable identifier, used as the catalog key and in work items and logs.
    fn name(&self) -> &'static str;

    /// Perform the forward business effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the work could not be done. This is an expected
    /// outcome that sends the saga down its backward path.
    fn do_work(&self, item: &WorkItem) -> Result<WorkLog, ActivityError>;

    /// Reverse the effect recorded in `log`.
    ///
    /// The log entry has already been removed from `slip`. Returning
    /// [`Compensation::ResumeForward`] requires adding new work to `slip`.
    ///
    /// # Errors
    ///
    /// Returns an error if the effect could not be reversed. There is no safe
    /// default after that, so the saga stops and is surfaced.
    fn compensate(&self, log: &WorkLog, slip: &mut RoutingSlip)
    -> Result<Compensation, ActivityError>;

    /// Address where forward messages for this activity are delivered.
    fn work_item_queue_address(&self) -> &str;

    /// Address where compensation messages for this activity are delivered.
    fn compensation_queue_address(&self) -> &str;

    /// Human-readable description of what compensation will do.
    fn compensation_description(&self) -> String {
        format!("undo {}", self.name())
    }
}
