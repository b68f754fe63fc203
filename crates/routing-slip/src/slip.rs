use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::activity::Compensation;
use crate::catalog::ActivityCatalog;
use crate::error::RoutingSlipError;
use crate::work::{WorkItem, WorkLog};

/// The document that travels through a saga.
///
/// It carries the itinerary of work, the log of completed-and-not-yet
/// compensated work, and everything a receiving node needs to decide
/// locally whether to step forward or backward. Activities are resolved
/// through an [`ActivityCatalog`] passed into each operation, so the slip
/// itself stays plain serializable data.
///
/// Invariant: `completed_work_logs().len() <= position <= itinerary().len()`,
/// where `position` indexes the next pending work item. The position only
/// advances on successful forward work; compensation pops the log but leaves
/// the position alone, so newly added work is picked up next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SlipDocument")]
pub struct RoutingSlip {
    itinerary: Vec<WorkItem>,
    position: usize,
    log: Vec<WorkLog>,
}

#[derive(Deserialize)]
struct SlipDocument {
    itinerary: Vec<WorkItem>,
    #[serde(default)]
    position: usize,
    #[serde(default)]
    log: Vec<WorkLog>,
}

impl TryFrom<SlipDocument> for RoutingSlip {
    type Error = RoutingSlipError;

    fn try_from(doc: SlipDocument) -> Result<Self, Self::Error> {
        if doc.log.len() > doc.position || doc.position > doc.itinerary.len() {
            return Err(RoutingSlipError::CorruptDocument {
                itinerary: doc.itinerary.len(),
                position: doc.position,
                log: doc.log.len(),
            });
        }
        Ok(Self {
            itinerary: doc.itinerary,
            position: doc.position,
            log: doc.log,
        })
    }
}

impl RoutingSlip {
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = WorkItem>) -> Self {
        Self {
            itinerary: items.into_iter().collect(),
            position: 0,
            log: Vec::new(),
        }
    }

    /// `true` when no pending work item remains.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.position >= self.itinerary.len()
    }

    /// `true` when there is completed work eligible for compensation.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        !self.log.is_empty()
    }

    /// Work-queue address of the activity owning the next pending item.
    ///
    /// # Errors
    ///
    /// Returns `RoutingSlipError::OutOfRange` if the slip is completed, or
    /// `UnknownActivity` if the catalog cannot resolve the item.
    pub fn progress_uri<'c>(
        &self,
        catalog: &'c ActivityCatalog,
    ) -> Result<&'c str, RoutingSlipError> {
        let item = self.next_work_item().ok_or(RoutingSlipError::OutOfRange)?;
        Ok(catalog.resolve(item.activity())?.work_item_queue_address())
    }

    /// Compensation-queue address of the activity owning the last log entry.
    ///
    /// # Errors
    ///
    /// Returns `RoutingSlipError::EmptyLog` if nothing has been completed, or
    /// `UnknownActivity` if the catalog cannot resolve the entry.
    pub fn compensation_uri<'c>(
        &self,
        catalog: &'c ActivityCatalog,
    ) -> Result<&'c str, RoutingSlipError> {
        let log = self.last_work_log().ok_or(RoutingSlipError::EmptyLog)?;
        Ok(catalog.resolve(log.activity())?.compensation_queue_address())
    }

    /// Run the next pending work item.
    ///
    /// Returns `Ok(true)` when the work succeeded and was logged. Returns
    /// `Ok(false)` when the activity reported a failure; the slip is left
    /// unchanged and the caller should start compensating.
    ///
    /// # Errors
    ///
    /// Returns `RoutingSlipError::AlreadyCompleted` if nothing is pending,
    /// `UnknownActivity` if the catalog cannot resolve the item, or
    /// `ForeignWorkLog` if the activity logged its work under another name.
    /// The slip is unchanged in every error case.
    pub fn process_next(&mut self, catalog: &ActivityCatalog) -> Result<bool, RoutingSlipError> {
        let item = self
            .itinerary
            .get(self.position)
            .ok_or(RoutingSlipError::AlreadyCompleted)?;
        let activity = catalog.resolve(item.activity())?;

        match activity.do_work(item) {
            Ok(log) if log.activity() != item.activity() => {
                error!(
                    activity = %item.activity(),
                    logged = %log.activity(),
                    "work logged under another activity"
                );
                Err(RoutingSlipError::ForeignWorkLog {
                    expected: item.activity().clone(),
                    actual: log.activity().clone(),
                })
            }
            Ok(log) => {
                debug!(activity = %item.activity(), "work item completed");
                self.log.push(log);
                self.position += 1;
                Ok(true)
            }
            Err(error) => {
                warn!(activity = %item.activity(), %error, "work item failed");
                Ok(false)
            }
        }
    }

    /// Compensate the most recently completed work.
    ///
    /// The log entry is removed before the activity's compensation runs, so
    /// the activity sees the slip as it will continue from.
    ///
    /// # Errors
    ///
    /// Returns `RoutingSlipError::NothingToCompensate` if the log is empty,
    /// `UnknownActivity` if the catalog cannot resolve the entry,
    /// `CompensationFailed` if the activity could not undo its work, or
    /// `NothingRescheduled` if it asked to resume forward without leaving any
    /// pending work. In the last two cases the slip is restored to its state
    /// before the call, discarding whatever the compensation changed.
    pub fn undo_last(
        &mut self,
        catalog: &ActivityCatalog,
    ) -> Result<Compensation, RoutingSlipError> {
        let last = self
            .last_work_log()
            .ok_or(RoutingSlipError::NothingToCompensate)?;
        let activity = catalog.resolve(last.activity())?;
        let itinerary = self.itinerary.clone();
        let position = self.position;
        let log = self
            .log
            .pop()
            .ok_or(RoutingSlipError::NothingToCompensate)?;

        let result = match activity.compensate(&log, self) {
            Ok(Compensation::ResumeForward) if self.is_completed() => {
                error!(
                    activity = %log.activity(),
                    "compensation resumed forward without pending work"
                );
                Err(RoutingSlipError::NothingRescheduled {
                    activity: log.activity().clone(),
                })
            }
            Ok(outcome) => {
                debug!(activity = %log.activity(), ?outcome, "work compensated");
                return Ok(outcome);
            }
            Err(source) => {
                error!(activity = %log.activity(), error = %source, "compensation failed");
                Err(RoutingSlipError::CompensationFailed {
                    activity: log.activity().clone(),
                    source,
                })
            }
        };

        self.itinerary = itinerary;
        self.position = position;
        self.log.push(log);
        result
    }

    /// Append work to the end of the itinerary.
    pub fn add_work_item(&mut self, item: WorkItem) {
        self.itinerary.push(item);
    }

    /// Drop the next pending work item without running it.
    ///
    /// Lets a compensation replace a failed step instead of retrying it.
    pub fn discard_next_work_item(&mut self) -> Option<WorkItem> {
        if self.is_completed() {
            return None;
        }
        Some(self.itinerary.remove(self.position))
    }

    /// Every work item ever scheduled, completed ones included.
    #[must_use]
    pub fn itinerary(&self) -> &[WorkItem] {
        &self.itinerary
    }

    #[must_use]
    pub fn pending_work_items(&self) -> &[WorkItem] {
        self.itinerary.get(self.position..).unwrap_or(&[])
    }

    #[must_use]
    pub fn completed_work_logs(&self) -> &[WorkLog] {
        &self.log
    }

    #[must_use]
    pub fn next_work_item(&self) -> Option<&WorkItem> {
        self.itinerary.get(self.position)
    }

    #[must_use]
    pub fn last_work_log(&self) -> Option<&WorkLog> {
        self.log.last()
    }
}
