use std::time::Instant;

use crate::work::ActivityRef;

/// What happened when a routing slip was delivered to a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    /// Forward work succeeded.
    Executed,
    /// Forward work failed; the saga turned backward.
    Failed,
    /// Work was compensated; unwinding continues backward.
    Compensated,
    /// Compensation added new work; the saga resumed forward.
    Rescheduled,
    /// Compensation failed; the saga is stuck.
    CompensationFailed,
}

impl StepStatus {
    fn symbol(self) -> &'static str {
        match self {
            Self::Executed => "✓",
            Self::Failed => "✗",
            Self::Compensated => "↩",
            Self::Rescheduled => "↻",
            Self::CompensationFailed => "⚠",
        }
    }
}

/// Record of one delivery of a routing slip.
#[derive(Debug)]
pub struct StepRecord {
    /// Activity whose work or compensation ran.
    pub activity: ActivityRef,
    /// Address the slip was delivered to.
    pub address: String,
    pub status: StepStatus,
    /// When the delivery was handed to the dispatcher.
    pub started_at: Instant,
    /// When the host finished with it.
    pub completed_at: Instant,
    /// Description of compensation, for executed work.
    pub compensation_description: Option<String>,
}

/// Audit log of every hop a routing slip made on a bus.
#[derive(Debug, Default)]
pub struct SagaAuditLog {
    records: Vec<StepRecord>,
}

impl SagaAuditLog {
    /// Create a new empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(
        &mut self,
        activity: ActivityRef,
        address: &str,
        status: StepStatus,
        started_at: Instant,
        compensation_description: Option<String>,
    ) {
        self.records.push(StepRecord {
            activity,
            address: address.to_string(),
            status,
            started_at,
            completed_at: Instant::now(),
            compensation_description,
        });
    }

    /// Get all records in the audit log.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Statuses in delivery order.
    #[must_use]
    pub fn statuses(&self) -> Vec<StepStatus> {
        self.records.iter().map(|record| record.status).collect()
    }

    /// Get a summary of the saga execution for display.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for record in &self.records {
            lines.push(format!(
                "{} {} ({})",
                record.status.symbol(),
                record.activity,
                record.address
            ));
        }
        lines.join("\n")
    }
}
