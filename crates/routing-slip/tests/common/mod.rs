#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use routing_slip::{
    Activity, ActivityCatalog, ActivityError, Compensation, RoutingSlip, WorkItem,
    WorkItemArguments, WorkLog, WorkResult,
};

/// Shared record of what scripted activities did, in order.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: String) {
        self.0.lock().expect("journal lock").push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().expect("journal lock").clone()
    }
}

/// How a scripted activity behaves when compensated.
#[derive(Clone)]
pub enum CompensationScript {
    Undo,
    /// Append the items and resume forward.
    Reschedule(Vec<WorkItem>),
    /// Drop the pending head, append the items and resume forward.
    Replace(Vec<WorkItem>),
    Fail,
    /// Append the items, then report failure.
    RescheduleThenFail(Vec<WorkItem>),
}

pub struct ScriptedActivity {
    name: &'static str,
    work_queue: String,
    compensation_queue: String,
    fail_work: bool,
    logged_as: &'static str,
    compensation: CompensationScript,
    journal: Journal,
}

impl ScriptedActivity {
    pub fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            work_queue: work_queue(name),
            compensation_queue: compensation_queue(name),
            fail_work: false,
            logged_as: name,
            compensation: CompensationScript::Undo,
            journal: journal.clone(),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail_work = true;
        self
    }

    /// Log completed work under another activity's name.
    pub fn logging_as(mut self, name: &'static str) -> Self {
        self.logged_as = name;
        self
    }

    pub fn compensating(mut self, script: CompensationScript) -> Self {
        self.compensation = script;
        self
    }
}

impl Activity for ScriptedActivity {
    fn name(&self) -> &'static str {
        self.name
    }

    fn do_work(&self, item: &WorkItem) -> Result<WorkLog, ActivityError> {
        if self.fail_work {
            self.journal.push(format!("fail {}", self.name));
            return Err(ActivityError::Rejected(format!("{} refused", self.name)));
        }
        self.journal.push(format!("do {}", self.name));
        let mut result = WorkResult::new().with("activity", self.name);
        if let Some(tag) = item.arguments().get("tag") {
            result = result.with("tag", tag.clone());
        }
        Ok(WorkLog::new(self.logged_as, result))
    }

    fn compensate(
        &self,
        _log: &WorkLog,
        slip: &mut RoutingSlip,
    ) -> Result<Compensation, ActivityError> {
        match &self.compensation {
            CompensationScript::Undo => {
                self.journal.push(format!("undo {}", self.name));
                Ok(Compensation::Undone)
            }
            CompensationScript::Reschedule(items) => {
                self.journal.push(format!("reschedule {}", self.name));
                for item in items {
                    slip.add_work_item(item.clone());
                }
                Ok(Compensation::ResumeForward)
            }
            CompensationScript::Replace(items) => {
                self.journal.push(format!("replace {}", self.name));
                slip.discard_next_work_item();
                for item in items {
                    slip.add_work_item(item.clone());
                }
                Ok(Compensation::ResumeForward)
            }
            CompensationScript::Fail => {
                self.journal.push(format!("stuck {}", self.name));
                Err(ActivityError::Rejected(format!("{} cannot be undone", self.name)))
            }
            CompensationScript::RescheduleThenFail(items) => {
                self.journal.push(format!("stuck {}", self.name));
                for item in items {
                    slip.add_work_item(item.clone());
                }
                Err(ActivityError::Rejected(format!("{} cannot be undone", self.name)))
            }
        }
    }

    fn work_item_queue_address(&self) -> &str {
        &self.work_queue
    }

    fn compensation_queue_address(&self) -> &str {
        &self.compensation_queue
    }
}

pub fn work_queue(name: &str) -> String {
    format!("mem://{name}/work")
}

pub fn compensation_queue(name: &str) -> String {
    format!("mem://{name}/undo")
}

pub fn item(name: &str) -> WorkItem {
    WorkItem::new(name, WorkItemArguments::new())
}

pub fn catalog(activities: impl IntoIterator<Item = ScriptedActivity>) -> ActivityCatalog {
    let mut catalog = ActivityCatalog::new();
    for activity in activities {
        catalog.register(Arc::new(activity));
    }
    catalog
}
