use std::fmt;

use serde::{Deserialize, Serialize};

use crate::payload::{WorkItemArguments, WorkResult};

/// Identifier of an activity variant.
///
/// Stored by value inside routing slips so the document stays transport-safe;
/// resolved to a live [`Activity`](crate::Activity) through an
/// [`ActivityCatalog`](crate::ActivityCatalog) at the receiving node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityRef(String);

impl ActivityRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActivityRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ActivityRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A pending unit of work: which activity runs it, and with what.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    activity: ActivityRef,
    #[serde(default)]
    arguments: WorkItemArguments,
}

impl WorkItem {
    #[must_use]
    pub fn new(activity: impl Into<ActivityRef>, arguments: WorkItemArguments) -> Self {
        Self {
            activity: activity.into(),
            arguments,
        }
    }

    #[must_use]
    pub fn activity(&self) -> &ActivityRef {
        &self.activity
    }

    #[must_use]
    pub fn arguments(&self) -> &WorkItemArguments {
        &self.arguments
    }
}

/// A completed unit of work, carrying what its compensation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLog {
    activity: ActivityRef,
    #[serde(default)]
    result: WorkResult,
}

impl WorkLog {
    #[must_use]
    pub fn new(activity: impl Into<ActivityRef>, result: WorkResult) -> Self {
        Self {
            activity: activity.into(),
            result,
        }
    }

    #[must_use]
    pub fn activity(&self) -> &ActivityRef {
        &self.activity
    }

    #[must_use]
    pub fn result(&self) -> &WorkResult {
        &self.result
    }
}
