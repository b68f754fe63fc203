use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::activity::Activity;
use crate::error::RoutingSlipError;
use crate::work::ActivityRef;

/// Registry resolving activity references to live implementations.
///
/// Every node that receives routing slips needs a catalog covering the
/// activities those slips name.
#[derive(Clone, Default)]
pub struct ActivityCatalog {
    activities: BTreeMap<ActivityRef, Arc<dyn Activity>>,
}

impl ActivityCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_activity(mut self, activity: impl Activity + 'static) -> Self {
        self.register(Arc::new(activity));
        self
    }

    /// Register an activity under its name, returning any entry it replaced.
    pub fn register(&mut self, activity: Arc<dyn Activity>) -> Option<Arc<dyn Activity>> {
        let key = ActivityRef::new(activity.name());
        let replaced = self.activities.insert(key, activity);
        if let Some(previous) = &replaced {
            warn!(activity = previous.name(), "replaced activity in catalog");
        }
        replaced
    }

    /// # Errors
    ///
    /// Returns `RoutingSlipError::UnknownActivity` if nothing is registered
    /// under `activity`.
    pub fn resolve(&self, activity: &ActivityRef) -> Result<&Arc<dyn Activity>, RoutingSlipError> {
        self.activities
            .get(activity)
            .ok_or_else(|| RoutingSlipError::UnknownActivity(activity.clone()))
    }

    #[must_use]
    pub fn contains(&self, activity: &ActivityRef) -> bool {
        self.activities.contains_key(activity)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ActivityRef, &Arc<dyn Activity>)> {
        self.activities.iter()
    }
}

impl fmt::Debug for ActivityCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.activities.keys()).finish()
    }
}
