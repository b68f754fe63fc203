use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ActivityError;

macro_rules! payload {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(IndexMap<String, Value>);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Add an entry while building the payload.
            #[must_use]
            pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
                self.0.insert(key.into(), value.into());
                self
            }

            #[must_use]
            pub fn get(&self, key: &str) -> Option<&Value> {
                self.0.get(key)
            }

            #[must_use]
            pub fn contains_key(&self, key: &str) -> bool {
                self.0.contains_key(key)
            }

            #[must_use]
            pub fn len(&self) -> usize {
                self.0.len()
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
                self.0.iter().map(|(key, value)| (key.as_str(), value))
            }

            /// # Errors
            ///
            /// Returns `ActivityError::MissingArgument` if `key` is absent.
            pub fn require(&self, key: &str) -> Result<&Value, ActivityError> {
                self.0
                    .get(key)
                    .ok_or_else(|| ActivityError::MissingArgument(key.to_string()))
            }

            /// # Errors
            ///
            /// Returns an error if `key` is absent or not a string.
            pub fn require_str(&self, key: &str) -> Result<&str, ActivityError> {
                self.require(key)?
                    .as_str()
                    .ok_or_else(|| invalid(key, "expected a string"))
            }

            /// # Errors
            ///
            /// Returns an error if `key` is absent or not an unsigned integer.
            pub fn require_u64(&self, key: &str) -> Result<u64, ActivityError> {
                self.require(key)?
                    .as_u64()
                    .ok_or_else(|| invalid(key, "expected an unsigned integer"))
            }
        }

        impl From<IndexMap<String, Value>> for $name {
            fn from(entries: IndexMap<String, Value>) -> Self {
                Self(entries)
            }
        }

        impl<K, V> FromIterator<(K, V)> for $name
        where
            K: Into<String>,
            V: Into<Value>,
        {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                Self(
                    iter.into_iter()
                        .map(|(key, value)| (key.into(), value.into()))
                        .collect(),
                )
            }
        }
    };
}

payload! {
    /// Input arguments handed to an activity's forward work.
    WorkItemArguments
}

payload! {
    /// Outcome of an activity's forward work, kept for its compensation.
    WorkResult
}

fn invalid(key: &str, reason: &str) -> ActivityError {
    ActivityError::InvalidArgument {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
