use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::catalog::ActivityCatalog;
use crate::error::ItineraryError;
use crate::payload::WorkItemArguments;
use crate::slip::RoutingSlip;
use crate::work::{ActivityRef, WorkItem};

/// A saga's work plan, as written in a TOML file.
///
/// ```toml
/// [[step]]
/// activity = "reserve_car"
/// [step.arguments]
/// vehicleType = "Compact"
/// ```
///
/// Order steps least risky first so failures happen early and little needs
/// compensating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(rename = "step", default)]
    pub steps: Vec<ItineraryStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryStep {
    pub activity: ActivityRef,
    /// Datetimes are carried as their RFC 3339 text.
    #[serde(default, deserialize_with = "toml_arguments")]
    pub arguments: WorkItemArguments,
}

fn toml_arguments<'de, D>(deserializer: D) -> Result<WorkItemArguments, D::Error>
where
    D: Deserializer<'de>,
{
    toml::Table::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| json_value(value).map(|value| (key, value)))
        .collect::<Result<_, String>>()
        .map_err(serde::de::Error::custom)
}

fn json_value(value: toml::Value) -> Result<Value, String> {
    match value {
        toml::Value::String(text) => Ok(Value::String(text)),
        toml::Value::Integer(number) => Ok(Value::from(number)),
        toml::Value::Float(number) => serde_json::Number::from_f64(number)
            .map(Value::Number)
            .ok_or_else(|| format!("argument value {number} is not a finite number")),
        toml::Value::Boolean(flag) => Ok(Value::Bool(flag)),
        toml::Value::Datetime(datetime) => Ok(Value::String(datetime.to_string())),
        toml::Value::Array(items) => items
            .into_iter()
            .map(json_value)
            .collect::<Result<_, _>>()
            .map(Value::Array),
        toml::Value::Table(table) => table
            .into_iter()
            .map(|(key, value)| json_value(value).map(|value| (key, value)))
            .collect::<Result<_, _>>()
            .map(Value::Object),
    }
}

impl Itinerary {
    /// # Errors
    ///
    /// Returns `ItineraryError::Parse` if `content` is not a valid itinerary.
    pub fn from_toml_str(content: &str) -> Result<Self, ItineraryError> {
        Ok(toml::from_str(content)?)
    }

    /// # Errors
    ///
    /// Returns `ItineraryError::Read` if the file cannot be read, or
    /// `ItineraryError::Parse` if it is not a valid itinerary.
    pub fn load(path: &Path) -> Result<Self, ItineraryError> {
        let content = fs::read_to_string(path).map_err(|source| ItineraryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Build a routing slip, checking that `catalog` knows every activity.
    ///
    /// # Errors
    ///
    /// Returns `ItineraryError::UnknownActivity` for the first step whose
    /// activity is not registered.
    pub fn into_routing_slip(
        self,
        catalog: &ActivityCatalog,
    ) -> Result<RoutingSlip, ItineraryError> {
        if let Some((index, step)) = self
            .steps
            .iter()
            .enumerate()
            .find(|(_, step)| !catalog.contains(&step.activity))
        {
            return Err(ItineraryError::UnknownActivity {
                index,
                activity: step.activity.clone(),
            });
        }

        Ok(RoutingSlip::new(
            self.steps
                .into_iter()
                .map(|step| WorkItem::new(step.activity, step.arguments)),
        ))
    }
}
