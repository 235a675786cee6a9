use serde::{Deserialize, Serialize};

use crate::core::{Error, Parameter, ParameterValue};

/// The value and metadata of a single parameter at the time of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub value: ParameterValue,
}

impl ParameterSnapshot {
    pub fn new(parameter: Parameter, value: ParameterValue) -> ParameterSnapshot {
        ParameterSnapshot {
            name: parameter.name(),
            label: parameter.label(),
            unit: parameter.unit().map(str::to_string),
            value,
        }
    }
}

/// Every parameter of a D5a, as read in one pass over the module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub module: u8,
    pub parameters: Vec<ParameterSnapshot>,
}

impl Snapshot {
    pub fn get(&self, parameter: Parameter) -> Option<&ParameterValue> {
        let name = parameter.name();
        self.parameters
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.value)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
