//! State snapshots produced by data connectors

use serde::{Deserialize, Serialize};

/// One row of time-series data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Unix seconds
    pub time: i64,
    pub values: Vec<f64>,
}

/// A snapshot of time-series data from one connector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Where the data came from (connector path or name)
    pub origin: String,
    pub fields: Vec<String>,
    pub observations: Vec<Observation>,
}

impl State {
    pub fn new(origin: impl Into<String>, fields: Vec<String>, observations: Vec<Observation>) -> Self {
        Self {
            origin: origin.into(),
            fields,
            observations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Render as CSV with a `time,<fields...>` header
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("time");
        for field in &self.fields {
            csv.push(',');
            csv.push_str(field);
        }
        csv.push('\n');

        for observation in &self.observations {
            csv.push_str(&observation.time.to_string());
            for value in &observation.values {
                csv.push(',');
                csv.push_str(&value.to_string());
            }
            csv.push('\n');
        }
        csv
    }
}
