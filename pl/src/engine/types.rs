//! Wire types for the AI engine API

use serde::{Deserialize, Serialize};

use crate::domain::IndexedInterpretations;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddInterpretationsRequest {
    pub pod: String,
    pub indexed_interpretations: IndexedInterpretations,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddInterpretationsResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub result: String,
}

impl AddInterpretationsResponse {
    pub fn ok() -> Self {
        Self {
            error: false,
            result: "ok".to_string(),
        }
    }

    pub fn failed(result: impl Into<String>) -> Self {
        Self {
            error: true,
            result: result.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddDataRequest {
    pub pod: String,
    pub csv_data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddDataResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub result: String,
}

impl AddDataResponse {
    pub fn ok() -> Self {
        Self {
            error: false,
            result: "ok".to_string(),
        }
    }

    pub fn failed(result: impl Into<String>) -> Self {
        Self {
            error: true,
            result: result.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_missing_fields_default() {
        let r: AddInterpretationsResponse = serde_json::from_str("{}").unwrap();
        assert!(!r.error);
        assert!(r.result.is_empty());
    }

    #[test]
    fn test_request_shape() {
        let req = AddDataRequest {
            pod: "trader".to_string(),
            csv_data: "time\n".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["pod"], "trader");
        assert_eq!(value["csv_data"], "time\n");
    }
}
