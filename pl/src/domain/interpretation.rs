//! Interpretation records
//!
//! `Interpretation` is the validated, immutable domain type. Persisted files
//! use `InterpretationRecord`, a strict serde schema that converts into an
//! `Interpretation` via `TryFrom` and fails closed on the first violation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from building an interpretation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretationError {
    #[error("interpretation '{name}' ends before it starts ({start} > {end})")]
    InvalidRange { name: String, start: i64, end: i64 },

    #[error("interpretation name must not be empty")]
    EmptyName,

    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}

/// A timestamped annotation about a pod's data
///
/// Serializes through `InterpretationRecord`, so the wire form and the
/// persisted form are the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "InterpretationRecord", try_from = "InterpretationRecord")]
pub struct Interpretation {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    name: String,
    actions: Vec<String>,
    tags: Vec<String>,
}

impl Interpretation {
    /// Create an interpretation spanning `[start, end]`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, name: impl Into<String>) -> Result<Self, InterpretationError> {
        let name = name.into();
        debug!(%start, %end, %name, "Interpretation::new: called");
        if name.trim().is_empty() {
            return Err(InterpretationError::EmptyName);
        }
        if end < start {
            return Err(InterpretationError::InvalidRange {
                name,
                start: start.timestamp(),
                end: end.timestamp(),
            });
        }
        Ok(Self {
            start,
            end,
            name,
            actions: Vec::new(),
            tags: Vec::new(),
        })
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions.extend(actions.into_iter().map(Into::into));
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether two interpretations describe the same span and name
    pub fn same_identity(&self, other: &Interpretation) -> bool {
        self.start == other.start && self.end == other.end && self.name == other.name
    }
}

/// Persisted form of an interpretation (one element of the per-pod JSON array)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterpretationRecord {
    /// Start time in unix seconds
    pub start: i64,

    /// End time in unix seconds
    pub end: i64,

    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl From<&Interpretation> for InterpretationRecord {
    fn from(interpretation: &Interpretation) -> Self {
        Self::from(interpretation.clone())
    }
}

impl From<Interpretation> for InterpretationRecord {
    fn from(interpretation: Interpretation) -> Self {
        Self {
            start: interpretation.start.timestamp(),
            end: interpretation.end.timestamp(),
            name: interpretation.name,
            actions: interpretation.actions,
            tags: interpretation.tags,
        }
    }
}

impl TryFrom<InterpretationRecord> for Interpretation {
    type Error = InterpretationError;

    fn try_from(record: InterpretationRecord) -> Result<Self, Self::Error> {
        let start = from_unix(record.start)?;
        let end = from_unix(record.end)?;
        Ok(Interpretation::new(start, end, record.name)?
            .with_actions(record.actions)
            .with_tags(record.tags))
    }
}

pub(crate) fn from_unix(secs: i64) -> Result<DateTime<Utc>, InterpretationError> {
    DateTime::from_timestamp(secs, 0).ok_or(InterpretationError::InvalidTimestamp(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(start: i64, end: i64, name: &str) -> InterpretationRecord {
        InterpretationRecord {
            start,
            end,
            name: name.to_string(),
            actions: vec![],
            tags: vec![],
        }
    }

    #[test]
    fn test_record_converts() {
        let mut r = record(100, 200, "spike");
        r.tags = vec!["volatile".to_string()];
        r.actions = vec!["sell".to_string()];

        let i = Interpretation::try_from(r).unwrap();
        assert_eq!(i.start().timestamp(), 100);
        assert_eq!(i.end().timestamp(), 200);
        assert_eq!(i.name(), "spike");
        assert_eq!(i.tags(), ["volatile".to_string()]);
        assert_eq!(i.actions(), ["sell".to_string()]);
    }

    #[test]
    fn test_zero_length_span_allowed() {
        assert!(Interpretation::try_from(record(100, 100, "point")).is_ok());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let err = Interpretation::try_from(record(200, 100, "backwards")).unwrap_err();
        assert!(matches!(err, InterpretationError::InvalidRange { start: 200, end: 100, .. }));
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = Interpretation::try_from(record(1, 2, "   ")).unwrap_err();
        assert_eq!(err, InterpretationError::EmptyName);
    }

    #[test]
    fn test_out_of_range_timestamp_rejected() {
        let err = Interpretation::try_from(record(i64::MAX, i64::MAX, "far")).unwrap_err();
        assert_eq!(err, InterpretationError::InvalidTimestamp(i64::MAX));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let json = r#"{"start": 1, "end": 2, "name": "x", "color": "red"}"#;
        assert!(serde_json::from_str::<InterpretationRecord>(json).is_err());
    }

    #[test]
    fn test_optional_lists_default_empty() {
        let json = r#"{"start": 1, "end": 2, "name": "x"}"#;
        let r: InterpretationRecord = serde_json::from_str(json).unwrap();
        assert!(r.actions.is_empty());
        assert!(r.tags.is_empty());
    }

    #[test]
    fn test_serializes_as_record() {
        let i = Interpretation::try_from(record(10, 20, "dip")).unwrap();
        let value = serde_json::to_value(&i).unwrap();
        assert_eq!(value, serde_json::json!({"start": 10, "end": 20, "name": "dip"}));

        let invalid = serde_json::json!({"start": 20, "end": 10, "name": "dip"});
        assert!(serde_json::from_value::<Interpretation>(invalid).is_err());
    }

    #[test]
    fn test_record_from_interpretation() {
        let i = Interpretation::try_from(record(10, 20, "dip")).unwrap().with_tags(["a"]);
        let back = InterpretationRecord::from(&i);
        assert_eq!(back.start, 10);
        assert_eq!(back.end, 20);
        assert_eq!(back.tags, vec!["a".to_string()]);
    }
}
