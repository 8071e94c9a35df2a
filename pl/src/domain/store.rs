//! Per-pod interpretation store
//!
//! Append-only, insertion ordered, bounded by the pod's time window.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::Interpretation;

/// Reasons the store rejects an interpretation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("interpretation '{name}' starts at {start}, before pod epoch {epoch}")]
    BeforeEpoch {
        name: String,
        start: DateTime<Utc>,
        epoch: DateTime<Utc>,
    },

    #[error("interpretation '{name}' ends at {end}, after pod period end {period_end}")]
    AfterPeriod {
        name: String,
        end: DateTime<Utc>,
        period_end: DateTime<Utc>,
    },

    #[error("interpretation '{name}' already exists at [{start}, {end}]")]
    Duplicate {
        name: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Ordered collection of a pod's interpretations
#[derive(Debug, Clone)]
pub struct InterpretationStore {
    epoch: DateTime<Utc>,
    period: Duration,
    interpretations: Vec<Interpretation>,
}

impl InterpretationStore {
    pub fn new(epoch: DateTime<Utc>, period: Duration) -> Self {
        Self {
            epoch,
            period,
            interpretations: Vec::new(),
        }
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// End of the pod window (inclusive)
    pub fn period_end(&self) -> DateTime<Utc> {
        self.epoch.checked_add_signed(self.period).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Append an interpretation, rejecting ones outside the window or already present
    pub fn add(&mut self, interpretation: Interpretation) -> Result<(), StoreError> {
        debug!(name = %interpretation.name(), count = self.interpretations.len(), "add: called");
        if interpretation.start() < self.epoch {
            return Err(StoreError::BeforeEpoch {
                name: interpretation.name().to_string(),
                start: interpretation.start(),
                epoch: self.epoch,
            });
        }
        let period_end = self.period_end();
        if interpretation.end() > period_end {
            return Err(StoreError::AfterPeriod {
                name: interpretation.name().to_string(),
                end: interpretation.end(),
                period_end,
            });
        }
        if self.interpretations.iter().any(|i| i.same_identity(&interpretation)) {
            return Err(StoreError::Duplicate {
                name: interpretation.name().to_string(),
                start: interpretation.start(),
                end: interpretation.end(),
            });
        }
        self.interpretations.push(interpretation);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.interpretations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interpretations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Interpretation> {
        self.interpretations.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interpretation> {
        self.interpretations.iter()
    }

    /// Build a delivery batch from the current contents
    pub fn indexed(&self) -> IndexedInterpretations {
        IndexedInterpretations::new(self.interpretations.clone())
    }
}

/// A delivery batch: interpretations in store order plus a start-time index
///
/// `index` maps a start time (unix seconds) to the positions in
/// `interpretations` that begin at that second. The engine uses the
/// positions to order and deduplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedInterpretations {
    pub interpretations: Vec<Interpretation>,
    pub index: BTreeMap<i64, Vec<u32>>,
}

impl IndexedInterpretations {
    pub fn new(interpretations: Vec<Interpretation>) -> Self {
        let mut index: BTreeMap<i64, Vec<u32>> = BTreeMap::new();
        for (pos, interpretation) in interpretations.iter().enumerate() {
            index
                .entry(interpretation.start().timestamp())
                .or_default()
                .push(pos as u32);
        }
        Self { interpretations, index }
    }

    pub fn len(&self) -> usize {
        self.interpretations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interpretations.is_empty()
    }
}
