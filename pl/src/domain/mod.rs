//! Domain types for podlink
//!
//! - [`Pod`] - processing unit owning a store and connectors
//! - [`Interpretation`] / [`InterpretationRecord`] - validated annotation and its persisted form
//! - [`InterpretationStore`] / [`IndexedInterpretations`] - ordered store and delivery batch
//! - [`State`] - connector-produced time-series snapshot

mod interpretation;
mod pod;
mod state;
mod store;

pub use interpretation::{Interpretation, InterpretationError, InterpretationRecord};
pub use pod::{Pod, default_interpretations_path};
pub use state::{Observation, State};
pub use store::{IndexedInterpretations, InterpretationStore, StoreError};
