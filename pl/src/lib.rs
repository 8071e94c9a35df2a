//! podlink - pod to AI engine bridge
//!
//! Moves a pod's interpretations and connector data to the AI engine and
//! brings up every pod's data connectors at startup.
//!
//! # Core Concepts
//!
//! - **Health-gated sends**: the engine is probed before every delivery
//! - **Bounded calls**: each RPC has its own deadline (1s by default)
//! - **No hidden retries**: failures go back to the caller with the pod name
//! - **Independent pods**: one pod failing never stops another
//!
//! # Modules
//!
//! - [`engine`] - engine client traits, HTTP client, and the sender
//! - [`import`] - seeding a pod's interpretation store from disk
//! - [`bootstrap`] - concurrent connector initialization
//! - [`bridge`] - forwarding connector state changes to the engine
//! - [`connector`] - data connector trait and the file connector
//! - [`domain`] - pods, interpretations, and state
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod bootstrap;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod connector;
pub mod domain;
pub mod engine;
pub mod import;

// Re-export commonly used types
pub use bootstrap::{BootstrapError, init_data_connectors, init_pod_data_connectors};
pub use bridge::{ChangeHandler, DataChangeBridge};
pub use config::{Config, ConnectorConfig, EngineConfig, PodConfig};
pub use connector::{ConnectorError, DataConnector, FileConnector};
pub use domain::{
    IndexedInterpretations, Interpretation, InterpretationError, InterpretationRecord, InterpretationStore,
    Observation, Pod, State, StoreError,
};
pub use engine::{DeliveryError, EngineClient, EngineError, EngineSender, HealthProbe, HttpEngineClient};
pub use import::{ImportError, import_interpretations};
