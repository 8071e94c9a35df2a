//! AI engine module for podlink
//!
//! Transport traits, the HTTP client, and the sender that gates and bounds
//! every outbound call.

pub mod client;
mod error;
mod health;
mod http;
mod sender;
mod types;

pub use client::EngineClient;
pub use error::{DeliveryError, EngineError, Operation};
pub use health::HealthProbe;
pub use http::HttpEngineClient;
pub use sender::{DEFAULT_CALL_TIMEOUT, EngineSender};
pub use types::{AddDataRequest, AddDataResponse, AddInterpretationsRequest, AddInterpretationsResponse};
