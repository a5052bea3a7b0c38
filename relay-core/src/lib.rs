pub mod config;
pub mod error;
pub mod forward;
pub mod models;

pub use config::{ForwardConfig, HttpConfig, RelayConfig, ServiceConfig, ENDPOINT_ENV_VAR};
pub use error::RelayError;
pub use forward::{Forwarder, HttpForwarder};
pub use models::{InboundNotification, MessageRecord, RelayRequest, ASSISTANT_ROLE};
