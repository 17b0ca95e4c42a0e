#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod session;

pub use client::{ClientState, ConnectionStatus, NORMAL_CLOSURE, NotableEvent};
pub use config::{ClientConfig, InitAckPolicy};
pub use error::ProtocolError;
pub use event::{ClientEvent, ServerEvent, ServerEventKind};
pub use session::{PlayerRole, SessionParams};
