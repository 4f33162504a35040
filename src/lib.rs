#![deny(clippy::expect_used, clippy::unwrap_used)]

//! The root of the self-healing event stream client library.
//! 自愈事件流客户端库的根。

pub mod config;
pub mod envelope;
pub mod error;
pub mod observer;
pub mod transport;

pub mod manager;

pub use config::Config;
pub use error::{Error, Result};
pub use manager::{ConnectionManager, StreamState};
pub use observer::{StateSink, StateUpdate, StatusKind};
