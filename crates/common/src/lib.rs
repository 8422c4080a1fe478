//! Shared building blocks for both HTTP services: response envelopes,
//! pagination arithmetic and tracing initialization.

pub mod types;
pub mod utils;
pub mod pagination;
