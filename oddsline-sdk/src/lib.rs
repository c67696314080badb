//! Oddsline SDK.
//!
//! Wire objects shared by the Oddsline server and its clients. The typed
//! HTTP and live-odds WebSocket clients live behind the `client` feature.

#![forbid(unsafe_code)]

pub mod auth;
pub mod objects;

#[cfg(feature = "client")]
pub mod client;
