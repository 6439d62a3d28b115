//! net-sentry - Live network traffic monitor with real-time risk alerts
//!
//! This crate captures IP packets on a tethered device's interface,
//! classifies each flow against a blocklist and an optional IP-reputation
//! service, and streams risk alerts to WebSocket viewers.

pub mod blocklist;
pub mod capture;
pub mod classify;
pub mod config;
pub mod error;
pub mod hub;
pub mod logging;
pub mod models;
pub mod server;
