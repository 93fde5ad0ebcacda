//! Serve the base blob of TachyFont fonts.
//!
//! This crate holds the application logic: the request handlers, the font-data
//! stores they read from and the telemetry components wrapped around them.
//! The HTTP server, the routing table and configuration loading live in
//! `tachyfont_server`.
pub mod configuration;
pub mod font_data;
pub mod routes;
pub mod telemetry;
