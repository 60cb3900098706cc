//! Terminal client for the wireless communications calculation service.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod defaults;
pub mod export;
pub mod format;
pub mod logging;
pub mod render;
pub mod request;
pub mod scenario;
pub mod screens;
pub mod store;
pub mod ui;
