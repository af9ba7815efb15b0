//! Terminal client for a clinic CRM backend: appointment ledgers for medicine
//! and procedures, client lookup and catalog browsing.

pub mod api;
pub mod app;
pub mod backdrop;
pub mod bridge;
pub mod catalog;
pub mod components;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod ledger;
pub mod models;
pub mod tui;
pub mod utils;
