//! Local survey authoring, response collection and results export.
//!
//! Everything runs in-process over a single SQLite file used as a key/value store.
//! [`app::App`] wires the [`store`]s together; the [`flows`] write to them and
//! [`results`] reads from them.

pub mod app;
pub mod config;
pub mod db;
pub mod flows;
pub mod models;
pub mod results;
pub mod routes;
pub mod store;
pub mod validation;
