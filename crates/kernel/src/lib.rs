//! Shop service kernel: REST CRUD over categories and products backed by
//! PostgreSQL, built around a generic paginated-list query engine.
//!
//! Internals are exposed as a library so integration tests can drive the
//! services and the query engine directly.

pub mod config;
pub mod db;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
