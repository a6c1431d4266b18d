//! Marketplace accounts library.
//!
//! User profiles with their custom manager, the settings records they
//! reference, payment accessors over the linked stripe customer, and the
//! admin registrations served by the staff JSON API.

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
