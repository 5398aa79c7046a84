//! Macro regime classification and crisis scoring engine.

pub mod cache;
pub mod common;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod features;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
