//! # Service Sample Library
//!
//! This library exposes the application modules for integration testing.

pub mod clients;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod model;
