//! Models loaded from external sources.
pub mod config;
