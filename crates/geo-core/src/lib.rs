//! Core types and storage for the geocoded location pipeline.
//!
//! Provides the location record model ([`record::LocationRecord`]), CSV
//! persistence of the geocoded table, and pipeline configuration.

pub mod config;
pub mod record;
pub mod table;
