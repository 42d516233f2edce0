//! CLI command implementations.

pub mod common;
pub mod config;
pub mod embed;
pub mod locate;
pub mod locations;
pub mod mosaic;
