//! Configuration for the depthaa command line tool
//!
//! Provides types and parsing for `depthaa.toml` filter configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
