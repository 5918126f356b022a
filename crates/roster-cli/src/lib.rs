//! Library components of the roster CLI.

pub mod config;
pub mod logging;
