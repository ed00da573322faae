//!
//! Documentation of the config module.
//!

use super::manifest;
pub mod config;
