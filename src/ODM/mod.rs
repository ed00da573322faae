//!
//! Documentation of the ODM module.
//! Contains the manifest stores: the trait, MongoDB and in-memory.
//!


use super::config;
use super::manifest;
pub mod odm;
pub mod models;
pub mod odm_utils;
pub mod store;
pub mod memory;
