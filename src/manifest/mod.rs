//!
//! Documentation of the manifest module.
//! Deriving shift records from submissions and summing them per month.
//!

pub mod error;
pub mod models;
pub mod clock;
pub mod deriver;
pub mod aggregator;
pub mod service;
