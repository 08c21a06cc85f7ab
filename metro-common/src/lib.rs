//! Common utilities for the metro-route toolkit

pub mod error;

pub use error::{eq_ignore_case, suggest_station, Error, Result};
