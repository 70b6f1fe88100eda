//! Data processing for subsidence and groundwater figures.
//!
//! This crate turns loaded model output and survey data into the values
//! the figures show: aligned annual series with their fit metrics,
//! forecast rates and per-aquifer groupings.

pub mod alignment;
pub mod benchmark;
pub mod forecast;
pub mod groups;
pub mod heads;
