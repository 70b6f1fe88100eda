//! Domain types and input loaders for Bangkok subsidence and groundwater
//! figures: well nests, simulated annual series, leveling sheets, pumping
//! scenarios and the head model accessor.

pub mod annual;
pub mod boundary;
pub mod error;
pub mod head_model;
pub mod leveling;
pub mod scenario;
pub mod well_nest;
pub mod year_range;
