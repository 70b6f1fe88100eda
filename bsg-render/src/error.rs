/// Error types for map layer configuration
use thiserror::Error;

/// A render call that cannot be drawn as configured
#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    /// Mode name outside the known set
    #[error("Unknown render mode: {0}")]
    UnknownMode(String),

    /// Payload variant does not match the mode
    #[error("Mode {mode} expects {expected}")]
    PayloadShape {
        mode: &'static str,
        expected: &'static str,
    },

    /// Wedge modes need exactly one group per sector
    #[error("Mode {mode} needs {expected} groups (found {found})")]
    GroupCount {
        mode: &'static str,
        expected: usize,
        found: usize,
    },

    /// Groups must come in the mode's fixed order
    #[error("Mode {mode}: group {index} must be {expected} (found {found})")]
    GroupOrder {
        mode: &'static str,
        index: usize,
        expected: &'static str,
        found: String,
    },

    /// A group without points would leave its sector undrawn everywhere
    #[error("Mode {mode}: group {group} is empty")]
    EmptyGroup { mode: &'static str, group: String },

    /// Every point needs exactly one value
    #[error("Mode {mode}: {group} has {points} points but {values} values")]
    LengthMismatch {
        mode: &'static str,
        group: String,
        points: usize,
        values: usize,
    },

    /// Colored layers need a color scale
    #[error("Mode {0} needs a color scale")]
    MissingColorScale(&'static str),
}
