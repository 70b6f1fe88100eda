/// Error types for the BSG core library
use thiserror::Error;

/// Main error type for loading and validating subsidence inputs
#[derive(Error, Debug)]
pub enum SubsidenceError {
    /// Failed to read an input file
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Date parsing failed
    #[error("Failed to parse date: {0}")]
    DateParse(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// No column header carries the displacement marker token
    #[error("Sheet {sheet}: no column header contains {token:?}")]
    MarkerColumnMissing { sheet: String, token: String },

    /// More than one column header carries the displacement marker token
    #[error("Sheet {sheet}: columns {columns:?} all contain {token:?}")]
    MarkerColumnAmbiguous {
        sheet: String,
        token: String,
        columns: Vec<String>,
    },

    /// Well nest absent from the location table
    #[error("Well nest not found: {0}")]
    WellNestNotFound(String),

    /// Well name does not identify one of the four aquifers
    #[error("Well {0} does not belong to a known aquifer (BK, PD, NL, NB)")]
    UnknownWellKind(String),

    /// A well nest must hold between one and four wells
    #[error("Well nest {well_nest} has {found} wells (expected 1 to 4)")]
    WellCount { well_nest: String, found: usize },

    /// A simulated series has no row for a required year
    #[error("Series {series} has no value for {year}")]
    MissingYear { series: String, year: i32 },

    /// A series is too short for the requested computation
    #[error("Series {series} needs at least {needed} rows (found {found})")]
    ShortSeries {
        series: String,
        needed: usize,
        found: usize,
    },

    /// Unknown sensitivity parameter or scenario name
    #[error("Unknown {kind}: {name}")]
    UnknownName { kind: &'static str, name: String },
}

/// Type alias for Results using SubsidenceError
pub type Result<T> = std::result::Result<T, SubsidenceError>;
