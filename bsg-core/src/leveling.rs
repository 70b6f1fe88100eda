//! Leveling survey sheets: the raw benchmark readings per well nest.
//!
//! Each sheet of the surveying workbook is exported to its own CSV file,
//! `<WELLNEST>_Leveling.csv`. A sheet has a date column, a `Year` column and
//! one or more value columns. The land displacement column is found by the
//! marker token in its header, not by position, so any sheet layout works
//! as long as exactly one header carries the token.

use crate::error::{Result, SubsidenceError};
use bsg_utils::dates::parse_sheet_date;
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use log::debug;
use std::path::{Path, PathBuf};

/// Token identifying the land displacement column (cm).
pub const DISPLACEMENT_MARKER: &str = "Land";

/// Sheet name suffix after the well nest name.
pub const SHEET_SUFFIX: &str = "_Leveling";

/// Position of the date column when no header is named `Date`.
pub const DEFAULT_DATE_COLUMN: usize = 3;

/// One dated survey reading. `cells` follows `LevelingSheet::value_headers`;
/// empty, non-numeric or non-finite cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelingRow {
    pub date: NaiveDate,
    pub year: i32,
    pub cells: Vec<Option<f64>>,
}

/// Raw benchmark rows of one well nest, ordered by date.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelingSheet {
    pub name: String,
    pub value_headers: Vec<String>,
    pub rows: Vec<LevelingRow>,
}

impl LevelingSheet {
    /// Parse an exported leveling sheet.
    pub fn parse_leveling_csv(name: &str, csv_object: &str) -> Result<LevelingSheet> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        let headers = rdr.headers()?.clone();
        let date_idx = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("date"))
            .unwrap_or(DEFAULT_DATE_COLUMN);
        if date_idx >= headers.len() {
            return Err(SubsidenceError::InvalidFormat(format!(
                "{}: no date column",
                name
            )));
        }
        let year_idx = headers.iter().position(|h| h.eq_ignore_ascii_case("year"));
        let value_idx: Vec<usize> = (0..headers.len())
            .filter(|i| *i != date_idx && Some(*i) != year_idx)
            .collect();
        let value_headers = value_idx
            .iter()
            .map(|i| headers.get(*i).unwrap_or_default().to_string())
            .collect();

        let mut rows = Vec::new();
        for row in rdr.records() {
            let record = row?;
            if is_blank(&record) {
                continue;
            }
            let date = parse_sheet_date(record.get(date_idx).unwrap_or_default())
                .map_err(|e| SubsidenceError::DateParse(format!("{}: {}", name, e)))?;
            let year = match year_idx.and_then(|i| record.get(i)).filter(|s| !s.is_empty()) {
                Some(text) => parse_year(name, text)?,
                None => date.year(),
            };
            let cells = value_idx
                .iter()
                .map(|i| {
                    record
                        .get(*i)
                        .and_then(|s| s.parse::<f64>().ok())
                        .filter(|v| v.is_finite())
                })
                .collect();
            rows.push(LevelingRow { date, year, cells });
        }
        rows.sort_by_key(|row| row.date);
        debug!("leveling sheet {}: {} rows", name, rows.len());
        Ok(LevelingSheet {
            name: name.to_string(),
            value_headers,
            rows,
        })
    }

    /// Index into `cells` of the single column whose header contains `token`.
    pub fn marker_column(&self, token: &str) -> Result<usize> {
        let matches: Vec<usize> = self
            .value_headers
            .iter()
            .enumerate()
            .filter(|(_, header)| header.contains(token))
            .map(|(i, _)| i)
            .collect();
        match matches.as_slice() {
            [single] => Ok(*single),
            [] => Err(SubsidenceError::MarkerColumnMissing {
                sheet: self.name.clone(),
                token: token.to_string(),
            }),
            many => Err(SubsidenceError::MarkerColumnAmbiguous {
                sheet: self.name.clone(),
                token: token.to_string(),
                columns: many
                    .iter()
                    .map(|i| self.value_headers[*i].clone())
                    .collect(),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.is_empty())
}

fn parse_year(sheet: &str, text: &str) -> Result<i32> {
    // spreadsheet exports often write integral years as "1995.0"
    text.parse::<i32>()
        .ok()
        .or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0)
                .map(|v| v as i32)
        })
        .ok_or_else(|| SubsidenceError::InvalidFormat(format!("{}: bad year {:?}", sheet, text)))
}

/// Directory of exported leveling sheets.
#[derive(Debug, Clone)]
pub struct LevelingBook {
    dir: PathBuf,
}

impl LevelingBook {
    pub fn new<P: AsRef<Path>>(dir: P) -> LevelingBook {
        LevelingBook {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn sheet_path(&self, well_nest: &str) -> PathBuf {
        self.dir.join(format!("{}{}.csv", well_nest, SHEET_SUFFIX))
    }

    /// Load the sheet of a well nest. A well nest without a sheet has no
    /// benchmark and yields `Ok(None)`.
    pub fn load(&self, well_nest: &str) -> Result<Option<LevelingSheet>> {
        let path = self.sheet_path(well_nest);
        if !path.exists() {
            debug!("no leveling sheet at {}", path.display());
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let name = format!("{}{}", well_nest, SHEET_SUFFIX);
        LevelingSheet::parse_leveling_csv(&name, &contents).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET_CSV: &str = "Benchmark,Station,Year,Date,Land Surface (cm),Notes
BM1,A,1980,1980-01-01,-1.5,
BM1,A,1978,1978-01-01,0.3,first
BM1,A,1979,1979-01-01,,missing

BM1,A,1981.0,1981-03-01,-2.0,
";

    #[test]
    fn test_parse_leveling_csv_orders_and_fills() {
        let sheet = LevelingSheet::parse_leveling_csv("LCBKK013_Leveling", SHEET_CSV).unwrap();
        assert_eq!(sheet.rows.len(), 4);
        assert_eq!(sheet.rows[0].year, 1978);
        assert_eq!(sheet.rows[3].year, 1981);
        let land = sheet.marker_column(DISPLACEMENT_MARKER).unwrap();
        assert_eq!(sheet.value_headers[land], "Land Surface (cm)");
        assert_eq!(sheet.rows[0].cells[land], Some(0.3));
        assert_eq!(sheet.rows[1].cells[land], None);
    }

    #[test]
    fn test_non_finite_cells_are_missing() {
        let csv = "Year,Date,Land (cm)\n1978,1978-01-01,NaN\n1979,1979-01-01,inf\n1980,1980-01-01,-1.0\n";
        let sheet = LevelingSheet::parse_leveling_csv("D", csv).unwrap();
        let cells: Vec<Option<f64>> = sheet.rows.iter().map(|row| row.cells[0]).collect();
        assert_eq!(cells, vec![None, None, Some(-1.0)]);
    }

    #[test]
    fn test_marker_column_missing_and_ambiguous() {
        let missing = "Year,Date,Elevation\n1978,1978-01-01,1.0\n";
        let sheet = LevelingSheet::parse_leveling_csv("A", missing).unwrap();
        assert!(matches!(
            sheet.marker_column(DISPLACEMENT_MARKER),
            Err(SubsidenceError::MarkerColumnMissing { .. })
        ));

        let ambiguous = "Year,Date,Land A,Land B\n1978,1978-01-01,1.0,2.0\n";
        let sheet = LevelingSheet::parse_leveling_csv("B", ambiguous).unwrap();
        match sheet.marker_column(DISPLACEMENT_MARKER) {
            Err(SubsidenceError::MarkerColumnAmbiguous { columns, .. }) => {
                assert_eq!(columns, vec!["Land A".to_string(), "Land B".to_string()]);
            }
            other => panic!("expected ambiguity error, got {:?}", other),
        }
    }

    #[test]
    fn test_date_column_falls_back_to_fourth_column() {
        let csv = "A,B,C,When,Land\nx,y,z,1990-01-01,0.5\n";
        let sheet = LevelingSheet::parse_leveling_csv("C", csv).unwrap();
        assert_eq!(sheet.rows[0].date, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        assert_eq!(sheet.rows[0].year, 1990);
    }

    #[test]
    fn test_missing_sheet_is_not_an_error() {
        let book = LevelingBook::new("/nonexistent/leveling");
        assert!(book.load("LCBKK999").unwrap().is_none());
        assert!(book
            .sheet_path("LCBKK999")
            .ends_with("LCBKK999_Leveling.csv"));
    }
}
