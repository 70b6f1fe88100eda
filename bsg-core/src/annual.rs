use crate::error::{Result, SubsidenceError};
use bsg_utils::dates::parse_sheet_date;
use chrono::{Datelike, NaiveDate};
use csv::ReaderBuilder;
use serde::Serialize;

/// Which column of an annual series to read.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum SeriesKind {
    /// Displacement accrued during the year (`AnnRates`)
    AnnRate,
    /// Running total since the start of the simulation (`CumTotSum`)
    CumulativeSum,
}

/// One year-end row of simulated subsidence. Values are in meters,
/// negative for subsidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnualRecord {
    pub date: NaiveDate,
    pub ann_rate: f64,
    pub cum_total: f64,
}

impl AnnualRecord {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn value(&self, kind: SeriesKind) -> f64 {
        match kind {
            SeriesKind::AnnRate => self.ann_rate,
            SeriesKind::CumulativeSum => self.cum_total,
        }
    }
}

/// Simulated annual subsidence for one well nest, one row per calendar
/// year in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualSeries {
    pub well_nest: String,
    pub records: Vec<AnnualRecord>,
}

impl AnnualSeries {
    pub fn new(well_nest: &str, mut records: Vec<AnnualRecord>) -> Result<AnnualSeries> {
        records.sort_by_key(|record| record.date);
        if let Some(pair) = records.windows(2).find(|w| w[0].year() == w[1].year()) {
            return Err(SubsidenceError::InvalidFormat(format!(
                "{}: more than one row for {}",
                well_nest,
                pair[0].year()
            )));
        }
        Ok(AnnualSeries {
            well_nest: well_nest.to_string(),
            records,
        })
    }

    /// Parse a model export with headers `date,AnnRates,CumTotSum`.
    /// Header matching ignores case; other columns are ignored.
    pub fn parse_annual_csv(well_nest: &str, csv_object: &str) -> Result<AnnualSeries> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        let headers = rdr.headers()?.clone();
        let column = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    SubsidenceError::InvalidFormat(format!("{}: missing column {}", well_nest, name))
                })
        };
        let date_idx = column("date")?;
        let rate_idx = column("AnnRates")?;
        let cum_idx = column("CumTotSum")?;

        let mut records = Vec::new();
        for row in rdr.records() {
            let record = row?;
            let date_str = record.get(date_idx).unwrap_or_default();
            let date = parse_sheet_date(date_str)
                .map_err(|e| SubsidenceError::DateParse(e.to_string()))?;
            let ann_rate = parse_value(well_nest, record.get(rate_idx))?;
            let cum_total = parse_value(well_nest, record.get(cum_idx))?;
            records.push(AnnualRecord {
                date,
                ann_rate,
                cum_total,
            });
        }
        AnnualSeries::new(well_nest, records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The row for a calendar year, if simulated.
    pub fn record_for_year(&self, year: i32) -> Option<&AnnualRecord> {
        self.records.iter().find(|record| record.year() == year)
    }

    /// The value for a calendar year, failing when the year was not simulated.
    pub fn value_for_year(&self, year: i32, kind: SeriesKind) -> Result<f64> {
        self.record_for_year(year)
            .map(|record| record.value(kind))
            .ok_or_else(|| SubsidenceError::MissingYear {
                series: self.well_nest.clone(),
                year,
            })
    }

    /// (date, value) pairs of one flavor.
    pub fn points(&self, kind: SeriesKind) -> Vec<(NaiveDate, f64)> {
        self.records
            .iter()
            .map(|record| (record.date, record.value(kind)))
            .collect()
    }
}

fn parse_value(well_nest: &str, cell: Option<&str>) -> Result<f64> {
    let text = cell.unwrap_or_default();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SubsidenceError::InvalidFormat(format!(
            "{}: {:?} is not a finite number",
            well_nest, text
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANNUAL_CSV: &str = "date,AnnRates,CumTotSum,year
1979-12-31,-0.02,-0.03,1979
1978-12-31,-0.01,-0.01,1978
1980-12-31,-0.015,-0.045,1980
";

    #[test]
    fn test_parse_annual_csv_sorts_rows() {
        let series = AnnualSeries::parse_annual_csv("LCBKK013", ANNUAL_CSV).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.records[0].year(), 1978);
        assert_eq!(series.value_for_year(1979, SeriesKind::AnnRate).unwrap(), -0.02);
        assert_eq!(
            series.value_for_year(1980, SeriesKind::CumulativeSum).unwrap(),
            -0.045
        );
    }

    #[test]
    fn test_missing_year_is_an_error() {
        let series = AnnualSeries::parse_annual_csv("LCBKK013", ANNUAL_CSV).unwrap();
        assert!(matches!(
            series.value_for_year(2020, SeriesKind::AnnRate),
            Err(SubsidenceError::MissingYear { year: 2020, .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_years_and_bad_numbers() {
        let duplicated = "date,AnnRates,CumTotSum\n1978-12-31,0,0\n1978-06-30,0,0\n";
        assert!(AnnualSeries::parse_annual_csv("X", duplicated).is_err());
        let garbage = "date,AnnRates,CumTotSum\n1978-12-31,abc,0\n";
        assert!(AnnualSeries::parse_annual_csv("X", garbage).is_err());
        let not_finite = "date,AnnRates,CumTotSum\n1978-12-31,nan,0\n";
        assert!(matches!(
            AnnualSeries::parse_annual_csv("X", not_finite),
            Err(SubsidenceError::InvalidFormat(_))
        ));
        let infinite = "date,AnnRates,CumTotSum\n1978-12-31,0,-inf\n";
        assert!(AnnualSeries::parse_annual_csv("X", infinite).is_err());
        let no_rates = "date,CumTotSum\n1978-12-31,0\n";
        assert!(AnnualSeries::parse_annual_csv("X", no_rates).is_err());
    }
}
