use crate::error::{Result, SubsidenceError};
use csv::ReaderBuilder;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BoundaryRow {
    id: String,
    lon: f64,
    lat: f64,
}

/// One administrative boundary line, in (longitude, latitude) order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLine {
    pub id: String,
    pub points: Vec<(f64, f64)>,
}

/// Parse boundary polylines from `id,lon,lat` rows. Consecutive rows with
/// the same id form one line; an id appearing again later starts a new one.
pub fn parse_boundary_csv(csv_object: &str) -> Result<Vec<BoundaryLine>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_object.as_bytes());
    let mut lines: Vec<BoundaryLine> = Vec::new();
    for row in rdr.deserialize() {
        let row: BoundaryRow = row?;
        match lines.last_mut() {
            Some(line) if line.id == row.id => line.points.push((row.lon, row.lat)),
            _ => lines.push(BoundaryLine {
                id: row.id,
                points: vec![(row.lon, row.lat)],
            }),
        }
    }
    if let Some(line) = lines.iter().find(|line| line.points.len() < 2) {
        return Err(SubsidenceError::InvalidFormat(format!(
            "boundary {} has a single point",
            line.id
        )));
    }
    Ok(lines)
}
