//! Destination ingestion from spreadsheet rows (CSV export).

use crate::error::{Error, Result};
use crate::problem::Point;
use csv::StringRecord;
use log::debug;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Destinations keyed by group label (a sales beat, a delivery zone, ...).
pub type DestinationGroups = BTreeMap<String, Vec<Point>>;

const GROUP_COLUMNS: &[&str] = &["Beat Name", "Beat", "beat"];
const ID_COLUMNS: &[&str] = &["Outlet ID", "Outlet: Outlet Id"];
const LAT_COLUMNS: &[&str] = &["Latitude", "lat"];
const LNG_COLUMNS: &[&str] = &["Longitude", "lng"];
const NAME_COLUMNS: &[&str] = &["Outlet Name", "Outlet: Account Name", "Outlet:Account Name"];

/// Header position of each recognised column.
struct Columns {
    group: Vec<usize>,
    id: Vec<usize>,
    lat: Vec<usize>,
    lng: Vec<usize>,
    name: Vec<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |aliases: &[&str]| -> Vec<usize> {
            aliases
                .iter()
                .filter_map(|alias| headers.iter().position(|h| h.trim() == *alias))
                .collect()
        };

        let columns = Columns {
            group: find(GROUP_COLUMNS),
            id: find(ID_COLUMNS),
            lat: find(LAT_COLUMNS),
            lng: find(LNG_COLUMNS),
            name: find(NAME_COLUMNS),
        };

        for (found, aliases) in [
            (&columns.group, GROUP_COLUMNS),
            (&columns.id, ID_COLUMNS),
            (&columns.lat, LAT_COLUMNS),
            (&columns.lng, LNG_COLUMNS),
        ] {
            if found.is_empty() {
                return Err(Error::invalid_input(format!(
                    "no column named any of {aliases:?}"
                )));
            }
        }
        Ok(columns)
    }
}

/// First non-empty cell among the alias columns.
fn cell<'r>(record: &'r StringRecord, positions: &[usize]) -> Option<&'r str> {
    positions
        .iter()
        .filter_map(|&p| record.get(p))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Read destination rows into groups.
///
/// Rows lacking a group, id or a parseable coordinate are skipped. Within a
/// group the first row of each id wins.
pub fn read_destination_groups<R: Read>(reader: R) -> Result<DestinationGroups> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::locate(reader.headers()?)?;

    let mut groups = DestinationGroups::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let parsed = (
            cell(&record, &columns.group),
            cell(&record, &columns.id),
            cell(&record, &columns.lat).and_then(|v| v.parse::<f64>().ok()),
            cell(&record, &columns.lng).and_then(|v| v.parse::<f64>().ok()),
        );
        let (Some(group), Some(id), Some(lat), Some(lng)) = parsed else {
            debug!("skipping destination row {}: incomplete", row + 2);
            continue;
        };

        let points = groups.entry(group.to_string()).or_default();
        if points.iter().any(|p| p.id == id) {
            continue;
        }
        let name = cell(&record, &columns.name).map(str::to_string);
        points.push(Point::new(id, lat, lng, name));
    }

    Ok(groups)
}

/// Load destination groups from a CSV file.
pub fn load_destination_groups<P: AsRef<Path>>(path: P) -> Result<DestinationGroups> {
    read_destination_groups(File::open(path)?)
}
