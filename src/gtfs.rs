// Copyright  (C) 2020, Hove and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Hove (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

//! Loader for a gtfs schedule dataset : a directory of CSV files with a
//! header row, addressed by column name.

use crate::config::{Config, ConfigError, TransferMode};
use crate::models::{
    BaseModel, ModelError, RouteData, ServiceData, StopData, StopTimeRecord, TransferRecord,
    TripRecord,
};
use crate::time::{PositiveDuration, SecondsSinceDayStart};

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

mod parse;

const WEEKDAY_COLUMNS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const TRANSFER_QUALIFIER_COLUMNS: [&str; 4] =
    ["from_trip_id", "to_trip_id", "from_route_id", "to_route_id"];

const CONTINUOUS_COLUMNS: [&str; 2] = ["continuous_pickup", "continuous_drop_off"];

/// Load a gtfs dataset from a directory into a [`BaseModel`].
///
/// The set of columns read depends on the configured transfer mode :
/// the configured node column of stops.txt is read in `by_node_id` mode,
/// and transfers.txt is read (and required) in `by_transfers_txt` mode.
pub fn read<P: AsRef<Path>>(dir: P, config: &Config) -> Result<BaseModel, LoadError> {
    let dir = dir.as_ref();
    config.validate().map_err(LoadError::Config)?;
    check_no_frequencies(dir)?;

    let stops = read_stops(dir, config)?;
    let routes = read_routes(dir)?;
    let services = read_services(dir)?;
    let trips = read_trips(dir)?;
    let stop_times = read_stop_times(dir)?;
    let transfers = if config.transfer_mode == TransferMode::ByTransfersTxt {
        read_transfers(dir)?
    } else {
        Vec::new()
    };

    info!(
        "Dataset read from {:?} : {} stops, {} routes, {} trips, {} stop times",
        dir,
        stops.len(),
        routes.len(),
        trips.len(),
        stop_times.len()
    );

    BaseModel::new(stops, routes, services, trips, stop_times, transfers)
        .map_err(LoadError::Model)
}

fn check_no_frequencies(dir: &Path) -> Result<(), LoadError> {
    if let Some(mut file) = CsvFile::open(dir, "frequencies.txt")? {
        if file.read()? {
            return Err(LoadError::UnsupportedFeature {
                feature: "frequencies.txt defines frequency-based trips".to_string(),
            });
        }
    }
    Ok(())
}

fn read_stops(dir: &Path, config: &Config) -> Result<Vec<StopData>, LoadError> {
    let mut file = CsvFile::open_required(dir, "stops.txt")?;
    let stop_id_idx = file.required_column("stop_id")?;
    let stop_name_idx = file.column("stop_name");
    let location_type_idx = file.column("location_type");
    let parent_station_idx = file.column("parent_station");
    let node_id_idx = match (&config.transfer_mode, &config.transfer_node_id) {
        (TransferMode::ByNodeId, Some(column)) => Some(file.required_column(column)?),
        _ => None,
    };

    let mut stops = Vec::new();
    while file.read()? {
        let id = file.required_value(stop_id_idx, "stop_id")?.to_string();
        let name = get_optional(&file, stop_name_idx).map(str::to_string);
        let location_type = match get_optional(&file, location_type_idx) {
            Some(field) => parse::location_type(field)
                .map_err(|detail| file.bad_value("location_type", detail))?,
            None => crate::models::LocationType::StopOrPlatform,
        };
        let parent_station = get_optional(&file, parent_station_idx).map(str::to_string);
        let node_id = node_id_idx
            .and_then(|idx| file.value(idx))
            .map(str::to_string);
        stops.push(StopData {
            id,
            name,
            location_type,
            parent_station,
            node_id,
        });
    }
    Ok(stops)
}

fn read_routes(dir: &Path) -> Result<Vec<RouteData>, LoadError> {
    let mut file = CsvFile::open_required(dir, "routes.txt")?;
    let route_id_idx = file.required_column("route_id")?;
    let route_type_idx = file.required_column("route_type")?;
    let short_name_idx = file.column("route_short_name");
    let long_name_idx = file.column("route_long_name");
    let continuous_idxs = continuous_columns(&file);

    let mut routes = Vec::new();
    while file.read()? {
        check_no_continuous(&file, &continuous_idxs)?;
        let id = file.required_value(route_id_idx, "route_id")?.to_string();
        let route_type_field = file.required_value(route_type_idx, "route_type")?;
        let route_type = parse::route_type(route_type_field).map_err(|err| match err {
            parse::RouteTypeError::NotSupported(value) => LoadError::UnsupportedRouteType {
                line: file.line(),
                value,
            },
            parse::RouteTypeError::Invalid(detail) => file.bad_value(
                "route_type",
                format!("`{}` is not a valid route_type", detail),
            ),
        })?;
        let short_name = get_optional(&file, short_name_idx).map(str::to_string);
        let long_name = get_optional(&file, long_name_idx).map(str::to_string);
        routes.push(RouteData {
            id,
            short_name,
            long_name,
            route_type,
        });
    }
    Ok(routes)
}

struct WeeklyPattern {
    weekdays: [bool; 7],
    start_date: NaiveDate,
    end_date: NaiveDate,
}

fn read_services(dir: &Path) -> Result<Vec<ServiceData>, LoadError> {
    let mut weekly_patterns: HashMap<String, WeeklyPattern> = HashMap::new();
    if let Some(mut file) = CsvFile::open(dir, "calendar.txt")? {
        let service_id_idx = file.required_column("service_id")?;
        let start_date_idx = file.required_column("start_date")?;
        let end_date_idx = file.required_column("end_date")?;
        let mut weekday_idxs = [0usize; 7];
        for (pos, &column) in WEEKDAY_COLUMNS.iter().enumerate() {
            weekday_idxs[pos] = file.required_column(column)?;
        }

        while file.read()? {
            let service_id = file.required_value(service_id_idx, "service_id")?.to_string();
            let mut weekdays = [false; 7];
            for (pos, &column) in WEEKDAY_COLUMNS.iter().enumerate() {
                let field = file.required_value(weekday_idxs[pos], column)?;
                weekdays[pos] =
                    parse::bool01(field).map_err(|detail| file.bad_value(column, detail))?;
            }
            let start_date_field = file.required_value(start_date_idx, "start_date")?;
            let start_date = parse::date(start_date_field)
                .map_err(|detail| file.bad_value("start_date", detail))?;
            let end_date_field = file.required_value(end_date_idx, "end_date")?;
            let end_date = parse::date(end_date_field)
                .map_err(|detail| file.bad_value("end_date", detail))?;
            let pattern = WeeklyPattern {
                weekdays,
                start_date,
                end_date,
            };
            if weekly_patterns.insert(service_id.clone(), pattern).is_some() {
                return Err(LoadError::Model(ModelError::DuplicateServiceId(service_id)));
            }
        }
    }

    // date exceptions, last record wins for a given (service, date)
    let mut exceptions: HashMap<String, BTreeMap<NaiveDate, bool>> = HashMap::new();
    if let Some(mut file) = CsvFile::open(dir, "calendar_dates.txt")? {
        let service_id_idx = file.required_column("service_id")?;
        let date_idx = file.required_column("date")?;
        let exception_type_idx = file.required_column("exception_type")?;

        while file.read()? {
            let service_id = file.required_value(service_id_idx, "service_id")?.to_string();
            let date_field = file.required_value(date_idx, "date")?;
            let date =
                parse::date(date_field).map_err(|detail| file.bad_value("date", detail))?;
            let added = match file.required_value(exception_type_idx, "exception_type")? {
                "1" => true,
                "2" => false,
                other => {
                    let detail =
                        format!("`{}` is not a valid exception_type, expected 1 or 2", other);
                    return Err(file.bad_value("exception_type", detail));
                }
            };
            exceptions
                .entry(service_id)
                .or_default()
                .insert(date, added);
        }
    }

    let mut service_ids: BTreeSet<String> = weekly_patterns.keys().cloned().collect();
    service_ids.extend(exceptions.keys().cloned());

    let services = service_ids
        .into_iter()
        .map(|id| {
            let mut dates = BTreeSet::new();
            if let Some(pattern) = weekly_patterns.get(&id) {
                let mut date = pattern.start_date;
                while date <= pattern.end_date {
                    let weekday = date.weekday().num_days_from_monday() as usize;
                    if pattern.weekdays[weekday] {
                        dates.insert(date);
                    }
                    match date.succ_opt() {
                        Some(next) => date = next,
                        None => break,
                    }
                }
            }
            if let Some(exceptions) = exceptions.get(&id) {
                for (date, added) in exceptions {
                    if *added {
                        dates.insert(*date);
                    } else {
                        dates.remove(date);
                    }
                }
            }
            ServiceData { id, dates }
        })
        .collect();
    Ok(services)
}

fn read_trips(dir: &Path) -> Result<Vec<TripRecord>, LoadError> {
    let mut file = CsvFile::open_required(dir, "trips.txt")?;
    let trip_id_idx = file.required_column("trip_id")?;
    let route_id_idx = file.required_column("route_id")?;
    let service_id_idx = file.required_column("service_id")?;
    let short_name_idx = file.column("trip_short_name");

    let mut trips = Vec::new();
    while file.read()? {
        trips.push(TripRecord {
            id: file.required_value(trip_id_idx, "trip_id")?.to_string(),
            route_id: file.required_value(route_id_idx, "route_id")?.to_string(),
            service_id: file
                .required_value(service_id_idx, "service_id")?
                .to_string(),
            short_name: get_optional(&file, short_name_idx).map(str::to_string),
        });
    }
    Ok(trips)
}

fn read_stop_times(dir: &Path) -> Result<Vec<StopTimeRecord>, LoadError> {
    let mut file = CsvFile::open_required(dir, "stop_times.txt")?;
    let trip_id_idx = file.required_column("trip_id")?;
    let stop_sequence_idx = file.required_column("stop_sequence")?;
    let stop_id_idx = file.required_column("stop_id")?;
    let arrival_time_idx = file.required_column("arrival_time")?;
    let departure_time_idx = file.required_column("departure_time")?;
    let pickup_type_idx = file.column("pickup_type");
    let drop_off_type_idx = file.column("drop_off_type");
    let location_idxs: Vec<usize> = ["location_id", "location_group_id"]
        .iter()
        .filter_map(|column| file.column(column))
        .collect();
    let continuous_idxs = continuous_columns(&file);

    let mut stop_times = Vec::new();
    while file.read()? {
        check_no_continuous(&file, &continuous_idxs)?;
        let trip_id = file.required_value(trip_id_idx, "trip_id")?.to_string();

        let stop_id = match file.value(stop_id_idx) {
            Some(stop_id) => stop_id.to_string(),
            None => {
                // a row served by a flex location instead of a stop
                if location_idxs.iter().any(|idx| file.value(*idx).is_some()) {
                    return Err(LoadError::UnsupportedFeature {
                        feature: format!(
                            "stop_times.txt line {} is served by a flex location \
                            instead of a stop",
                            file.line()
                        ),
                    });
                }
                return Err(file.empty_value("stop_id"));
            }
        };

        let stop_sequence_field = file.required_value(stop_sequence_idx, "stop_sequence")?;
        let stop_sequence: u32 = stop_sequence_field.parse().map_err(|_| {
            let detail = format!("`{}` is not a valid stop_sequence", stop_sequence_field);
            file.bad_value("stop_sequence", detail)
        })?;

        let arrival_field = file.value(arrival_time_idx);
        let departure_field = file.value(departure_time_idx);
        let (arrival_field, departure_field) = match (arrival_field, departure_field) {
            (Some(arrival), Some(departure)) => (arrival, departure),
            // rows without explicit times are meant to be interpolated
            // from the timepoint field, which this engine does not do
            _ => return Err(LoadError::InterpolatedStopTime { line: file.line() }),
        };
        let arrival = SecondsSinceDayStart::from_str(arrival_field)
            .map_err(|err| file.bad_value("arrival_time", err.to_string()))?;
        let departure = SecondsSinceDayStart::from_str(departure_field)
            .map_err(|err| file.bad_value("departure_time", err.to_string()))?;

        let flow = parse::flow(
            pickup_type_idx.and_then(|idx| file.value(idx)),
            drop_off_type_idx.and_then(|idx| file.value(idx)),
        )
        .map_err(|detail| file.bad_value("pickup_type/drop_off_type", detail))?;

        stop_times.push(StopTimeRecord {
            trip_id,
            stop_sequence,
            stop_id,
            arrival,
            departure,
            flow,
        });
    }
    Ok(stop_times)
}

fn read_transfers(dir: &Path) -> Result<Vec<TransferRecord>, LoadError> {
    let mut file = CsvFile::open_required(dir, "transfers.txt")?;
    let from_stop_idx = file.required_column("from_stop_id")?;
    let to_stop_idx = file.required_column("to_stop_id")?;
    let transfer_type_idx = file.column("transfer_type");
    let min_transfer_time_idx = file.column("min_transfer_time");
    let qualifier_idxs: Vec<usize> = TRANSFER_QUALIFIER_COLUMNS
        .iter()
        .filter_map(|column| file.column(column))
        .collect();

    let mut transfers = Vec::new();
    while file.read()? {
        // only the lowest-specificity records are supported : a record
        // qualified by a trip or route is ignored
        if qualifier_idxs.iter().any(|idx| file.value(*idx).is_some()) {
            continue;
        }
        let from_stop_id = file.required_value(from_stop_idx, "from_stop_id")?.to_string();
        let to_stop_id = file.required_value(to_stop_idx, "to_stop_id")?.to_string();
        let kind = parse::transfer_kind(transfer_type_idx.and_then(|idx| file.value(idx)))
            .map_err(|detail| file.bad_value("transfer_type", detail))?;
        let min_transfer_time = match min_transfer_time_idx.and_then(|idx| file.value(idx)) {
            Some(field) => {
                let seconds: u32 = field.parse().map_err(|_| {
                    let detail = format!("`{}` is not a valid min_transfer_time", field);
                    file.bad_value("min_transfer_time", detail)
                })?;
                Some(PositiveDuration::from_seconds(seconds))
            }
            None => None,
        };
        transfers.push(TransferRecord {
            from_stop_id,
            to_stop_id,
            kind,
            min_transfer_time,
        });
    }
    Ok(transfers)
}

fn continuous_columns(file: &CsvFile) -> Vec<(usize, &'static str)> {
    CONTINUOUS_COLUMNS
        .iter()
        .filter_map(|column| file.column(column).map(|idx| (idx, *column)))
        .collect()
}

fn check_no_continuous(file: &CsvFile, idxs: &[(usize, &'static str)]) -> Result<(), LoadError> {
    for (idx, column) in idxs {
        if let Some(value) = file.value(*idx) {
            // 1 means "no continuous stopping", anything else enables it
            if value != "1" {
                return Err(LoadError::UnsupportedFeature {
                    feature: format!(
                        "{} line {} enables continuous {} which is not supported",
                        file.name,
                        file.line(),
                        column
                    ),
                });
            }
        }
    }
    Ok(())
}

fn get_optional<'a>(file: &'a CsvFile, idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|idx| file.value(idx))
}

struct CsvFile {
    name: &'static str,
    reader: csv::Reader<std::fs::File>,
    columns: HashMap<String, usize>,
    record: csv::StringRecord,
}

impl CsvFile {
    fn open(dir: &Path, name: &'static str) -> Result<Option<Self>, LoadError> {
        let path = dir.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        let mut reader = csv::ReaderBuilder::new()
            .from_path(&path)
            .map_err(|source| LoadError::Csv { file: name, source })?;
        let headers = reader
            .headers()
            .map_err(|source| LoadError::Csv { file: name, source })?;
        let mut columns = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            // tolerate a utf-8 byte order mark on the first header
            let header = header.trim().trim_start_matches('\u{feff}');
            columns.insert(header.to_string(), idx);
        }
        Ok(Some(Self {
            name,
            reader,
            columns,
            record: csv::StringRecord::new(),
        }))
    }

    fn open_required(dir: &Path, name: &'static str) -> Result<Self, LoadError> {
        Self::open(dir, name)?.ok_or_else(|| LoadError::MissingFile {
            file: name,
            path: dir.join(name),
        })
    }

    fn read(&mut self) -> Result<bool, LoadError> {
        self.reader
            .read_record(&mut self.record)
            .map_err(|source| LoadError::Csv {
                file: self.name,
                source,
            })
    }

    fn line(&self) -> u64 {
        self.reader.position().line()
    }

    fn column(&self, column: &str) -> Option<usize> {
        self.columns.get(column).copied()
    }

    fn required_column(&self, column: &str) -> Result<usize, LoadError> {
        self.column(column).ok_or_else(|| LoadError::MissingColumn {
            file: self.name,
            column: column.to_string(),
        })
    }

    /// The value at `idx` in the current record, or None when empty
    fn value(&self, idx: usize) -> Option<&str> {
        self.record.get(idx).filter(|field| !field.is_empty())
    }

    fn required_value(&self, idx: usize, column: &'static str) -> Result<&str, LoadError> {
        self.value(idx).ok_or_else(|| self.empty_value(column))
    }

    fn empty_value(&self, column: &'static str) -> LoadError {
        LoadError::EmptyValue {
            file: self.name,
            line: self.line(),
            column,
        }
    }

    fn bad_value(&self, column: &'static str, detail: String) -> LoadError {
        LoadError::BadValue {
            file: self.name,
            line: self.line(),
            column,
            detail,
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    MissingFile {
        file: &'static str,
        path: PathBuf,
    },
    Csv {
        file: &'static str,
        source: csv::Error,
    },
    MissingColumn {
        file: &'static str,
        column: String,
    },
    EmptyValue {
        file: &'static str,
        line: u64,
        column: &'static str,
    },
    BadValue {
        file: &'static str,
        line: u64,
        column: &'static str,
        detail: String,
    },
    UnsupportedRouteType {
        line: u64,
        value: u16,
    },
    InterpolatedStopTime {
        line: u64,
    },
    UnsupportedFeature {
        feature: String,
    },
    Config(ConfigError),
    Model(ModelError),
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Csv { source, .. } => Some(source),
            LoadError::Config(source) => Some(source),
            LoadError::Model(source) => Some(source),
            _ => None,
        }
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::MissingFile { file, path } => {
                write!(f, "The required file {} is missing at {:?}", file, path)
            }
            LoadError::Csv { file, source } => {
                write!(f, "Error while reading {} : {}", file, source)
            }
            LoadError::MissingColumn { file, column } => {
                write!(f, "The required column {} is missing in {}", column, file)
            }
            LoadError::EmptyValue { file, line, column } => {
                write!(f, "{} line {} has no value for {}", file, line, column)
            }
            LoadError::BadValue {
                file,
                line,
                column,
                detail,
            } => write!(f, "{} line {}, column {} : {}", file, line, column, detail),
            LoadError::UnsupportedRouteType { line, value } => write!(
                f,
                "routes.txt line {} : route_type {} is not supported",
                line, value
            ),
            LoadError::InterpolatedStopTime { line } => write!(
                f,
                "stop_times.txt line {} has no explicit arrival/departure time. \
                Interpolated timepoints are not supported.",
                line
            ),
            LoadError::UnsupportedFeature { feature } => {
                write!(f, "Unsupported feature : {}", feature)
            }
            LoadError::Config(err) => write!(f, "Bad configuration : {}", err),
            LoadError::Model(err) => write!(f, "Malformed dataset : {}", err),
        }
    }
}
